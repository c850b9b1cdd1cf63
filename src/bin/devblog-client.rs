use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use devblog_client::client::envelope::ApiEnvelope;
use devblog_client::model::auth::{LoginRequest, RegisterRequest};
use devblog_client::model::post::{PostQuery, SortOrder};
use devblog_client::observability::metrics;
use devblog_client::utils::config_loader;
use devblog_client::utils::constants::DEFAULT_CONFIG_PATH;
use devblog_client::utils::logging::{self, LogLevel};
use devblog_client::{AccessToken, ApiClient};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DEVBLOG_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DEVBLOG_PASSWORD")]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Finish an OAuth sign-in with the token from the provider redirect
    Oauth {
        #[arg(long, env = "DEVBLOG_TOKEN")]
        token: String,
    },
    Logout,
    /// Show the stored session user
    Whoami,
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Popular tags
    Tags,
    AdminStats,
    MetricsSummary,
    SecurityStats,
}

#[derive(Subcommand)]
enum PostsCommand {
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
        #[arg(long)]
        author: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        ascending: bool,
    },
    Get {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config, start logging
    // -------------------------------

    let args = Args::parse();
    let config = config_loader::run(&args.config)?;
    logging::run(&config.settings, args.log_level);

    // -------------------------------
    // 2. Build the client over the configured session storage
    // -------------------------------

    let client = ApiClient::from_config(&config)?;

    // -------------------------------
    // 3. Run the command
    // -------------------------------

    let outcome = run(&client, args.command).await;

    if config.settings.metrics.is_enabled {
        info!("client metrics:\n{}", metrics::render().await?);
    }
    outcome
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            print(client.auth().login(&LoginRequest { email, password }).await)
        }
        Command::Register { email, password, name } => print(
            client
                .auth()
                .register(&RegisterRequest { email, password, name })
                .await,
        ),
        Command::Oauth { token } => {
            print(client.auth().login_with_token(AccessToken::new(token)).await)
        }
        Command::Logout => {
            client.auth().logout().await;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => match client.auth().stored_user() {
            Some(user) => {
                println!("{}", serde_json::to_string_pretty(&user)?);
                Ok(())
            }
            None => Err(anyhow!("not signed in")),
        },
        Command::Posts(PostsCommand::List { page, size, author, tags, search, ascending }) => {
            let query = PostQuery {
                page,
                size,
                author,
                tags,
                search,
                order: ascending.then_some(SortOrder::Asc),
                ..Default::default()
            };
            let listing = client.posts().list(&query).await.map(|response| {
                response.map(|page| {
                    page.content
                        .iter()
                        .map(|post| {
                            serde_json::json!({
                                "id": post.id,
                                "title": post.title,
                                "author": post.author_name(),
                                "tags": post.tag_names(),
                                "updatedAt": post.updated_at(),
                                "comments": post.comment_count(),
                            })
                        })
                        .collect::<Vec<_>>()
                })
            });
            print(listing)
        }
        Command::Posts(PostsCommand::Get { id }) => {
            let post = client.posts().get(id).await.map(|response| {
                response.map(|post| {
                    serde_json::json!({
                        "id": post.id,
                        "title": post.title,
                        "body": post.body,
                        "author": post.author_name(),
                        "tags": post.tag_names(),
                        "createdAt": post.created_at(),
                        "comments": post.comment_count(),
                    })
                })
            });
            print(post)
        }
        Command::Tags => print(
            client
                .tags()
                .popular()
                .await
                .map(|response| response.map(|tags| tags.into_iter().map(|tag| tag.name).collect::<Vec<_>>())),
        ),
        Command::AdminStats => print(client.admin().stats().await.map(|r| r.map(|s| {
            serde_json::json!({
                "totalUsers": s.total_users,
                "totalPosts": s.total_posts,
                "totalComments": s.total_comments,
                "other": s.extra,
            })
        }))),
        Command::MetricsSummary => print(client.metrics().summary().await.map(|r| r.map(|s| {
            serde_json::json!({
                "totalExecutions": s.total_executions,
                "totalFailures": s.total_failures,
                "overallAverageExecutionTime": s.overall_average_execution_time,
                "totalMethodsMonitored": s.total_methods_monitored,
            })
        }))),
        Command::SecurityStats => print(client.security().stats().await.map(|r| r.map(|s| {
            serde_json::json!({
                "totalEvents": s.total_events,
                "failedLogins": s.failed_logins,
                "blockedIps": s.blocked_ips,
                "other": s.extra,
            })
        }))),
    }
}

/// Pretty JSON on stdout; a failure envelope becomes a non-zero exit.
fn print<T: Serialize>(envelope: ApiEnvelope<T>) -> Result<()> {
    match envelope {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(error) => {
            eprintln!("{}", serde_json::to_string_pretty(&error)?);
            if error.is_unauthorized() {
                eprintln!("session is no longer valid, run `devblog-client login` again");
            }
            Err(anyhow!(error))
        }
    }
}
