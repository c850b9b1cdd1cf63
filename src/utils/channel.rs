use serde::Serialize;
use tokio::sync::broadcast::{self, Sender};

const BUFFER_SIZE: usize = 50;

/// Session lifecycle notifications published by the client.
///
/// `Expired` means the refresh credential was rejected: whoever owns the user
/// interaction is expected to send the user back to sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum SessionEvent {
    SignedIn { user_id: String },
    Refreshed { user_id: Option<String> },
    Expired,
    SignedOut,
}

impl SessionEvent {
    pub fn label(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn { .. } => "signed_in",
            SessionEvent::Refreshed { .. } => "refreshed",
            SessionEvent::Expired => "expired",
            SessionEvent::SignedOut => "signed_out",
        }
    }
}

pub fn run() -> Sender<SessionEvent> {
    let (session_sender, _) = broadcast::channel(BUFFER_SIZE);
    session_sender
}
