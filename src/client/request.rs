use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::session::token::AccessToken;
use crate::utils::constants::AUTH_PATH_PREFIX;

/// One logical backend call, described independently of the transport.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    /// Explicit credential; when set the stored session token is not consulted.
    pub bearer: Option<AccessToken>,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Repeated keys are kept, so `tags=a&tags=b` is expressible.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Self {
        // serializing plain request structs into a Value cannot fail
        self.body = Some(serde_json::to_value(body).unwrap_or(Value::Null));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn bearer(mut self, token: AccessToken) -> Self {
        self.bearer = Some(token);
        self
    }

    /// Sign-in, register, refresh and sign-out never carry the stored token
    /// and never trigger a refresh.
    pub fn is_auth_endpoint(&self) -> bool {
        self.path.starts_with(AUTH_PATH_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_endpoints_are_recognised_by_prefix() {
        assert!(RequestSpec::post("/api/auth/sign-in").is_auth_endpoint());
        assert!(RequestSpec::post("/api/auth/refresh-token").is_auth_endpoint());
        assert!(!RequestSpec::get("/api/posts/1").is_auth_endpoint());
        assert!(!RequestSpec::get("/api/authors").is_auth_endpoint());
    }

    #[test]
    fn builder_keeps_repeated_query_keys() {
        let spec = RequestSpec::get("/api/admin/posts")
            .query("page", 0)
            .query("tags", "rust")
            .query("tags", "tokio")
            .query_opt("search", None::<String>)
            .json(&json!({"a": 1}));

        assert_eq!(spec.method, Method::GET);
        assert_eq!(
            spec.query,
            vec![
                ("page".to_owned(), "0".to_owned()),
                ("tags".to_owned(), "rust".to_owned()),
                ("tags".to_owned(), "tokio".to_owned()),
            ]
        );
        assert_eq!(spec.body, Some(json!({"a": 1})));
    }
}
