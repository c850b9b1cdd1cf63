use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub name: String,
    /// usage counts and the like, when the view provides them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
