use serde::Deserialize;

/// One page of a listing. REST views say `page`/`size`, GraphQL says
/// `pageNumber`/`pageSize` and omits `first`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default, alias = "pageNumber")]
    pub page: u32,
    #[serde(default, alias = "pageSize")]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub first: Option<bool>,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    pub fn is_first(&self) -> bool {
        self.first.unwrap_or(self.page == 0)
    }
}
