use bangumi_core::BangumiItem;
use serde::{Deserialize, Serialize};

/// Code the listing API uses for a successful page.
pub const SUCCESS_CODE: i64 = 200;

/// Top-level response wrapper for one page of the collection listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<PageData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub list: Vec<BangumiItem>,
}

impl PageEnvelope {
    /// A successful page carrying `list`.
    pub fn ok(total_pages: u32, list: Vec<BangumiItem>) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: None,
            data: Some(PageData { total_pages, list }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("no message")
    }

    /// Payload of the page, empty when the server sent none.
    pub fn into_data(self) -> PageData {
        self.data.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_page() {
        let json = r#"{
            "code": 200,
            "message": "ok",
            "data": {
                "totalPages": 4,
                "list": [
                    {"id": 253, "name": "Cowboy Bebop", "nameCN": "星际牛仔",
                     "labels": [{"label": "year", "value": "1998"}]}
                ]
            }
        }"#;
        let env: PageEnvelope = serde_json::from_str(json).unwrap();
        assert!(env.is_success());
        let data = env.into_data();
        assert_eq!(data.total_pages, 4);
        assert_eq!(data.list.len(), 1);
        assert_eq!(data.list[0].id, Some(253));
        assert_eq!(data.list[0].labels[0].value, "1998");
    }

    #[test]
    fn parses_error_page_without_data() {
        let env: PageEnvelope =
            serde_json::from_str(r#"{"code": 404, "message": "user not found"}"#).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.message(), "user not found");
        assert!(env.into_data().list.is_empty());
    }
}
