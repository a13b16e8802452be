use serde::{Deserialize, Deserializer, Serialize};

/// A single `{label, value}` tag attached to an entry (e.g. genre, studio).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "nullable_string")]
    pub label: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub value: String,
}

impl Label {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One catalog entry.
///
/// Text fields are never null: an absent or `null` value in incoming JSON
/// becomes an empty string, which is also how the store persists it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BangumiItem {
    /// Assigned by the store on insert, or supplied by the remote catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Original title.
    #[serde(default, deserialize_with = "nullable_string")]
    pub name: String,

    /// Localized title.
    #[serde(rename = "nameCN", default, deserialize_with = "nullable_string")]
    pub name_cn: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub summary: String,

    /// URL or path of the cover art.
    #[serde(default, deserialize_with = "nullable_string")]
    pub cover: String,

    /// Canonical reference URL.
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,

    #[serde(default, deserialize_with = "nullable_labels")]
    pub labels: Vec<Label>,

    /// User-controlled display position. `None` sorts last.
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl BangumiItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name_cn(mut self, name_cn: impl Into<String>) -> Self {
        self.name_cn = name_cn.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push(Label::new(label, value));
        self
    }

    /// Title to show in listings: the localized name when present.
    pub fn display_name(&self) -> &str {
        if self.name_cn.is_empty() {
            &self.name
        } else {
            &self.name_cn
        }
    }
}

/// Projection written by the JSON export: identity and ordering are local
/// bookkeeping and are left out.
#[derive(Debug, Serialize)]
pub struct ExportItem<'a> {
    pub name: &'a str,
    #[serde(rename = "nameCN")]
    pub name_cn: &'a str,
    pub summary: &'a str,
    pub cover: &'a str,
    pub url: &'a str,
    pub labels: &'a [Label],
}

impl<'a> From<&'a BangumiItem> for ExportItem<'a> {
    fn from(item: &'a BangumiItem) -> Self {
        Self {
            name: &item.name,
            name_cn: &item.name_cn,
            summary: &item.summary,
            cover: &item.cover,
            url: &item.url,
            labels: &item.labels,
        }
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_labels<'de, D>(deserializer: D) -> Result<Vec<Label>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Label>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "tests/item_tests.rs"]
mod tests;
