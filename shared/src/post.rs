use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A blog post parsed from one content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// File stem of the content file; unique across the whole content tree.
    pub slug: String,
    pub meta: PostMeta,
    /// Raw markup body, front matter removed.
    pub content: String,
}

/// Front matter of a post after defaults are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub title: String,
    pub date: String, // YYYY-MM-DD or RFC 3339
    #[serde(default)]
    pub description: String,
    pub read_time: u32, // minutes
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning project id, e.g. `car-price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Navigation target shown above a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackLink {
    pub href: String,
    pub label: String,
}

impl PostMeta {
    /// Publication instant in UTC, if `date` parses. Date-only values are
    /// midnight.
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_post_timestamp(&self.date)
    }

    /// Project posts link back to their project journal, others to the
    /// global blog index.
    pub fn back_link(&self) -> BackLink {
        match self.project.as_deref() {
            Some(project) => BackLink {
                href: format!("/projects/{project}/blog"),
                label: "Back to Project Journal".to_string(),
            },
            None => BackLink {
                href: "/blog".to_string(),
                label: "Back to All Posts".to_string(),
            },
        }
    }

    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.project.as_deref() == Some(project_id)
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS`.
/// Offsets are normalised to UTC.
pub fn parse_post_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
}
