use folio_shared::{BackLink, NavLink, Post, PostMeta, ProjectInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

/// Post without its body, for listings.
#[derive(Debug, Serialize, Clone)]
pub struct PostListItem {
    pub slug: String,
    #[serde(flatten)]
    pub meta: PostMeta,
}

impl From<Post> for PostListItem {
    fn from(post: Post) -> Self {
        Self {
            slug: post.slug,
            meta: post.meta,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostListItem>,
    pub total: usize,
}

impl PostListResponse {
    pub fn new(posts: Vec<PostListItem>) -> Self {
        Self {
            total: posts.len(),
            posts,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub back_link: BackLink,
}

#[derive(Debug, Serialize, Clone)]
pub struct TagInfo {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<TagInfo>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: &'static [ProjectInfo],
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: &'static ProjectInfo,
    pub nav: &'static [NavLink],
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}
