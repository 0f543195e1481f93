use std::sync::Arc;

use anyhow::{Context, Result};
use folio_shared::{
    content::{ContentStore, PostIndex},
    Post,
};

pub const DEFAULT_CONTENT_DIR: &str = "./content/blog";

#[derive(Clone)]
pub struct AppState {
    /// Content tree, re-read on every request so edits show up without a restart.
    store: Arc<ContentStore>,
}

impl AppState {
    pub fn new(content_dir: &str) -> Self {
        Self {
            store: Arc::new(ContentStore::new(content_dir)),
        }
    }

    /// Build a fresh index off the async runtime.
    pub async fn index(&self) -> Result<PostIndex> {
        let store = Arc::clone(&self.store);
        let index = tokio::task::spawn_blocking(move || store.build_index())
            .await
            .context("content indexing task panicked")??;
        Ok(index)
    }

    /// Single post lookup; only the matching file is parsed.
    pub async fn post(&self, slug: &str) -> Result<Option<Post>> {
        let store = Arc::clone(&self.store);
        let slug = slug.to_string();
        let post = tokio::task::spawn_blocking(move || store.get_post_by_slug(&slug))
            .await
            .context("post lookup task panicked")??;
        Ok(post)
    }

    pub async fn post_count(&self) -> Result<usize> {
        Ok(self.index().await?.len())
    }
}
