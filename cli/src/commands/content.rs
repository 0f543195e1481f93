use std::path::Path;

use anyhow::{bail, Result};
use folio_shared::{content::ContentStore, project};
use serde::Serialize;
use serde_json::{json, Value};

use super::to_json;

#[derive(Serialize)]
struct PostSummary<'a> {
    slug: &'a str,
    title: &'a str,
    date: &'a str,
    #[serde(rename = "readTime")]
    read_time: u32,
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<&'a str>,
}

pub fn list_posts(content_dir: &Path, project: Option<&str>, tag: Option<&str>) -> Result<Value> {
    let index = ContentStore::new(content_dir).build_index()?;
    let posts: Vec<PostSummary<'_>> = index
        .posts()
        .iter()
        .filter(|post| project.map_or(true, |project| post.meta.belongs_to(project)))
        .filter(|post| {
            tag.map_or(true, |tag| post.meta.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        })
        .map(|post| PostSummary {
            slug: &post.slug,
            title: &post.meta.title,
            date: &post.meta.date,
            read_time: post.meta.read_time,
            tags: &post.meta.tags,
            project: post.meta.project.as_deref(),
        })
        .collect();

    Ok(json!({
        "total": posts.len(),
        "posts": to_json(&posts)?,
    }))
}

pub fn get_post(content_dir: &Path, slug: &str) -> Result<Value> {
    match ContentStore::new(content_dir).get_post_by_slug(slug)? {
        Some(post) => {
            let back_link = post.meta.back_link();
            let mut value = to_json(&post)?;
            value["backLink"] = to_json(&back_link)?;
            Ok(value)
        },
        None => bail!("post not found: {slug}"),
    }
}

pub fn list_tags(content_dir: &Path) -> Result<Value> {
    let index = ContentStore::new(content_dir).build_index()?;
    let tags: Vec<Value> = index
        .tag_counts()
        .into_iter()
        .map(|(name, count)| json!({"name": name, "count": count}))
        .collect();
    Ok(json!({ "tags": tags }))
}

pub fn list_projects() -> Result<Value> {
    let projects: Vec<Value> = project::all_projects()
        .iter()
        .map(|info| {
            Ok(json!({
                "project": to_json(info)?,
                "nav": to_json(&project::project_nav(info.id))?,
            }))
        })
        .collect::<Result<_>>()?;
    Ok(json!({ "projects": projects }))
}
