//! Blog content: a directory tree of front-matter files, read fresh on every
//! call and indexed by slug.

use std::{
    cmp::Reverse,
    collections::{hash_map::Entry, BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use gray_matter::{engine::YAML, Matter};
use serde::Deserialize;
use thiserror::Error;

use crate::post::{Post, PostMeta};

pub const DEFAULT_EXTENSION: &str = "mdx";
const WORDS_PER_MINUTE: f32 = 200.0;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid front matter in {}: {message}", path.display())]
    Frontmatter { path: PathBuf, message: String },
    #[error("front matter in {} is missing `{field}`", path.display())]
    MissingField { path: PathBuf, field: &'static str },
    #[error("duplicate slug `{slug}`: {} and {}", first.display(), second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Frontmatter {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    #[serde(alias = "read_time")]
    read_time: Option<u32>,
    tags: Option<Vec<String>>,
    project: Option<String>,
}

/// Parse front matter and body. Files without a header yield default
/// (empty) front matter.
fn parse_document(path: &Path, raw: &str) -> Result<(Frontmatter, String), ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse(raw);

    let frontmatter = parsed
        .data
        .map(|data| data.deserialize::<Frontmatter>())
        .transpose()
        .map_err(|err| ContentError::Frontmatter {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?
        .unwrap_or_default();

    Ok((frontmatter, parsed.content))
}

pub fn estimate_read_time(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    let minutes = (words as f32 / WORDS_PER_MINUTE).ceil() as u32;
    minutes.max(1)
}

/// File stem used as the post slug.
pub fn slug_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Reads posts from `root` and every directory below it.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    extension: String,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Content files below the root, in file-name order per directory. A
    /// missing root is an empty tree. Symlinks are not followed.
    pub fn collect_files(&self) -> Vec<PathBuf> {
        if !self.root.exists() {
            tracing::debug!(root = %self.root.display(), "content root missing, no posts");
            return Vec::new();
        }

        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping unreadable content entry: {err}");
                    continue;
                },
            };
            if entry.file_type().is_file() && self.has_content_extension(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files
    }

    /// `(slug, path)` for every content file; fails when two files share a stem.
    pub fn discover(&self) -> Result<Vec<(String, PathBuf)>, ContentError> {
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut found = Vec::new();

        for path in self.collect_files() {
            let Some(slug) = slug_for(&path) else {
                tracing::warn!("Skipping content file with non UTF-8 name: {}", path.display());
                continue;
            };
            match seen.entry(slug.clone()) {
                Entry::Occupied(first) => {
                    return Err(ContentError::DuplicateSlug {
                        slug,
                        first: first.get().clone(),
                        second: path,
                    });
                },
                Entry::Vacant(slot) => {
                    slot.insert(path.clone());
                },
            }
            found.push((slug, path));
        }
        Ok(found)
    }

    /// Parse one content file into a post.
    pub fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (frontmatter, body) = parse_document(path, &raw)?;

        let missing = |field| ContentError::MissingField {
            path: path.to_path_buf(),
            field,
        };
        let title = frontmatter
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| missing("title"))?;
        let date = frontmatter
            .date
            .filter(|date| !date.trim().is_empty())
            .ok_or_else(|| missing("date"))?;
        let slug = slug_for(path).unwrap_or_default();

        let meta = PostMeta {
            title,
            date,
            description: frontmatter.description.unwrap_or_default(),
            read_time: frontmatter
                .read_time
                .unwrap_or_else(|| estimate_read_time(&body)),
            tags: frontmatter.tags.unwrap_or_default(),
            project: frontmatter
                .project
                .map(|project| project.trim().to_string())
                .filter(|project| !project.is_empty()),
        };
        if meta.published_at().is_none() {
            tracing::warn!(
                slug = %slug,
                date = %meta.date,
                "post date does not parse, sorting it last"
            );
        }

        Ok(Post {
            slug,
            meta,
            content: body,
        })
    }

    /// Read every file and index it. Malformed files are skipped with a
    /// warning; a duplicate slug fails the whole build.
    pub fn build_index(&self) -> Result<PostIndex, ContentError> {
        let mut entries = Vec::new();
        for (slug, path) in self.discover()? {
            match self.load_post(&path) {
                Ok(post) => entries.push((path, post)),
                Err(err) => tracing::warn!(slug = %slug, "Failed to parse post: {err}"),
            }
        }
        let index = PostIndex::new(entries)?;
        tracing::debug!(root = %self.root.display(), posts = index.len(), "content index built");
        Ok(index)
    }

    /// All posts, newest first.
    pub fn list_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        Ok(self.build_index()?.into_posts())
    }

    /// Post whose file stem equals `slug`, regardless of directory. The slug
    /// may arrive percent-encoded. Only the matching file is parsed; a file
    /// that fails to parse is treated as absent, as in the listing.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let slug = decode_slug(slug);
        let found = self
            .discover()?
            .into_iter()
            .find(|(candidate, _)| *candidate == slug);

        let Some((_, path)) = found else {
            return Ok(None);
        };
        match self.load_post(&path) {
            Ok(post) => Ok(Some(post)),
            Err(err) => {
                tracing::warn!(slug = %slug, "Failed to parse post: {err}");
                Ok(None)
            },
        }
    }

    /// Posts tagged with `project_id`, newest first.
    pub fn get_posts_by_project(&self, project_id: &str) -> Result<Vec<Post>, ContentError> {
        Ok(self
            .list_all_posts()?
            .into_iter()
            .filter(|post| post.meta.belongs_to(project_id))
            .collect())
    }

    fn has_content_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

fn decode_slug(slug: &str) -> String {
    match urlencoding::decode(slug) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => slug.to_string(),
    }
}

/// Posts of one build, ordered newest first with a slug lookup table.
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
    by_slug: HashMap<String, usize>,
}

impl PostIndex {
    /// Index `(source path, post)` pairs. Posts are ordered by publication
    /// time descending; equal timestamps keep their input order and undated
    /// posts go last.
    pub fn new(entries: Vec<(PathBuf, Post)>) -> Result<Self, ContentError> {
        let mut origins: HashMap<String, PathBuf> = HashMap::new();
        let mut posts = Vec::with_capacity(entries.len());
        for (path, post) in entries {
            if let Some(first) = origins.insert(post.slug.clone(), path.clone()) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug,
                    first,
                    second: path,
                });
            }
            posts.push(post);
        }

        posts.sort_by_key(|post| Reverse(post.meta.published_at()));

        let by_slug = posts
            .iter()
            .enumerate()
            .map(|(idx, post)| (post.slug.clone(), idx))
            .collect();
        Ok(Self {
            posts,
            by_slug,
        })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|idx| &self.posts[*idx])
    }

    pub fn by_project<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Post> + 'a {
        self.posts
            .iter()
            .filter(move |post| post.meta.belongs_to(project_id))
    }

    /// Slugs in listing order, for pre-rendering every detail page.
    pub fn all_slugs(&self) -> Vec<&str> {
        self.posts.iter().map(|post| post.slug.as_str()).collect()
    }

    /// Tag usage counts, most used first, ties by name. Tags differing only
    /// in case are one tag, shown with the spelling of its newest post.
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, (&str, usize)> = BTreeMap::new();
        for post in &self.posts {
            for tag in &post.meta.tags {
                counts.entry(tag.to_lowercase()).or_insert((tag.as_str(), 0)).1 += 1;
            }
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_values()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}
