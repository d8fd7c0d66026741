//! Defines the [`PostSummary`], [`PostStore`], and [`ManifestEntry`] types.
//! A [`PostSummary`] is everything the front end knows about a post before
//! its text has been fetched: the date, the title, the source file name, and
//! the URL the text can be fetched from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

/// One record of the `posts.json` manifest. Fields other than `date`,
/// `title`, and `filename` are carried through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// The post date, `YYYY-MM-DD`.
    pub date: String,

    /// The post title.
    pub title: String,

    /// The file name of the post's text, relative to the content base URL.
    pub filename: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The metadata for a single post. Posts are identified by date; the front
/// end assumes at most one post per day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostSummary {
    pub date: String,
    pub title: String,
    pub filename: String,

    /// Where the raw text of the post lives.
    pub url: Url,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostSummary {
    /// Builds a summary from a manifest entry, deriving the content URL from
    /// `content_base` and the entry's file name.
    pub fn from_entry(entry: ManifestEntry, content_base: &Url) -> Result<PostSummary> {
        let url = content_url(content_base, &entry.filename)?;
        let mut extra = entry.extra;
        extra.remove("url");
        Ok(PostSummary {
            date: entry.date,
            title: entry.title,
            filename: entry.filename,
            url,
            extra,
        })
    }
}

/// Appends `filename` to `base` as a single percent-encoded path segment. A
/// trailing slash on `base` is optional: `https://host/posts` and
/// `https://host/posts/` both yield `https://host/posts/{filename}`.
pub fn content_url(base: &Url, filename: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| InvalidContentBaseError(base.clone()))?
        .pop_if_empty()
        .push(filename);
    Ok(url)
}

/// The ordered, in-memory list of posts. Order is the order of the source
/// (newest first for manifests written by [`crate::manifest`]) and is never
/// re-sorted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostStore {
    posts: Vec<PostSummary>,
}

impl PostStore {
    pub fn new(posts: Vec<PostSummary>) -> PostStore {
        PostStore { posts }
    }

    /// Converts manifest entries into a store, in manifest order.
    pub fn from_manifest(entries: Vec<ManifestEntry>, content_base: &Url) -> Result<PostStore> {
        entries
            .into_iter()
            .map(|entry| PostSummary::from_entry(entry, content_base))
            .collect::<Result<Vec<_>>>()
            .map(PostStore::new)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&PostSummary> {
        self.posts.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostSummary> {
        self.posts.iter()
    }

    pub fn as_slice(&self) -> &[PostSummary] {
        &self.posts
    }

    /// Finds the first post published on `date`.
    pub fn find_by_date(&self, date: &str) -> Option<&PostSummary> {
        self.posts.iter().find(|post| post.date == date)
    }
}

#[derive(Debug)]
pub struct InvalidContentBaseError(Url);

impl fmt::Display for InvalidContentBaseError {
    /// Displays an [`InvalidContentBaseError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "content base URL `{}` cannot have path segments", self.0)
    }
}

impl std::error::Error for InvalidContentBaseError {}

pub type Result<T> = std::result::Result<T, InvalidContentBaseError>;
