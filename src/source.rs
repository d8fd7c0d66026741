//! Post sources: where the list of [`PostSummary`] objects comes from. The
//! supported source is the static `posts.json` manifest ([`ManifestSource`]).
//! A live directory listing from a source-hosting API ([`ListingSource`]) is
//! available as an alternate, but a project uses one or the other, never both.

use crate::fetch::{Error as FetchError, Fetch};
use crate::post::{content_url, InvalidContentBaseError, ManifestEntry, PostStore, PostSummary};
use serde::Deserialize;
use serde_json::Map;
use std::fmt;
use url::Url;

/// Title used for listing entries whose file name has no title part.
pub const PLACEHOLDER_TITLE: &str = "Untitled";

const TEXT_EXTENSION: &str = ".txt";

/// Loads the whole post list in one go.
pub trait PostSource {
    fn load(&self, fetcher: &dyn Fetch) -> Result<PostStore>;
}

/// Loads posts from a JSON array of [`ManifestEntry`] objects.
pub struct ManifestSource {
    pub manifest_url: Url,

    /// The URL prefix under which each entry's `filename` can be fetched.
    pub content_base: Url,
}

impl PostSource for ManifestSource {
    fn load(&self, fetcher: &dyn Fetch) -> Result<PostStore> {
        let body = fetcher.get_text(&self.manifest_url)?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&body)?;
        log::info!("loaded {} posts from {}", entries.len(), self.manifest_url);
        Ok(PostStore::from_manifest(entries, &self.content_base)?)
    }
}

/// Loads posts from a directory-listing API such as the GitHub contents
/// endpoint. Each `.txt` file named `YYYY-MM-DD_Title.txt` becomes a post.
/// Entries keep the order the API returned them in.
pub struct ListingSource {
    pub listing_url: Url,

    /// Used for entries that come without a `download_url`.
    pub content_base: Url,
}

#[derive(Deserialize)]
struct ListingEntry {
    name: String,

    #[serde(default, rename = "type")]
    kind: Option<String>,

    #[serde(default)]
    download_url: Option<Url>,
}

impl PostSource for ListingSource {
    fn load(&self, fetcher: &dyn Fetch) -> Result<PostStore> {
        let body = fetcher.get_text(&self.listing_url)?;
        let listing: Vec<ListingEntry> = serde_json::from_str(&body)?;
        let mut posts = Vec::new();
        for entry in listing {
            if entry.kind.as_deref().map_or(false, |kind| kind != "file") {
                continue;
            }
            let (date, title) = match parse_listing_name(&entry.name) {
                Some(parts) => parts,
                None => continue,
            };
            let url = match entry.download_url {
                Some(url) => url,
                None => content_url(&self.content_base, &entry.name)?,
            };
            posts.push(PostSummary {
                date,
                title,
                filename: entry.name,
                url,
                extra: Map::new(),
            });
        }
        log::info!("listed {} posts from {}", posts.len(), self.listing_url);
        Ok(PostStore::new(posts))
    }
}

/// Splits a listing file name of the form `YYYY-MM-DD_Title.txt` into its
/// date and title. Returns `None` for names without the `.txt` suffix. A
/// missing or blank title becomes [`PLACEHOLDER_TITLE`]; a name with no `_`
/// uses the whole stem as the date.
pub fn parse_listing_name(name: &str) -> Option<(String, String)> {
    let stem = name.strip_suffix(TEXT_EXTENSION)?;
    let (date, title) = match stem.find('_') {
        Some(i) => (stem[..i].trim(), stem[i + 1..].trim()),
        None => (stem.trim(), ""),
    };
    let title = match title.is_empty() {
        true => PLACEHOLDER_TITLE,
        false => title,
    };
    Some((date.to_owned(), title.to_owned()))
}

/// Represents the result of loading posts.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading posts. None of these are fatal to the front
/// end; the caller logs them and carries on with an empty store.
#[derive(Debug)]
pub enum Error {
    /// The manifest or listing could not be fetched.
    Fetch(FetchError),

    /// The body was not the expected JSON.
    Json(serde_json::Error),

    /// A content URL could not be derived.
    ContentBase(InvalidContentBaseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Fetch(err) => err.fmt(f),
            Error::Json(err) => write!(f, "parsing post list: {}", err),
            Error::ContentBase(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Fetch(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::ContentBase(err) => Some(err),
        }
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Error {
        Error::Fetch(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<InvalidContentBaseError> for Error {
    fn from(err: InvalidContentBaseError) -> Error {
        Error::ContentBase(err)
    }
}
