//! Loads the project configuration from `zinside.yaml`. The file is looked
//! up in the given directory and then in each of its ancestors. Relative URLs
//! in the file are resolved against the directory the file lives in, so a
//! project can point at a local `posts.json` and `posts/` checkout.
//!
//! ```yaml
//! title: ZINSIDEME
//! content_base_url: https://raw.githubusercontent.com/me/blog/main/posts/
//! index_page_size: 1
//! source:
//!   kind: manifest
//!   manifest_url: posts.json
//! ```

use crate::source::{ListingSource, ManifestSource, PostSource};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::{ParseError, Url};

pub const PROJECT_FILE: &str = "zinside.yaml";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(crate::paginate::DEFAULT_PAGE_SIZE)
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SourceSpec {
    Manifest { manifest_url: String },
    Listing { listing_url: String },
}

impl Default for SourceSpec {
    fn default() -> Self {
        SourceSpec::Manifest {
            manifest_url: String::from("posts.json"),
        }
    }
}

#[derive(Deserialize)]
struct Project {
    pub title: String,

    pub content_base_url: String,

    #[serde(default)]
    pub index_page_size: PageSize,

    #[serde(default)]
    pub source: SourceSpec,

    #[serde(default)]
    pub theme_directory: Option<PathBuf>,

    #[serde(default)]
    pub intro: String,
}

/// Where the post list comes from. Exactly one per project.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceConfig {
    Manifest(Url),
    Listing(Url),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub intro: String,
    pub source: SourceConfig,
    pub content_base: Url,
    pub index_page_size: usize,
    pub theme_directory: Option<PathBuf>,
}

impl Config {
    /// Finds `zinside.yaml` in `dir` or the nearest ancestor and loads it.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            Config::from_project_file(&path)
                .with_context(|| format!("Loading configuration from `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path
            .parent()
            .ok_or_else(|| {
                anyhow!(
                    "Can't get parent directory for provided project file path '{:?}'",
                    path
                )
            })?
            .canonicalize()?;
        let root_url = Url::from_directory_path(&project_root)
            .map_err(|_| anyhow!("Project directory `{}` is not absolute", project_root.display()))?;

        Ok(Config {
            title: project.title,
            intro: project.intro,
            source: match project.source {
                SourceSpec::Manifest { manifest_url } => {
                    SourceConfig::Manifest(resolve(&root_url, &manifest_url)?)
                }
                SourceSpec::Listing { listing_url } => {
                    SourceConfig::Listing(resolve(&root_url, &listing_url)?)
                }
            },
            content_base: resolve(&root_url, &project.content_base_url)?,
            index_page_size: project.index_page_size.0.max(1),
            theme_directory: project
                .theme_directory
                .map(|relpath| project_root.join(relpath)),
        })
    }

    /// Builds the configured post source.
    pub fn post_source(&self) -> Box<dyn PostSource> {
        match &self.source {
            SourceConfig::Manifest(manifest_url) => Box::new(ManifestSource {
                manifest_url: manifest_url.clone(),
                content_base: self.content_base.clone(),
            }),
            SourceConfig::Listing(listing_url) => Box::new(ListingSource {
                listing_url: listing_url.clone(),
                content_base: self.content_base.clone(),
            }),
        }
    }
}

// Parses `url` as an absolute URL, or joins it onto `base` if it is relative.
fn resolve(base: &Url, url: &str) -> Result<Url> {
    match Url::parse(url) {
        Ok(absolute) => Ok(absolute),
        Err(ParseError::RelativeUrlWithoutBase) => Ok(base.join(url)?),
        Err(e) => Err(anyhow!("Parsing URL `{}`: {}", url, e)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn write_project(dir: &Path, yaml: &str) -> Result<()> {
        File::create(dir.join(PROJECT_FILE))?.write_all(yaml.as_bytes())?;
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(
            dir.path(),
            "title: blog\ncontent_base_url: https://raw.example.com/posts/\n",
        )?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!("blog", config.title);
        assert_eq!(1, config.index_page_size);
        assert_eq!("", config.intro);
        assert!(config.theme_directory.is_none());
        let manifest = Url::from_file_path(dir.path().canonicalize()?.join("posts.json"))
            .map_err(|_| anyhow!("bad path"))?;
        assert_eq!(SourceConfig::Manifest(manifest), config.source);
        Ok(())
    }

    #[test]
    fn test_found_from_subdirectory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(
            dir.path(),
            "title: blog\ncontent_base_url: posts/\nindex_page_size: 5\ntheme_directory: theme\n",
        )?;
        let nested = dir.path().join("posts").join("drafts");
        std::fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!(5, config.index_page_size);
        assert_eq!("file", config.content_base.scheme());
        assert!(config.content_base.path().ends_with("/posts/"));
        assert_eq!(Some(dir.path().canonicalize()?.join("theme")), config.theme_directory);
        Ok(())
    }

    #[test]
    fn test_listing_source() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(
            dir.path(),
            "title: blog
content_base_url: https://raw.example.com/posts/
source:
  kind: listing
  listing_url: https://api.example.com/repos/me/blog/contents/posts
",
        )?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!(
            SourceConfig::Listing(Url::parse("https://api.example.com/repos/me/blog/contents/posts")?),
            config.source,
        );
        Ok(())
    }

    #[test]
    fn test_zero_page_size_is_one() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(
            dir.path(),
            "title: blog\ncontent_base_url: https://raw.example.com/posts/\nindex_page_size: 0\n",
        )?;
        assert_eq!(1, Config::from_directory(dir.path())?.index_page_size);
        Ok(())
    }

    #[test]
    fn test_missing_title_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        write_project(dir.path(), "content_base_url: posts/\n")?;
        assert!(Config::from_directory(dir.path()).is_err());
        Ok(())
    }
}
