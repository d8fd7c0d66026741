//! Defines the [`Fetch`] trait through which every network read goes (the
//! manifest, the directory listing, and post contents) along with
//! [`HttpFetcher`], the blocking implementation used by the binary.

use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Reads the body of a URL as text.
pub trait Fetch {
    fn get_text(&self, url: &Url) -> Result<String>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get_text(&self, url: &Url) -> Result<String> {
        (**self).get_text(url)
    }
}

/// Fetches `http` and `https` URLs with a blocking HTTP client and `file`
/// URLs straight from disk, which lets a project point at a local checkout.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> HttpFetcher {
        HttpFetcher {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        HttpFetcher::new()
    }
}

impl Fetch for HttpFetcher {
    fn get_text(&self, url: &Url) -> Result<String> {
        log::debug!("GET {}", url);
        match url.scheme() {
            "http" | "https" => match self.agent.get(url.as_str()).call() {
                Ok(response) => response.into_string().map_err(|err| Error::Body {
                    url: url.clone(),
                    err,
                }),
                Err(ureq::Error::Status(status, _)) => Err(Error::Status {
                    url: url.clone(),
                    status,
                }),
                Err(ureq::Error::Transport(transport)) => Err(Error::Transport {
                    url: url.clone(),
                    message: transport.to_string(),
                }),
            },
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| Error::UnsupportedUrl(url.clone()))?;
                std::fs::read_to_string(&path).map_err(|err| Error::File { path, err })
            }
            _ => Err(Error::UnsupportedUrl(url.clone())),
        }
    }
}

/// The result of a fetch.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed fetch.
#[derive(Debug)]
pub enum Error {
    /// The server answered with a non-OK status.
    Status { url: Url, status: u16 },

    /// The request never produced a response (DNS, connection, TLS).
    Transport { url: Url, message: String },

    /// The response body could not be read as text.
    Body { url: Url, err: std::io::Error },

    /// A `file` URL could not be read.
    File { path: PathBuf, err: std::io::Error },

    /// The URL's scheme is neither `http`, `https`, nor `file`.
    UnsupportedUrl(Url),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Status { url, status } => {
                write!(f, "fetching `{}`: server responded {}", url, status)
            }
            Error::Transport { url, message } => {
                write!(f, "fetching `{}`: {}", url, message)
            }
            Error::Body { url, err } => {
                write!(f, "reading response from `{}`: {}", url, err)
            }
            Error::File { path, err } => {
                write!(f, "reading `{}`: {}", path.display(), err)
            }
            Error::UnsupportedUrl(url) => write!(f, "unsupported URL `{}`", url),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Body { url: _, err } => Some(err),
            Error::File { path: _, err } => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_url_reads_from_disk() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("2026-01-05_Hello.txt");
        std::fs::File::create(&path)?.write_all("안녕, world".as_bytes())?;

        let url = Url::from_file_path(&path).map_err(|_| "bad path")?;
        assert_eq!("안녕, world", HttpFetcher::new().get_text(&url)?);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let url = Url::from_file_path(dir.path().join("nope.txt")).map_err(|_| "bad path")?;
        match HttpFetcher::new().get_text(&url) {
            Err(Error::File { .. }) => Ok(()),
            other => panic!("expected a file error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_scheme() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let url = Url::parse("ftp://example.com/posts.json")?;
        match HttpFetcher::new().get_text(&url) {
            Err(Error::UnsupportedUrl(u)) => assert_eq!(url, u),
            other => panic!("expected an unsupported URL error, got {:?}", other),
        }
        Ok(())
    }
}
