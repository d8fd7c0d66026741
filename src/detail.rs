//! Loads a post's text for the detail view. Every load is tagged with a
//! token; only the completion carrying the newest token may touch the view,
//! so a slow, superseded request can never overwrite a later one.

use crate::fetch;
use crate::post::PostSummary;
use url::Url;

/// What the detail view shows.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub content: String,
}

/// An in-flight load.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailRequest {
    token: u64,
    pub url: Url,
    pub title: String,
}

impl DetailRequest {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// How a completed load was handled.
#[derive(Debug)]
pub enum Outcome {
    /// The view now shows the post.
    Shown,

    /// A newer request was started meanwhile; the result was dropped.
    Superseded,

    /// The fetch failed and the view was left alone.
    Failed(fetch::Error),
}

#[derive(Clone, Debug, Default)]
pub struct DetailLoader {
    next_token: u64,
    latest: Option<u64>,
    view: Option<DetailView>,
}

impl DetailLoader {
    pub fn new() -> DetailLoader {
        DetailLoader::default()
    }

    /// The post currently in the view, if any has been shown.
    pub fn view(&self) -> Option<&DetailView> {
        self.view.as_ref()
    }

    /// Starts a load for `post`, superseding any load still in flight.
    pub fn begin(&mut self, post: &PostSummary) -> DetailRequest {
        self.next_token += 1;
        self.latest = Some(self.next_token);
        DetailRequest {
            token: self.next_token,
            url: post.url.clone(),
            title: post.title.clone(),
        }
    }

    /// Finishes a load with the fetch result. The view only changes when
    /// `request` is the newest one and the fetch succeeded.
    pub fn complete(&mut self, request: DetailRequest, result: fetch::Result<String>) -> Outcome {
        if self.latest != Some(request.token) {
            log::debug!("dropping superseded load of {}", request.url);
            return Outcome::Superseded;
        }
        self.latest = None;
        match result {
            Ok(content) => {
                self.view = Some(DetailView {
                    title: request.title,
                    content,
                });
                Outcome::Shown
            }
            Err(err) => Outcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::Map;

    fn post(title: &str) -> PostSummary {
        PostSummary {
            date: "2026-01-05".to_owned(),
            title: title.to_owned(),
            filename: format!("{}.txt", title),
            url: Url::parse(&format!("https://example.com/{}.txt", title)).unwrap(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_shown() {
        let mut loader = DetailLoader::new();
        let request = loader.begin(&post("a"));
        assert_eq!("https://example.com/a.txt", request.url.as_str());
        assert!(matches!(loader.complete(request, Ok("body".to_owned())), Outcome::Shown));
        assert_eq!(
            Some(&DetailView {
                title: "a".to_owned(),
                content: "body".to_owned()
            }),
            loader.view(),
        );
    }

    #[test]
    fn test_superseded_request_is_dropped() {
        let mut loader = DetailLoader::new();
        let first = loader.begin(&post("a"));
        let second = loader.begin(&post("b"));
        assert!(second.token() > first.token());

        assert!(matches!(loader.complete(second, Ok("b".to_owned())), Outcome::Shown));
        assert!(matches!(loader.complete(first, Ok("a".to_owned())), Outcome::Superseded));
        assert_eq!(Some("b"), loader.view().map(|v| v.title.as_str()));
    }

    #[test]
    fn test_failure_keeps_previous_view() {
        let mut loader = DetailLoader::new();
        let request = loader.begin(&post("a"));
        loader.complete(request, Ok("first".to_owned()));

        let request = loader.begin(&post("b"));
        let url = request.url.clone();
        let outcome = loader.complete(request, Err(fetch::Error::Status { url, status: 500 }));
        assert!(matches!(outcome, Outcome::Failed(fetch::Error::Status { status: 500, .. })));
        assert_eq!(Some("first"), loader.view().map(|v| v.content.as_str()));
    }
}
