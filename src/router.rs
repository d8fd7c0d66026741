//! Maps page names to views and keeps the history in step with them. Every
//! navigation hides all views but one; user navigation pushes a history
//! entry while restoring from history (back/forward) does not.

use crate::shell::Shell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The mutually exclusive top-level views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Detail,
    Intro,
    Index,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Detail, Page::Intro, Page::Index];

    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Detail => "detail",
            Page::Intro => "intro",
            Page::Index => "index",
        }
    }

    /// The id of the element holding this page's view.
    pub fn view_id(self) -> &'static str {
        match self {
            Page::Home => "home-view",
            Page::Detail => "detail-view",
            Page::Intro => "intro-view",
            Page::Index => "index-view",
        }
    }

    /// Parses a location hash such as `#index`. Empty and unknown hashes map
    /// to [`Page::Home`].
    pub fn from_hash(hash: &str) -> Page {
        hash.trim_start_matches('#').parse().unwrap_or(Page::Home)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = UnknownPageError;

    fn from_str(s: &str) -> Result<Page, UnknownPageError> {
        Page::ALL
            .iter()
            .copied()
            .find(|page| page.name() == s)
            .ok_or_else(|| UnknownPageError(s.to_owned()))
    }
}

#[derive(Debug)]
pub struct UnknownPageError(String);

impl fmt::Display for UnknownPageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown page `{}`", self.0)
    }
}

impl std::error::Error for UnknownPageError {}

/// The state attached to each history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub page: Page,
}

impl HistoryState {
    pub fn new(page: Page) -> HistoryState {
        HistoryState { page }
    }

    /// The location hash recorded alongside the state, e.g. `#detail`.
    pub fn hash(&self) -> String {
        format!("#{}", self.page)
    }
}

/// Tracks the visible page.
#[derive(Clone, Debug)]
pub struct Router {
    current: Page,
}

impl Router {
    pub fn new() -> Router {
        Router {
            current: Page::Home,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    /// Establishes the initial page from the location hash, replacing the
    /// current history entry instead of pushing a new one.
    pub fn start<S: Shell>(&mut self, shell: &mut S, hash: &str) -> Page {
        let page = Page::from_hash(hash);
        shell.replace_state(HistoryState::new(page));
        self.show_page(shell, page, false);
        page
    }

    /// Shows `page` and hides every other view. When `record` is set a
    /// history entry is pushed for it.
    pub fn show_page<S: Shell>(&mut self, shell: &mut S, page: Page, record: bool) {
        for view in Page::ALL.iter() {
            shell.set_view_visible(*view, false);
        }
        shell.set_view_visible(page, true);
        if record {
            shell.push_state(HistoryState::new(page));
        }
        self.current = page;
        log::debug!("showing {}", page);
        shell.scroll_to_top();
    }

    /// Restores the page recorded in a history entry without pushing a new
    /// one. Entries without state restore [`Page::Home`].
    pub fn on_popstate<S: Shell>(&mut self, shell: &mut S, state: Option<HistoryState>) -> Page {
        let page = state.map_or(Page::Home, |state| state.page);
        self.show_page(shell, page, false);
        page
    }
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}
