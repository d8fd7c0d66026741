//! Defines the [`Shell`] trait, the surface the front end draws on: views
//! that can be shown or hidden, a history stack, the header, the detail and
//! index fields, and user-facing alerts. [`MemoryShell`] keeps all of it in
//! memory; the terminal front end and the tests both drive it.

use crate::paginate::IndexPage;
use crate::router::{HistoryState, Page};
use std::collections::BTreeMap;

pub trait Shell {
    fn set_view_visible(&mut self, page: Page, visible: bool);

    /// Adds a history entry after the current one, dropping any forward
    /// entries.
    fn push_state(&mut self, state: HistoryState);

    /// Overwrites the current history entry.
    fn replace_state(&mut self, state: HistoryState);

    fn scroll_to_top(&mut self);

    fn set_header_hidden(&mut self, hidden: bool);

    fn set_detail(&mut self, title: &str, content: &str);

    fn set_index(&mut self, page: &IndexPage);

    /// Tells the user something went wrong.
    fn alert(&mut self, message: &str);
}

/// A browser-style history stack with a cursor.
#[derive(Clone, Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<HistoryState>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<HistoryState> {
        self.entries.get(self.cursor).copied()
    }

    /// The location hash of the current entry, or `""` before any entry
    /// exists.
    pub fn location(&self) -> String {
        self.current().map(|state| state.hash()).unwrap_or_default()
    }

    pub fn push(&mut self, state: HistoryState) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(state);
        self.cursor = self.entries.len() - 1;
    }

    pub fn replace(&mut self, state: HistoryState) {
        match self.entries.get_mut(self.cursor) {
            Some(entry) => *entry = state,
            None => self.push(state),
        }
    }

    /// Moves one entry back and returns its state, or `None` at the start.
    pub fn back(&mut self) -> Option<HistoryState> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Moves one entry forward and returns its state, or `None` at the end.
    pub fn forward(&mut self) -> Option<HistoryState> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryShell {
    visible: BTreeMap<Page, bool>,
    history: MemoryHistory,
    scroll_resets: usize,
    header_hidden: bool,
    detail_title: String,
    detail_content: String,
    index: Option<IndexPage>,
    alerts: Vec<String>,
}

impl MemoryShell {
    pub fn new() -> MemoryShell {
        MemoryShell::default()
    }

    pub fn is_visible(&self, page: Page) -> bool {
        self.visible.get(&page).copied().unwrap_or(false)
    }

    /// The single visible page, if exactly one is visible.
    pub fn visible_page(&self) -> Option<Page> {
        let mut visible = Page::ALL.iter().copied().filter(|p| self.is_visible(*p));
        match (visible.next(), visible.next()) {
            (Some(page), None) => Some(page),
            _ => None,
        }
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut MemoryHistory {
        &mut self.history
    }

    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn header_hidden(&self) -> bool {
        self.header_hidden
    }

    pub fn detail_title(&self) -> &str {
        &self.detail_title
    }

    pub fn detail_content(&self) -> &str {
        &self.detail_content
    }

    pub fn index(&self) -> Option<&IndexPage> {
        self.index.as_ref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Drains the alerts raised since the last call.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

impl Shell for MemoryShell {
    fn set_view_visible(&mut self, page: Page, visible: bool) {
        self.visible.insert(page, visible);
    }

    fn push_state(&mut self, state: HistoryState) {
        self.history.push(state);
    }

    fn replace_state(&mut self, state: HistoryState) {
        self.history.replace(state);
    }

    fn scroll_to_top(&mut self) {
        self.scroll_resets += 1;
    }

    fn set_header_hidden(&mut self, hidden: bool) {
        self.header_hidden = hidden;
    }

    fn set_detail(&mut self, title: &str, content: &str) {
        self.detail_title = title.to_owned();
        self.detail_content = content.to_owned();
    }

    fn set_index(&mut self, page: &IndexPage) {
        self.index = Some(page.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn state(page: Page) -> HistoryState {
        HistoryState::new(page)
    }

    #[test]
    fn test_replace_on_empty_history_pushes() {
        let mut history = MemoryHistory::default();
        assert_eq!("", history.location());
        history.replace(state(Page::Index));
        assert_eq!(1, history.len());
        assert_eq!("#index", history.location());
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push(state(Page::Home));
        history.push(state(Page::Index));
        history.push(state(Page::Detail));
        assert_eq!(Some(state(Page::Index)), history.back());
        history.push(state(Page::Intro));
        assert_eq!(3, history.len());
        assert_eq!(None, history.forward());
        assert_eq!(Some(state(Page::Index)), history.back());
        assert_eq!(Some(state(Page::Home)), history.back());
        assert_eq!(None, history.back());
    }

    #[test]
    fn test_visible_page_requires_exactly_one() {
        let mut shell = MemoryShell::new();
        assert_eq!(None, shell.visible_page());
        shell.set_view_visible(Page::Home, true);
        assert_eq!(Some(Page::Home), shell.visible_page());
        shell.set_view_visible(Page::Index, true);
        assert_eq!(None, shell.visible_page());
    }

    #[test]
    fn test_take_alerts_drains() {
        let mut shell = MemoryShell::new();
        shell.alert("one");
        shell.alert("two");
        assert_eq!(vec!["one".to_owned(), "two".to_owned()], shell.take_alerts());
        assert!(shell.alerts().is_empty());
    }
}
