//! Defines [`App`], the application state built once at startup. It owns the
//! post store, the router, the paginator, the calendar adapter, the detail
//! loader, and the smart header, and it is the single place user events are
//! dispatched to: index rows, pagination controls, calendar clicks, the
//! random button, scrolling, and back/forward navigation.

use crate::calendar::{Calendar, CalendarAdapter};
use crate::detail::{DetailLoader, DetailView, Outcome};
use crate::fetch::Fetch;
use crate::header::SmartHeader;
use crate::paginate::{Control, IndexPage, Paginator};
use crate::post::{PostStore, PostSummary};
use crate::router::{HistoryState, Page, Router};
use crate::shell::Shell;
use crate::source::PostSource;
use rand::Rng;

/// Shown to the user when a post's text cannot be fetched.
pub const DETAIL_LOAD_FAILED: &str = "Could not load the post content.";

pub struct App<S, C, F> {
    store: PostStore,
    router: Router,
    paginator: Paginator,
    calendar: CalendarAdapter<C>,
    detail: DetailLoader,
    header: SmartHeader,
    shell: S,
    fetcher: F,
}

impl<S: Shell, C: Calendar, F: Fetch> App<S, C, F> {
    pub fn new(shell: S, calendar: C, fetcher: F, page_size: usize) -> App<S, C, F> {
        App {
            store: PostStore::default(),
            router: Router::new(),
            paginator: Paginator::new(page_size),
            calendar: CalendarAdapter::new(calendar),
            detail: DetailLoader::new(),
            header: SmartHeader::default(),
            shell,
            fetcher,
        }
    }

    /// Loads the posts, then shows the page named by the location `hash`
    /// (`home` when empty) without pushing history.
    pub fn start(&mut self, source: &dyn PostSource, hash: &str) {
        self.load(source);
        let page = self.router.start(&mut self.shell, hash);
        if page == Page::Home {
            self.calendar.recompute_layout();
        }
    }

    /// Populates the store from `source` and renders the calendar and the
    /// first index page. A failed load is logged and leaves the store empty
    /// and the calendar and index untouched.
    pub fn load(&mut self, source: &dyn PostSource) {
        match source.load(&self.fetcher) {
            Ok(store) => {
                self.store = store;
                self.calendar.load(&self.store);
                self.render_index(1);
            }
            Err(err) => log::error!("could not load posts: {}", err),
        }
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn calendar(&self) -> &C {
        self.calendar.calendar()
    }

    pub fn current_page(&self) -> Page {
        self.router.current()
    }

    /// The index page number currently rendered.
    pub fn index_page_number(&self) -> usize {
        self.paginator.current()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.view()
    }

    pub fn show_page(&mut self, page: Page, record: bool) {
        self.router.show_page(&mut self.shell, page, record);
        if page == Page::Home {
            self.calendar.recompute_layout();
        }
    }

    /// Handles a back/forward navigation.
    pub fn on_popstate(&mut self, state: Option<HistoryState>) {
        let page = self.router.on_popstate(&mut self.shell, state);
        if page == Page::Home {
            self.calendar.recompute_layout();
        }
    }

    /// Renders index page `page` (clamped to the pages that exist) into the
    /// shell and returns it.
    pub fn render_index(&mut self, page: usize) -> IndexPage {
        let index = self.paginator.render(&self.store, page);
        self.shell.set_index(&index);
        index
    }

    /// Handles a click on a pagination control. Ellipses do nothing.
    pub fn activate_control(&mut self, control: Control) {
        if let Some(page) = control.target() {
            self.render_index(page);
        }
    }

    /// Fetches `post` and shows it in the detail view. On failure the user
    /// is alerted and the current view stays as it was. Returns whether the
    /// post is now shown.
    pub fn open_post(&mut self, post: &PostSummary) -> bool {
        let request = self.detail.begin(post);
        let result = self.fetcher.get_text(&request.url);
        match self.detail.complete(request, result) {
            Outcome::Shown => {
                if let Some(view) = self.detail.view() {
                    self.shell.set_detail(&view.title, &view.content);
                }
                self.show_page(Page::Detail, true);
                true
            }
            Outcome::Superseded => false,
            Outcome::Failed(err) => {
                log::warn!("loading post `{}`: {}", post.title, err);
                self.shell.alert(DETAIL_LOAD_FAILED);
                false
            }
        }
    }

    /// Handles a click on an index row.
    pub fn open_row(&mut self, position: usize) -> bool {
        match self.store.get(position).cloned() {
            Some(post) => self.open_post(&post),
            None => false,
        }
    }

    pub fn open_by_date(&mut self, date: &str) -> bool {
        match self.store.find_by_date(date).cloned() {
            Some(post) => self.open_post(&post),
            None => false,
        }
    }

    /// Handles a click on calendar event `id`.
    pub fn click_calendar_event(&mut self, id: usize) -> bool {
        match self.calendar.click(id) {
            Some(post) => self.open_post(&post),
            None => false,
        }
    }

    /// Opens a uniformly random post. Does nothing when there are no posts.
    pub fn show_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.store.is_empty() {
            return false;
        }
        let position = rng.gen_range(0..self.store.len());
        self.open_row(position)
    }

    pub fn on_scroll(&mut self, y: f64) {
        let hidden = self.header.on_scroll(y);
        self.shell.set_header_hidden(hidden);
    }
}
