//! Splits the post store into fixed-size index pages and computes the
//! navigation controls for a page. The controls show a window of at most
//! three page numbers around the current page, with shortcuts to the first
//! and last pages and ellipses where pages are skipped:
//!
//! ```text
//! 1 2 3 … 66  Next › Last »
//! « First ‹ Prev 1 … 31 32 33 … 66 Next › Last »
//! « First ‹ Prev 1 … 64 65 66
//! ```

use crate::post::PostStore;

/// The number of posts per index page unless the project overrides it.
pub const DEFAULT_PAGE_SIZE: usize = 1;

/// One navigation control under the index list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    First,
    Prev(usize),
    Number { page: usize, active: bool },
    Ellipsis,
    Next(usize),
    Last(usize),
}

impl Control {
    /// The page this control navigates to, if it is clickable.
    pub fn target(&self) -> Option<usize> {
        match *self {
            Control::First => Some(1),
            Control::Prev(page) | Control::Next(page) | Control::Last(page) => Some(page),
            Control::Number { page, .. } => Some(page),
            Control::Ellipsis => None,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Control::First => "« First".to_owned(),
            Control::Prev(_) => "‹ Prev".to_owned(),
            Control::Number { page, .. } => page.to_string(),
            Control::Ellipsis => "...".to_owned(),
            Control::Next(_) => "Next ›".to_owned(),
            Control::Last(_) => "Last »".to_owned(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Control::Number { active: true, .. })
    }
}

/// The number of pages needed for `count` items at `page_size` per page.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    match count % page_size {
        0 => count / page_size,
        _ => count / page_size + 1,
    }
}

/// Computes the controls for `current` out of `total` pages. Nothing is
/// shown when there is at most one page.
pub fn pagination_controls(current: usize, total: usize) -> Vec<Control> {
    let mut controls = Vec::new();
    if total <= 1 {
        return controls;
    }

    if current > 1 {
        controls.push(Control::First);
        controls.push(Control::Prev(current - 1));
    }

    let mut start = current.saturating_sub(1).max(1);
    let end = total.min(start + 2);

    // keep the window three wide near the end
    if end == total {
        start = total.saturating_sub(2).max(1);
    }

    if start > 1 {
        controls.push(Control::Number {
            page: 1,
            active: current == 1,
        });
        if start > 2 {
            controls.push(Control::Ellipsis);
        }
    }

    for page in start..=end {
        controls.push(Control::Number {
            page,
            active: page == current,
        });
    }

    if end < total {
        if end < total - 1 {
            controls.push(Control::Ellipsis);
        }
        controls.push(Control::Number {
            page: total,
            active: current == total,
        });
    }

    if current < total {
        controls.push(Control::Next(current + 1));
        controls.push(Control::Last(total));
    }

    controls
}

/// A row of the index list.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexRow {
    /// The post's position in the store, used to open it.
    pub position: usize,
    pub title: String,
    pub date: String,
}

/// A rendered index page: its rows and the controls beneath them.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexPage {
    pub number: usize,
    pub total: usize,
    pub rows: Vec<IndexRow>,
    pub controls: Vec<Control>,
}

/// Tracks the current index page.
#[derive(Clone, Debug)]
pub struct Paginator {
    page_size: usize,
    current: usize,
}

impl Paginator {
    /// Creates a paginator. A `page_size` of zero is treated as one.
    pub fn new(page_size: usize) -> Paginator {
        Paginator {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Renders page `requested` of `store`. The request is clamped to the
    /// pages that exist, so the current page is always valid.
    pub fn render(&mut self, store: &PostStore, requested: usize) -> IndexPage {
        let total = total_pages(store.len(), self.page_size);
        self.current = requested.max(1).min(total.max(1));

        let start = (self.current - 1) * self.page_size;
        let rows = store
            .iter()
            .enumerate()
            .skip(start)
            .take(self.page_size)
            .map(|(position, post)| IndexRow {
                position,
                title: post.title.clone(),
                date: post.date.clone(),
            })
            .collect();

        IndexPage {
            number: self.current,
            total,
            rows,
            controls: pagination_controls(self.current, total),
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Paginator::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::PostSummary;
    use serde_json::Map;
    use url::Url;

    fn numbers(controls: &[Control]) -> Vec<usize> {
        controls
            .iter()
            .filter_map(|c| match c {
                Control::Number { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    fn labels(controls: &[Control]) -> String {
        controls
            .iter()
            .map(|c| match c.is_active() {
                true => format!("[{}]", c.label()),
                false => c.label(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn store(count: usize) -> PostStore {
        let base = Url::parse("https://example.com/posts/").unwrap();
        PostStore::new(
            (0..count)
                .map(|i| PostSummary {
                    date: format!("2026-01-{:02}", i + 1),
                    title: format!("Post {}", i + 1),
                    filename: format!("{}.txt", i + 1),
                    url: base.join(&format!("{}.txt", i + 1)).unwrap(),
                    extra: Map::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(0, total_pages(0, 1));
        assert_eq!(3, total_pages(3, 1));
        assert_eq!(2, total_pages(3, 2));
        assert_eq!(1, total_pages(10, 10));
    }

    #[test]
    fn test_no_controls_for_single_page() {
        assert!(pagination_controls(1, 0).is_empty());
        assert!(pagination_controls(1, 1).is_empty());
    }

    #[test]
    fn test_first_page_of_many() {
        assert_eq!("[1] 2 3 ... 66 Next › Last »", labels(&pagination_controls(1, 66)));
    }

    #[test]
    fn test_middle_page() {
        assert_eq!(
            "« First ‹ Prev 1 ... 31 [32] 33 ... 66 Next › Last »",
            labels(&pagination_controls(32, 66)),
        );
    }

    #[test]
    fn test_last_page_of_many() {
        assert_eq!("« First ‹ Prev 1 ... 64 65 [66]", labels(&pagination_controls(66, 66)));
    }

    #[test]
    fn test_near_the_edges() {
        assert_eq!(
            "« First ‹ Prev 1 [2] 3 ... 10 Next › Last »",
            labels(&pagination_controls(2, 10)),
        );
        assert_eq!(
            "« First ‹ Prev 1 2 [3] 4 ... 10 Next › Last »",
            labels(&pagination_controls(3, 10)),
        );
        assert_eq!(
            "« First ‹ Prev 1 ... 8 [9] 10 Next › Last »",
            labels(&pagination_controls(9, 10)),
        );
        assert_eq!(
            "« First ‹ Prev 1 ... 7 [8] 9 10 Next › Last »",
            labels(&pagination_controls(8, 10)),
        );
    }

    #[test]
    fn test_small_totals_show_every_page() {
        assert_eq!("[1] 2 Next › Last »", labels(&pagination_controls(1, 2)));
        assert_eq!("« First ‹ Prev 1 [2] 3 Next › Last »", labels(&pagination_controls(2, 3)));
        assert_eq!("« First ‹ Prev 1 2 [3]", labels(&pagination_controls(3, 3)));
    }

    #[test]
    fn test_window_properties_hold_everywhere() {
        for total in 0..40 {
            for current in 1..=total.max(1) {
                let controls = pagination_controls(current, total);
                if total <= 1 {
                    assert!(controls.is_empty());
                    continue;
                }
                let pages = numbers(&controls);
                assert!(pages.windows(2).all(|w| w[0] < w[1]), "{:?}", pages);
                assert!(pages.contains(&current));
                assert!(pages.len() <= 5, "{} of {}: {:?}", current, total, pages);
                let ellipses = controls.iter().filter(|c| **c == Control::Ellipsis).count();
                assert!(ellipses <= 2);
                for control in &controls {
                    if let Some(target) = control.target() {
                        assert!((1..=total).contains(&target));
                    }
                }
                assert_eq!(1, controls.iter().filter(|c| c.is_active()).count());
            }
        }
    }

    #[test]
    fn test_render_one_item_per_page() {
        let store = store(5);
        let mut paginator = Paginator::default();
        for page in 1..=5 {
            let index = paginator.render(&store, page);
            assert_eq!(1, index.rows.len());
            assert_eq!(page - 1, index.rows[0].position);
            assert_eq!(format!("Post {}", page), index.rows[0].title);
            assert_eq!(page, paginator.current());
        }
    }

    #[test]
    fn test_render_clamps_requested_page() {
        let store = store(3);
        let mut paginator = Paginator::new(2);
        let index = paginator.render(&store, 9);
        assert_eq!(2, index.number);
        assert_eq!(vec!["Post 3"], index.rows.iter().map(|r| r.title.as_str()).collect::<Vec<_>>());

        let index = paginator.render(&store, 0);
        assert_eq!(1, index.number);
        assert_eq!(2, index.rows.len());
    }

    #[test]
    fn test_render_empty_store() {
        let mut paginator = Paginator::default();
        let index = paginator.render(&PostStore::default(), 1);
        assert_eq!(1, index.number);
        assert_eq!(0, index.total);
        assert!(index.rows.is_empty());
        assert!(index.controls.is_empty());
    }
}
