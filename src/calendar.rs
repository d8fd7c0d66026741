//! The calendar adapter. Posts are turned into calendar events which carry
//! the originating [`PostSummary`] so a click on an event can open the post.
//! The calendar widget itself sits behind the [`Calendar`] trait;
//! [`EventCalendar`] is the in-memory widget used by the terminal front end,
//! and it can export its events in the JSON shape FullCalendar expects.

use crate::post::{PostStore, PostSummary};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::io::Write;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar event. Serializes as a FullCalendar event object:
/// `{"title", "start", "extendedProps": {"fileData": {...}}}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: String,

    #[serde(rename = "extendedProps")]
    pub extended_props: ExtendedProps,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtendedProps {
    #[serde(rename = "fileData")]
    pub file_data: PostSummary,
}

impl CalendarEvent {
    pub fn from_post(post: &PostSummary) -> CalendarEvent {
        CalendarEvent {
            title: format!("· {}", post.title),
            start: post.date.clone(),
            extended_props: ExtendedProps {
                file_data: post.clone(),
            },
        }
    }

    /// The event's start as a date, if it parses as `YYYY-MM-DD`.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.start, DATE_FORMAT).ok()
    }

    pub fn post(&self) -> &PostSummary {
        &self.extended_props.file_data
    }
}

/// The operations the front end needs from a calendar widget.
pub trait Calendar {
    fn remove_all_events(&mut self);

    fn add_event_source(&mut self, events: Vec<CalendarEvent>);

    /// Looks up an event by the id the widget assigned it.
    fn event(&self, id: usize) -> Option<&CalendarEvent>;

    /// Recomputes the widget's layout, e.g. after it was hidden.
    fn update_size(&mut self);
}

/// An in-memory calendar. Event ids are positions in insertion order.
#[derive(Clone, Debug, Default)]
pub struct EventCalendar {
    events: Vec<CalendarEvent>,
    layout_passes: usize,
}

impl EventCalendar {
    pub fn new() -> EventCalendar {
        EventCalendar::default()
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// How many times the layout has been recomputed.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// The events starting in the given month, with their ids, ordered by
    /// date. Events whose start is not a valid date never show up here.
    pub fn month(&self, year: i32, month: u32) -> Vec<(usize, &CalendarEvent)> {
        let mut found: Vec<(NaiveDate, usize, &CalendarEvent)> = self
            .events
            .iter()
            .enumerate()
            .filter_map(|(id, event)| event.start_date().map(|date| (date, id, event)))
            .filter(|(date, _, _)| date.year() == year && date.month() == month)
            .collect();
        found.sort_by_key(|(date, id, _)| (*date, *id));
        found.into_iter().map(|(_, id, event)| (id, event)).collect()
    }

    /// Writes all events as a pretty-printed JSON array.
    pub fn write_json<W: Write>(&self, w: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(w, &self.events)
    }
}

impl Calendar for EventCalendar {
    fn remove_all_events(&mut self) {
        self.events.clear();
    }

    fn add_event_source(&mut self, events: Vec<CalendarEvent>) {
        self.events.extend(events);
    }

    fn event(&self, id: usize) -> Option<&CalendarEvent> {
        self.events.get(id)
    }

    fn update_size(&mut self) {
        self.layout_passes += 1;
    }
}

/// Feeds a [`Calendar`] from the post store and resolves clicks to posts.
pub struct CalendarAdapter<C> {
    calendar: C,
}

impl<C: Calendar> CalendarAdapter<C> {
    pub fn new(calendar: C) -> CalendarAdapter<C> {
        CalendarAdapter { calendar }
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// Replaces every event with one per post.
    pub fn load(&mut self, store: &PostStore) {
        let events: Vec<CalendarEvent> = store.iter().map(CalendarEvent::from_post).collect();
        log::debug!("adding {} calendar events", events.len());
        self.calendar.remove_all_events();
        self.calendar.add_event_source(events);
    }

    /// The post attached to the clicked event.
    pub fn click(&self, id: usize) -> Option<PostSummary> {
        self.calendar.event(id).map(|event| event.post().clone())
    }

    pub fn recompute_layout(&mut self) {
        self.calendar.update_size();
    }
}

/// Parses `YYYY-MM` into a year and month.
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), DATE_FORMAT).ok()?;
    Some((date.year(), date.month()))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::Map;
    use url::Url;

    fn post(date: &str, title: &str) -> PostSummary {
        PostSummary {
            date: date.to_owned(),
            title: title.to_owned(),
            filename: format!("{}_{}.txt", date, title),
            url: Url::parse(&format!("https://example.com/posts/{}_{}.txt", date, title)).unwrap(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_event_from_post() {
        let event = CalendarEvent::from_post(&post("2026-01-05", "Hello"));
        assert_eq!("· Hello", event.title);
        assert_eq!("2026-01-05", event.start);
        assert_eq!(NaiveDate::from_ymd_opt(2026, 1, 5), event.start_date());
        assert_eq!("Hello", event.post().title);
    }

    #[test]
    fn test_event_json_shape() {
        let event = CalendarEvent::from_post(&post("2026-01-05", "Hello"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!("· Hello", json["title"]);
        assert_eq!("2026-01-05", json["start"]);
        assert_eq!("Hello", json["extendedProps"]["fileData"]["title"]);
        assert_eq!(
            "https://example.com/posts/2026-01-05_Hello.txt",
            json["extendedProps"]["fileData"]["url"],
        );
    }

    #[test]
    fn test_load_replaces_events() {
        let mut adapter = CalendarAdapter::new(EventCalendar::new());
        adapter.load(&PostStore::new(vec![post("2026-01-05", "A"), post("2026-01-06", "B")]));
        adapter.load(&PostStore::new(vec![post("2026-02-01", "C")]));
        assert_eq!(1, adapter.calendar().events().len());
        assert_eq!(Some("C".to_owned()), adapter.click(0).map(|p| p.title));
        assert_eq!(None, adapter.click(1));
    }

    #[test]
    fn test_month_filters_and_orders() {
        let mut adapter = CalendarAdapter::new(EventCalendar::new());
        adapter.load(&PostStore::new(vec![
            post("2026-01-20", "Late"),
            post("2026-02-01", "Feb"),
            post("2026-01-03", "Early"),
            post("someday", "Bad"),
        ]));
        let titles: Vec<(usize, &str)> = adapter
            .calendar()
            .month(2026, 1)
            .into_iter()
            .map(|(id, event)| (id, event.post().title.as_str()))
            .collect();
        assert_eq!(vec![(2, "Early"), (0, "Late")], titles);
    }

    #[test]
    fn test_recompute_layout() {
        let mut adapter = CalendarAdapter::new(EventCalendar::new());
        adapter.recompute_layout();
        adapter.recompute_layout();
        assert_eq!(2, adapter.calendar().layout_passes());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(Some((2026, 1)), parse_month("2026-01"));
        assert_eq!(None, parse_month("2026-13"));
        assert_eq!(None, parse_month("January"));
    }
}
