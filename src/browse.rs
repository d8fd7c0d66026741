//! The terminal front end. [`Browser`] reads one command per line, hands it
//! to the [`App`], and prints whichever view is visible afterwards.

use crate::app::App;
use crate::calendar::{parse_month, EventCalendar};
use crate::config::Config;
use crate::fetch::Fetch;
use crate::paginate::IndexPage;
use crate::render::Templates;
use crate::router::Page;
use crate::shell::MemoryShell;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use std::io::{BufRead, Write};
use std::str::FromStr;

pub const HELP: &str = "commands:
  home                show the calendar
  calendar [YYYY-MM]  show the calendar, optionally for another month
  click ID            open the post behind calendar event ID
  index [N]           show the index, optionally at page N
  row N               open the post in index row N
  open YYYY-MM-DD     open the post published on a date
  random              open a random post
  intro               show the introduction
  back | forward      move through history
  help | quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Home,
    Calendar(Option<(i32, u32)>),
    Click(usize),
    Index(Option<usize>),
    Row(usize),
    Open(String),
    Random,
    Intro,
    Back,
    Forward,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Command, String> {
        let mut words = s.split_whitespace();
        let name = words.next().unwrap_or_default();
        let arg = words.next();
        let number = |what: &str| -> Result<usize, String> {
            arg.and_then(|a| a.parse().ok())
                .ok_or_else(|| format!("`{}` needs {}", name, what))
        };
        match name {
            "home" => Ok(Command::Home),
            "calendar" => match arg {
                None => Ok(Command::Calendar(None)),
                Some(month) => parse_month(month)
                    .map(|m| Command::Calendar(Some(m)))
                    .ok_or_else(|| format!("`{}` is not a YYYY-MM month", month)),
            },
            "click" => number("an event id").map(Command::Click),
            "index" => match arg {
                None => Ok(Command::Index(None)),
                Some(_) => number("a page number").map(|n| Command::Index(Some(n))),
            },
            "page" => number("a page number").map(|n| Command::Index(Some(n))),
            "row" => number("a row number").map(Command::Row),
            "open" => arg
                .map(|date| Command::Open(date.to_owned()))
                .ok_or_else(|| "`open` needs a date".to_owned()),
            "random" => Ok(Command::Random),
            "intro" => Ok(Command::Intro),
            "back" => Ok(Command::Back),
            "forward" => Ok(Command::Forward),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(format!("unknown command `{}`; try `help`", name)),
        }
    }
}

pub struct Browser<F> {
    app: App<MemoryShell, EventCalendar, F>,
    config: Config,
    templates: Templates,
    month: (i32, u32),
    rng: StdRng,
}

impl<F: Fetch> Browser<F> {
    pub fn new(config: Config, templates: Templates, fetcher: F, rng: StdRng) -> Browser<F> {
        let today = chrono::Local::now().date_naive();
        Browser {
            app: App::new(
                MemoryShell::new(),
                EventCalendar::new(),
                fetcher,
                config.index_page_size,
            ),
            config,
            templates,
            month: (today.year(), today.month()),
            rng,
        }
    }

    pub fn app(&self) -> &App<MemoryShell, EventCalendar, F> {
        &self.app
    }

    /// Loads the posts and shows the page named by `hash`. The calendar opens
    /// on the month of the first post.
    pub fn start(&mut self, hash: &str) {
        let source = self.config.post_source();
        self.app.start(source.as_ref(), hash);
        if let Some(date) = self
            .app
            .store()
            .get(0)
            .and_then(|post| NaiveDate::parse_from_str(&post.date, "%Y-%m-%d").ok())
        {
            self.month = (date.year(), date.month());
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Home => self.app.show_page(Page::Home, true),
            Command::Calendar(month) => {
                if let Some(month) = month {
                    self.month = month;
                }
                if self.app.current_page() != Page::Home {
                    self.app.show_page(Page::Home, true);
                }
            }
            Command::Click(id) => {
                self.app.click_calendar_event(id);
            }
            Command::Index(number) => {
                if let Some(number) = number {
                    self.app.render_index(number);
                }
                if self.app.current_page() != Page::Index {
                    self.app.show_page(Page::Index, true);
                }
            }
            Command::Row(position) => {
                self.app.open_row(position);
            }
            Command::Open(date) => {
                if !self.app.open_by_date(&date) {
                    log::info!("no post on {}", date);
                }
            }
            Command::Random => {
                self.app.show_random(&mut self.rng);
            }
            Command::Intro => self.app.show_page(Page::Intro, true),
            Command::Back => {
                if let Some(state) = self.app.shell_mut().history_mut().back() {
                    self.app.on_popstate(Some(state));
                }
            }
            Command::Forward => {
                if let Some(state) = self.app.shell_mut().history_mut().forward() {
                    self.app.on_popstate(Some(state));
                }
            }
            Command::Help | Command::Quit => {}
        }
    }

    /// Prints pending alerts and then the visible view.
    pub fn print_view<W: Write>(&mut self, mut out: W) -> Result<()> {
        for alert in self.app.shell_mut().take_alerts() {
            writeln!(out, "! {}", alert)?;
        }
        let site = self.config.title.as_str();
        let text = match self.app.current_page() {
            Page::Home => {
                let (year, month) = self.month;
                let events = self.app.calendar().month(year, month);
                self.templates.render_calendar(
                    site,
                    &format!("{:04}-{:02}", year, month),
                    &events,
                )?
            }
            Page::Detail => match self.app.detail() {
                Some(view) => self.templates.render_detail(view)?,
                None => String::from("(no post selected)\n"),
            },
            Page::Intro => self.templates.render_intro(site, &self.config.intro)?,
            Page::Index => match self.app.shell().index() {
                Some(index) => self.templates.render_index(site, index)?,
                None => self.templates.render_index(
                    site,
                    &IndexPage {
                        number: 1,
                        total: 0,
                        rows: Vec::new(),
                        controls: Vec::new(),
                    },
                )?,
            },
        };
        write!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }

    /// Runs commands from `input` until it ends or `quit` is read.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        self.print_view(&mut out)?;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => writeln!(out, "{}", HELP)?,
                Ok(command) => {
                    self.execute(command);
                    self.print_view(&mut out)?;
                }
                Err(message) => writeln!(out, "{}", message)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::SourceConfig;
    use crate::fetch::{self, Error as FetchError};
    use rand::SeedableRng;
    use std::collections::HashMap;
    use url::Url;

    struct Canned(HashMap<String, String>);

    impl Fetch for Canned {
        fn get_text(&self, url: &Url) -> fetch::Result<String> {
            self.0.get(url.as_str()).cloned().ok_or(FetchError::Status {
                url: url.clone(),
                status: 404,
            })
        }
    }

    fn browser() -> Browser<Canned> {
        let mut bodies = HashMap::new();
        bodies.insert(
            "https://example.com/posts.json".to_owned(),
            r#"[
                {"filename": "2026-01-06_Second.txt", "title": "Second", "date": "2026-01-06"},
                {"filename": "2026-01-05_Hello.txt", "title": "Hello", "date": "2026-01-05"}
            ]"#
            .to_owned(),
        );
        bodies.insert(
            "https://raw.example.com/posts/2026-01-05_Hello.txt".to_owned(),
            "Hello, calendar.".to_owned(),
        );
        let config = Config {
            title: "ZINSIDEME".to_owned(),
            intro: "A diary in plain text.".to_owned(),
            source: SourceConfig::Manifest(Url::parse("https://example.com/posts.json").unwrap()),
            content_base: Url::parse("https://raw.example.com/posts/").unwrap(),
            index_page_size: 1,
            theme_directory: None,
        };
        Browser::new(
            config,
            Templates::load(None).unwrap(),
            Canned(bodies),
            StdRng::seed_from_u64(1),
        )
    }

    fn run(browser: &mut Browser<Canned>, script: &str) -> String {
        let mut out = Vec::new();
        browser.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Ok(Command::Index(None)), "index".parse());
        assert_eq!(Ok(Command::Index(Some(2))), "index 2".parse());
        assert_eq!(Ok(Command::Index(Some(3))), "page 3".parse());
        assert!("index two".parse::<Command>().is_err());
        assert_eq!(Ok(Command::Calendar(Some((2026, 2)))), "calendar 2026-02".parse());
        assert_eq!(Ok(Command::Calendar(None)), "calendar".parse());
        assert_eq!(Ok(Command::Open("2026-01-05".to_owned())), "open 2026-01-05".parse());
        assert!("page".parse::<Command>().is_err());
        assert!("page two".parse::<Command>().is_err());
        assert!("calendar soon".parse::<Command>().is_err());
        assert!("fly".parse::<Command>().is_err());
    }

    #[test]
    fn test_home_shows_month_of_first_post() {
        let mut browser = browser();
        browser.start("");
        let out = run(&mut browser, "");
        assert!(out.contains("ZINSIDEME · 2026-01"), "{}", out);
        assert!(out.contains("(1) 2026-01-05  · Hello"), "{}", out);
        assert!(out.contains("(0) 2026-01-06  · Second"), "{}", out);
    }

    #[test]
    fn test_open_then_back() {
        let mut browser = browser();
        browser.start("#index");
        let out = run(&mut browser, "page 2\nrow 1\nback\nquit\nintro\n");
        assert!(out.contains("index page 2 of 2"), "{}", out);
        assert!(out.contains("Hello, calendar."), "{}", out);
        assert_eq!(Page::Index, browser.app().current_page());
        assert!(!out.contains("A diary in plain text."), "{}", out);
    }

    #[test]
    fn test_index_jumps_to_page() {
        let mut browser = browser();
        browser.start("");
        let out = run(&mut browser, "index 2\n");
        assert!(out.contains("index page 2 of 2"), "{}", out);
        assert_eq!(Page::Index, browser.app().current_page());
        assert_eq!(2, browser.app().index_page_number());
    }

    #[test]
    fn test_failed_open_prints_alert() {
        let mut browser = browser();
        browser.start("");
        let out = run(&mut browser, "open 2026-01-06\n");
        assert!(out.contains("! Could not load the post content."), "{}", out);
        assert_eq!(Page::Home, browser.app().current_page());
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let mut browser = browser();
        browser.start("");
        let out = run(&mut browser, "fly\n");
        assert!(out.contains("unknown command `fly`"), "{}", out);
    }
}
