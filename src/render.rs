//! Turns views into text with [`gtmpl`] templates. Each view (index, detail,
//! calendar, intro) has a built-in template; a theme directory may override
//! any of them with a file of the same name (`index.tmpl`, `detail.tmpl`,
//! `calendar.tmpl`, `intro.tmpl`).

use crate::calendar::CalendarEvent;
use crate::detail::DetailView;
use crate::paginate::{Control, IndexPage, IndexRow};
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

const INDEX_TEMPLATE: &str = "{{.site}} · index page {{.number}} of {{.total}}
{{if .rows}}{{range .rows}}  [{{.position}}] {{.title}}  {{.date}}
{{end}}{{else}}  (no posts)
{{end}}{{range .controls}}{{if .active}}[{{.label}}]{{else}}{{.label}}{{end}} {{end}}
";

const DETAIL_TEMPLATE: &str = "{{.title}}

{{.content}}
";

const CALENDAR_TEMPLATE: &str = "{{.site}} · {{.month}}
{{if .events}}{{range .events}}  ({{.id}}) {{.start}}  {{.title}}
{{end}}{{else}}  no posts this month
{{end}}";

const INTRO_TEMPLATE: &str = "{{.site}}

{{.intro}}
";

/// The parsed templates for every view.
pub struct Templates {
    index: Template,
    detail: Template,
    calendar: Template,
    intro: Template,
}

impl Templates {
    /// Parses the templates, preferring files from `theme_directory` over
    /// the built-in ones.
    pub fn load(theme_directory: Option<&Path>) -> Result<Templates> {
        Ok(Templates {
            index: parse_template("index.tmpl", theme_directory, INDEX_TEMPLATE)?,
            detail: parse_template("detail.tmpl", theme_directory, DETAIL_TEMPLATE)?,
            calendar: parse_template("calendar.tmpl", theme_directory, CALENDAR_TEMPLATE)?,
            intro: parse_template("intro.tmpl", theme_directory, INTRO_TEMPLATE)?,
        })
    }

    pub fn render_index(&self, site: &str, page: &IndexPage) -> Result<String> {
        let mut m = object(site);
        m.insert("number".to_owned(), Value::from(page.number as i64));
        m.insert("total".to_owned(), Value::from(page.total as i64));
        m.insert("rows".to_owned(), Value::Array(page.rows.iter().map(Value::from).collect()));
        m.insert(
            "controls".to_owned(),
            Value::Array(page.controls.iter().map(Value::from).collect()),
        );
        execute(&self.index, Value::Object(m))
    }

    pub fn render_detail(&self, view: &DetailView) -> Result<String> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::from(view.title.as_str()));
        m.insert("content".to_owned(), Value::from(view.content.as_str()));
        execute(&self.detail, Value::Object(m))
    }

    /// Renders one month of the calendar. `events` pairs each event with its
    /// id, as returned by [`crate::calendar::EventCalendar::month`].
    pub fn render_calendar(
        &self,
        site: &str,
        month: &str,
        events: &[(usize, &CalendarEvent)],
    ) -> Result<String> {
        let mut m = object(site);
        m.insert("month".to_owned(), Value::from(month));
        m.insert(
            "events".to_owned(),
            Value::Array(
                events
                    .iter()
                    .map(|(id, event)| {
                        let mut e: HashMap<String, Value> = HashMap::new();
                        e.insert("id".to_owned(), Value::from(*id as i64));
                        e.insert("title".to_owned(), Value::from(event.title.as_str()));
                        e.insert("start".to_owned(), Value::from(event.start.as_str()));
                        Value::Object(e)
                    })
                    .collect(),
            ),
        );
        execute(&self.calendar, Value::Object(m))
    }

    pub fn render_intro(&self, site: &str, intro: &str) -> Result<String> {
        let mut m = object(site);
        m.insert("intro".to_owned(), Value::from(intro));
        execute(&self.intro, Value::Object(m))
    }
}

fn object(site: &str) -> HashMap<String, Value> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("site".to_owned(), Value::from(site));
    m
}

impl From<&IndexRow> for Value {
    fn from(row: &IndexRow) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("position".to_owned(), Value::from(row.position as i64));
        m.insert("title".to_owned(), Value::from(row.title.as_str()));
        m.insert("date".to_owned(), Value::from(row.date.as_str()));
        Value::Object(m)
    }
}

impl From<&Control> for Value {
    /// Converts a [`Control`] into an object with `label`, `active`, and
    /// `target` (nil for ellipses).
    fn from(control: &Control) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("label".to_owned(), Value::from(control.label()));
        m.insert("active".to_owned(), Value::Bool(control.is_active()));
        m.insert(
            "target".to_owned(),
            match control.target() {
                Some(page) => Value::from(page as i64),
                None => Value::Nil,
            },
        );
        Value::Object(m)
    }
}

fn execute(template: &Template, value: Value) -> Result<String> {
    let context = Context::from(value).map_err(|e| Error::Execute(e.to_string()))?;
    let mut out: Vec<u8> = Vec::new();
    template
        .execute(&mut out, &context)
        .map_err(|e| Error::Execute(e.to_string()))?;
    String::from_utf8(out).map_err(|e| Error::Execute(e.to_string()))
}

// Loads `name` from the theme directory when it exists there, otherwise
// uses `builtin`, and parses the result into a template.
fn parse_template(name: &str, theme_directory: Option<&Path>, builtin: &str) -> Result<Template> {
    let mut contents = String::new();
    match theme_directory.map(|dir| dir.join(name)).filter(|path| path.is_file()) {
        Some(path) => {
            use std::io::Read;
            log::debug!("using theme template {}", path.display());
            File::open(&path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .map_err(|err| Error::OpenTemplateFile { path, err })?;
        }
        None => contents.push_str(builtin),
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(|e| Error::ParseTemplate {
        name: name.to_owned(),
        message: e.to_string(),
    })?;
    Ok(template)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or executing a template.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { name: String, message: String },

    /// Returned for errors executing a template.
    Execute(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { name, message } => {
                write!(f, "Parsing template '{}': {}", name, message)
            }
            Error::Execute(message) => write!(f, "Executing template: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            _ => None,
        }
    }
}
