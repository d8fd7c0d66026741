//! The library code for `zinside`, a front end for a plain-text personal blog.
//! The architecture can be broken down into three layers:
//!
//! 1. Loading post summaries from a manifest or a directory listing
//!    ([`crate::source`], [`crate::post`])
//! 2. Deriving views from the loaded posts: calendar events
//!    ([`crate::calendar`]), paginated index pages ([`crate::paginate`]), and
//!    post details ([`crate::detail`])
//! 3. Routing between views and recording history ([`crate::router`]), all
//!    tied together by [`crate::app::App`] which drives a [`crate::shell::Shell`]
//!
//! The shell is the host surface. [`crate::shell::MemoryShell`] keeps
//! everything in memory; the `browse` subcommand prints it to the terminal
//! through the templates in [`crate::render`].
//!
//! [`crate::manifest`] builds the `posts.json` manifest from a local directory
//! of `YYYY-MM-DD_Title.txt` files.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod app;
pub mod browse;
pub mod calendar;
pub mod config;
pub mod detail;
pub mod fetch;
pub mod header;
pub mod logging;
pub mod manifest;
pub mod paginate;
pub mod post;
pub mod render;
pub mod router;
pub mod shell;
pub mod source;
