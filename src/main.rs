use anyhow::{anyhow, Result};
use clap::{App as ClapApp, AppSettings, Arg, ArgMatches, SubCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use zinside::browse::Browser;
use zinside::calendar::EventCalendar;
use zinside::config::Config;
use zinside::fetch::HttpFetcher;
use zinside::logging::init_logging;
use zinside::manifest::update_manifest;
use zinside::render::Templates;
use zinside::shell::MemoryShell;

fn main() -> Result<()> {
    let project_arg = Arg::with_name("project")
        .long("project")
        .short("p")
        .takes_value(true)
        .help("Directory containing zinside.yaml (or one of its children)");

    let matches = ClapApp::new("zinside")
        .about("A calendar and paginated index for a plain-text blog")
        .version(env!("CARGO_PKG_VERSION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .takes_value(true)
                .global(true)
                .default_value("warn")
                .help("off, error, warn, info, debug, or trace"),
        )
        .subcommand(
            SubCommand::with_name("browse")
                .about("Browses the blog in the terminal")
                .arg(project_arg.clone())
                .arg(
                    Arg::with_name("hash")
                        .long("hash")
                        .takes_value(true)
                        .help("Initial page: home, index, intro, or detail"),
                ),
        )
        .subcommand(
            SubCommand::with_name("events")
                .about("Writes the calendar events as FullCalendar JSON")
                .arg(project_arg)
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("Output file (stdout when omitted)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("manifest")
                .about("Rebuilds posts.json from a directory of YYYY-MM-DD_Title.txt files")
                .arg(
                    Arg::with_name("posts")
                        .long("posts")
                        .takes_value(true)
                        .default_value("posts"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .default_value("posts.json"),
                ),
        )
        .get_matches();

    init_logging(matches.value_of("log-level").unwrap_or("warn")).map_err(|e| anyhow!(e))?;

    match matches.subcommand() {
        ("browse", Some(matches)) => browse(matches),
        ("events", Some(matches)) => events(matches),
        ("manifest", Some(matches)) => manifest(matches),
        _ => Ok(()),
    }
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    let dir = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    Config::from_directory(&dir)
}

fn browse(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let templates = Templates::load(config.theme_directory.as_deref())?;
    let mut browser = Browser::new(config, templates, HttpFetcher::new(), StdRng::from_entropy());
    browser.start(matches.value_of("hash").unwrap_or(""));

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    browser.run(stdin.lock(), stdout.lock())
}

fn events(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let mut app = zinside::app::App::new(
        MemoryShell::new(),
        EventCalendar::new(),
        HttpFetcher::new(),
        config.index_page_size,
    );
    app.load(config.post_source().as_ref());
    if app.store().is_empty() {
        log::warn!("no posts loaded; writing an empty event list");
    }

    match matches.value_of("output") {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow!("Creating `{}`: {}", path, e))?;
            let mut writer = BufWriter::new(file);
            app.calendar().write_json(&mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            app.calendar().write_json(stdout.lock())?;
            println!();
        }
    }
    Ok(())
}

fn manifest(matches: &ArgMatches) -> Result<()> {
    let posts = Path::new(matches.value_of("posts").unwrap_or("posts"));
    let output = Path::new(matches.value_of("output").unwrap_or("posts.json"));
    let count = update_manifest(posts, output)?;
    println!("Successfully updated {} with {} posts.", output.display(), count);
    Ok(())
}
