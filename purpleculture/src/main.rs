use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use purpleculture::{
    render_html, CharacterSet, CharacterStore, EditOutcome, FileFetcher, HttpFetcher, LinePrompt,
    PageReport, PurpleCultureMarkup, RedbStore, Session, SiteConfig,
};
use sentence_highlighter_core::{PageFetcher, RAW_DATA_KEY};

#[derive(Parser)]
#[command(name = "purpleculture")]
#[command(about = "Find purpleculture.net sample sentences spelled only with characters you know")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Character store (default: ~/.purpleculture/store.redb)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Highlight a results page and append further pages
    Run {
        /// Results page URL, e.g. https://www.purpleculture.net/sample_sentences/?word=好
        url: String,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Change the stored characters, then rerun URL from scratch if given
    Edit {
        url: Option<String>,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Print the stored characters and the size of the parsed set
    Show,
}

#[derive(Args, Clone, Default)]
struct RunOptions {
    /// Use a saved copy of the first page instead of downloading it
    #[arg(long)]
    from_file: Option<PathBuf>,

    /// Number of extra pages to load (overrides the config)
    #[arg(long)]
    pages: Option<usize>,

    /// Write an HTML report of the highlighted results
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the buildable sentences as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load_toml(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn open_store(path: Option<&Path>) -> Result<RedbStore> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(RedbStore::default_path);
    RedbStore::open(&path).with_context(|| format!("opening store {}", path.display()))
}

type CliSession = Session<Box<dyn PageFetcher>, HttpFetcher>;

fn session(options: &RunOptions, site: &SiteConfig) -> Result<CliSession> {
    let mut config = site.base.clone();
    if let Some(pages) = options.pages {
        config.load_pages_count = pages;
    }

    let adapter = PurpleCultureMarkup::new(&site.selectors)?;
    let first_page: Box<dyn PageFetcher> = match &options.from_file {
        Some(path) => Box::new(FileFetcher::new(path)),
        None => Box::new(HttpFetcher::new(config.fetch_timeout_ms)?),
    };
    let fetcher = HttpFetcher::new(config.fetch_timeout_ms)?;
    Ok(Session::new(config, adapter, first_page, fetcher))
}

fn print_report(url: &str, report: &PageReport, options: &RunOptions) -> Result<()> {
    info!("{} extra page(s) appended", report.pages_appended);
    if let Some(e) = &report.failure {
        eprintln!("warning: {e}");
    }

    print!("{}", report.panel.render_text());
    if let Some(footer) = &report.document.footer {
        println!("{footer}");
    }
    if let Some(path) = &options.report {
        std::fs::write(path, render_html(&report.document, &report.panel, url))
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Wrote report to {}", path.display());
    }
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report.buildable)?);
    }
    Ok(())
}

fn declined() {
    eprintln!("No data provided. Nothing to do.");
}

fn run(url: &str, options: &RunOptions, site: &SiteConfig, store: &RedbStore) -> Result<()> {
    let session = session(options, site)?;
    match session
        .run(url, store, LinePrompt::stdio())
        .with_context(|| format!("highlighting {url}"))?
    {
        Some(report) => print_report(url, &report, options),
        None => {
            declined();
            Ok(())
        }
    }
}

fn edit(url: Option<&str>, options: &RunOptions, site: &SiteConfig, store: &RedbStore) -> Result<()> {
    let session = session(options, site)?;
    let report = session
        .edit(url, store, LinePrompt::stdio())
        .context("editing character data")?;

    match report.outcome {
        EditOutcome::Reload => println!("Character data saved."),
        EditOutcome::Unchanged => println!("Character data unchanged."),
    }
    match (url, report.reload) {
        (Some(url), Some(Some(page))) => print_report(url, &page, options)?,
        (_, Some(None)) => declined(),
        _ => {}
    }
    Ok(())
}

fn show(site: &SiteConfig, store: &RedbStore) -> Result<()> {
    match store.get(RAW_DATA_KEY)? {
        Some(raw) => {
            let set = CharacterSet::parse(&raw, &site.base.punctuation);
            println!("{raw}");
            println!("({} accepted tokens including punctuation)", set.len());
        }
        None => println!("No character data stored."),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let site = load_config(cli.config.as_deref())?;
    let store = open_store(cli.store.as_deref())?;

    match &cli.command {
        Command::Run { url, options } => run(url, options, &site, &store),
        Command::Edit { url, options } => edit(url.as_deref(), options, &site, &store),
        Command::Show => show(&site, &store),
    }
}
