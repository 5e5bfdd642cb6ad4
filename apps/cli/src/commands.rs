//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use occupancy_core::catalog::{build_course_catalog, build_room_catalog};
use occupancy_core::query::{OccupancyQuery, OccupancyReport, query_occupancy};
use occupancy_core::vocabulary::{CatalogProgress, Vocabulary};
use occupancy_index::IndexStatus;
use occupancy_shared::{AppConfig, OccupancyError, Slot, VpisConfig, init_config, load_config};
use occupancy_vpis::CatalogFetcher;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Occupancy: room and course schedules from the FH SWF VPIS.
#[derive(Parser)]
#[command(
    name = "occupancy",
    version,
    about = "Look up room occupancy and course schedules of the FH SWF campuses.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the configured VPIS base URL.
    #[arg(long, env = "OCCUPANCY_VPIS_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Show what is scheduled in the rooms of a location.
    Rooms {
        /// Location alias (defaults to `defaults.location` from the config).
        location: Option<String>,

        /// Semester token, e.g. SS2021 or WS2021.
        #[arg(short, long)]
        semester: Option<String>,

        /// Day to show (YYYY-MM-DD).
        #[arg(short, long)]
        day: Option<String>,

        /// Only this room, e.g. H409 or Is-H409.
        #[arg(short, long)]
        room: Option<String>,
    },

    /// Show when and where a course takes place.
    Course {
        /// Location alias.
        location: String,

        /// Course name in any formatting.
        course: String,

        /// Semester token, e.g. SS2021 or WS2021.
        #[arg(short, long)]
        semester: Option<String>,

        /// Day to show (YYYY-MM-DD).
        #[arg(short, long)]
        day: Option<String>,
    },

    /// Print the room or course catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Write room, course and location entity files into every locale directory.
    Vocab {
        /// Directory holding one subdirectory per locale.
        #[arg(long)]
        locale_dir: PathBuf,

        /// Academic year of the course listings (defaults to the current year).
        #[arg(long)]
        year: Option<u16>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Catalog subcommands.
#[derive(Subcommand)]
pub(crate) enum CatalogAction {
    /// Rooms per location.
    Rooms,
    /// Course names per location short code.
    Courses {
        /// Academic year (defaults to the current year).
        #[arg(long)]
        year: Option<u16>,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "occupancy=info",
        1 => "occupancy=debug",
        _ => "occupancy=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        json: cli.json,
        base_url: cli.base_url,
    };

    match cli.command {
        Command::Rooms {
            location,
            semester,
            day,
            room,
        } => cmd_rooms(&ctx, location, semester, day, room.as_deref()).await,
        Command::Course {
            location,
            course,
            semester,
            day,
        } => cmd_course(&ctx, location, &course, semester, day).await,
        Command::Catalog { action } => match action {
            CatalogAction::Rooms => cmd_catalog_rooms(&ctx).await,
            CatalogAction::Courses { year } => cmd_catalog_courses(&ctx, year).await,
        },
        Command::Vocab { locale_dir, year } => cmd_vocab(&ctx, &locale_dir, year).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Flags shared by every network command.
struct Context {
    json: bool,
    base_url: Option<String>,
}

impl Context {
    fn fetcher(&self, config: &AppConfig) -> Result<CatalogFetcher> {
        let mut vpis = VpisConfig::from(config);
        if let Some(base_url) = &self.base_url {
            vpis = vpis.with_base_url(base_url);
        }
        Ok(CatalogFetcher::from_config(vpis)?)
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Occupancy queries
// ---------------------------------------------------------------------------

async fn cmd_rooms(
    ctx: &Context,
    location: Option<String>,
    semester: Option<String>,
    day: Option<String>,
    room: Option<&str>,
) -> Result<()> {
    let config = load_config()?;
    let location = location
        .or_else(|| config.defaults.location.clone())
        .ok_or_else(|| eyre!("no location given and no defaults.location configured"))?;

    let report = run_query(ctx, &config, location, semester, day).await?;

    let slots = match room {
        Some(room) => report.activities_in_room(room, report.day.as_deref()),
        None => report.index.room_slots(),
    };

    if ctx.json {
        return match room {
            Some(_) => ctx.print_json(&slots),
            None => ctx.print_json(&report),
        };
    }

    print_header(&report);
    if report.status() == IndexStatus::NoActivitiesFound {
        println!("  No activities found.");
    } else if slots.is_empty() {
        println!("  Nothing scheduled in room {}.", room.unwrap_or_default());
    } else {
        for slot in &slots {
            println!("  {}", format_slot(slot));
        }
    }
    println!();

    Ok(())
}

async fn cmd_course(
    ctx: &Context,
    location: String,
    course: &str,
    semester: Option<String>,
    day: Option<String>,
) -> Result<()> {
    let config = load_config()?;
    let report = run_query(ctx, &config, location, semester, day).await?;
    let slots = report.course_schedule(course);

    if ctx.json {
        return ctx.print_json(&slots);
    }

    print_header(&report);
    if slots.is_empty() {
        println!("  No activities found for course '{course}'.");
    } else {
        for slot in &slots {
            println!("  {}", format_slot(slot));
        }
    }
    println!();

    Ok(())
}

async fn run_query(
    ctx: &Context,
    config: &AppConfig,
    location: String,
    semester: Option<String>,
    day: Option<String>,
) -> Result<OccupancyReport> {
    let mut query = OccupancyQuery::new(location);
    if let Some(semester) = semester {
        query = query.semester(semester);
    }
    if let Some(day) = day {
        validate_day(&day)?;
        query = query.day(day);
    }

    let fetcher = ctx.fetcher(config)?;
    let spinner = (!ctx.json).then(|| spinner("Querying VPIS"));
    let result = query_occupancy(&fetcher, &query).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    result.map_err(explain)
}

fn print_header(report: &OccupancyReport) {
    let semester = report
        .semester
        .map(|t| t.to_string())
        .unwrap_or_else(|| "current semester".into());
    let day = report.day.as_deref().unwrap_or("default day");
    println!();
    println!("  {} ({semester}, {day})", report.location);
    println!();
}

fn format_slot(slot: &Slot) -> String {
    format!(
        "{} {}-{}  {:<8} {} ({})",
        slot.date, slot.begin, slot.end, slot.room, slot.course, slot.kind
    )
}

/// VPIS expects ISO calendar days.
fn validate_day(day: &str) -> Result<()> {
    NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|e| eyre!("invalid day '{day}': expected YYYY-MM-DD ({e})"))
}

/// Attach a user-facing hint to errors that mean "could not check".
fn explain(err: OccupancyError) -> color_eyre::Report {
    if err.is_connectivity() {
        eyre!("VPIS could not be checked: {err}")
    } else {
        err.into()
    }
}

// ---------------------------------------------------------------------------
// Catalogs and vocabulary
// ---------------------------------------------------------------------------

async fn cmd_catalog_rooms(ctx: &Context) -> Result<()> {
    let fetcher = ctx.fetcher(&load_config()?)?;
    let rooms = build_room_catalog(&fetcher).await.map_err(explain)?;

    if ctx.json {
        return ctx.print_json(&rooms);
    }
    for (location, list) in &rooms {
        println!("{location} ({}): {}", list.len(), list.join(", "));
    }
    Ok(())
}

async fn cmd_catalog_courses(ctx: &Context, year: Option<u16>) -> Result<()> {
    let fetcher = ctx.fetcher(&load_config()?)?;
    let year = year.unwrap_or_else(current_year);
    let courses = build_course_catalog(&fetcher, year).await.map_err(explain)?;

    if ctx.json {
        return ctx.print_json(&courses);
    }
    for (code, list) in &courses {
        println!("{code} ({}):", list.len());
        for name in list {
            println!("  {name}");
        }
    }
    Ok(())
}

async fn cmd_vocab(ctx: &Context, locale_dir: &Path, year: Option<u16>) -> Result<()> {
    if !locale_dir.is_dir() {
        return Err(eyre!("locale directory '{}' does not exist", locale_dir.display()));
    }

    let fetcher = ctx.fetcher(&load_config()?)?;
    let year = year.unwrap_or_else(current_year);
    info!(year, locale_dir = %locale_dir.display(), "initializing vocabulary");

    let progress = CliProgress::new();
    let vocabulary = Vocabulary::initialize(&fetcher, year, &progress)
        .await
        .map_err(explain)?;
    progress.spinner.finish_and_clear();

    for location in vocabulary.locations_without_rooms() {
        warn!(%location, "no rooms listed");
    }

    let written = vocabulary.write_entity_files(locale_dir)?;
    print!("{}", vocab_report(ctx.json, &vocabulary, &written)?);

    Ok(())
}

/// Stdout of `vocab`; in JSON mode nothing but the written paths.
fn vocab_report(json: bool, vocabulary: &Vocabulary, written: &[PathBuf]) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(written)?));
    }

    let mut out = String::from("\n  Vocabulary written!\n");
    out.push_str(&format!("  Rooms:   {}\n", vocabulary.room_entries().len()));
    out.push_str(&format!("  Courses: {}\n", vocabulary.course_entries().len()));
    for path in written {
        out.push_str(&format!("  {}\n", path.display()));
    }
    out.push('\n');
    Ok(out)
}

fn current_year() -> u16 {
    u16::try_from(chrono::Local::now().year()).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        Self {
            spinner: spinner("Starting"),
        }
    }
}

impl CatalogProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(format!("Fetching {name} catalog"));
    }

    fn finished(&self, name: &str, entries: usize) {
        self.spinner.println(format!("  {entries} {name} collected"));
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use occupancy_shared::Location;

    #[test]
    fn day_must_be_iso() {
        assert!(validate_day("2021-04-12").is_ok());
        assert!(validate_day(" 2021-04-12 ").is_ok());
        assert!(validate_day("12.04.2021").is_err());
        assert!(validate_day("2021-02-30").is_err());
    }

    #[test]
    fn slot_line() {
        let slot = Slot {
            room: "h409".into(),
            date: "2021-04-12".into(),
            begin: "08:00".into(),
            course: "programmierung mit c++2".into(),
            kind: "Praktikum".into(),
            end: "09:30".into(),
        };
        assert_eq!(
            format_slot(&slot),
            "2021-04-12 08:00-09:30  h409     programmierung mit c++2 (Praktikum)"
        );
    }

    #[test]
    fn connectivity_errors_are_explained() {
        let err = explain(OccupancyError::http_status("https://vpis.test/vpisapp.php", 503));
        assert!(err.to_string().starts_with("VPIS could not be checked"));

        let err = explain(OccupancyError::UnknownLocation {
            alias: "atlantis".into(),
        });
        assert!(!err.to_string().starts_with("VPIS"));
    }

    #[test]
    fn json_vocab_report_is_pure_json() {
        let mut vocabulary = Vocabulary::default();
        vocabulary.rooms.insert(Location::Iserlohn, vec!["h409".into()]);
        vocabulary.rooms.insert(Location::Hagen, vec![]);
        assert_eq!(vocabulary.locations_without_rooms(), [Location::Hagen]);

        let written = [PathBuf::from("/locale/de-de/room.entity")];
        let out = vocab_report(true, &vocabulary, &written).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, ["/locale/de-de/room.entity"]);

        let text = vocab_report(false, &vocabulary, &written).unwrap();
        assert!(text.contains("Rooms:   1"));
        assert!(!text.contains("Hagen"));
    }

    #[test]
    fn cli_parses_room_query() {
        let cli = Cli::try_parse_from([
            "occupancy", "--json", "rooms", "iserlohn", "--day", "2021-04-12", "--room", "H409",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Rooms { location, day, room, .. } => {
                assert_eq!(location.as_deref(), Some("iserlohn"));
                assert_eq!(day.as_deref(), Some("2021-04-12"));
                assert_eq!(room.as_deref(), Some("H409"));
            }
            _ => panic!("expected rooms command"),
        }
    }
}
