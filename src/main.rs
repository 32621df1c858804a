//! namesake - Find image assets that share a filename and rename them.
//!
//! Usage:
//!   namesake [PATH]            Launch interactive TUI
//!   namesake scan [PATH]       Print filename groups
//!   namesake rename [PATH]     Rename members of one group
//!   namesake --help            Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use namesake_core::{FilterParams, ScanConfig, Session, SessionSnapshot};
use namesake_scan::{ProjectHost, ProjectScanner};
use namesake_tui::{TuiConfig, UserSettings};

/// Environment variable checked before `RUST_LOG`.
const LOG_ENV: &str = "NAMESAKE_LOG";

#[derive(Parser)]
#[command(
    name = "namesake",
    version,
    about = "Find image assets that share a filename and rename them",
    long_about = "namesake groups a project's image assets by filename, ignoring \
                  the folder they live in, so duplicates can be found and renamed.\n\n\
                  Launch the interactive TUI by running `namesake [PATH]`, or use \
                  subcommands for one-shot operations."
)]
struct Cli {
    /// Project root (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    #[command(flatten)]
    scan: ScanArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Options shared by every mode that scans a project.
#[derive(Args, Clone, Default)]
struct ScanArgs {
    /// Recognized extension, including the dot (repeatable, e.g. --ext .png)
    #[arg(long = "ext", global = true, value_name = "EXT")]
    extensions: Vec<String>,

    /// Skip project paths starting with this prefix (repeatable)
    #[arg(long = "exclude", global = true, value_name = "PREFIX")]
    excluded_prefixes: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan and print filename groups
    Scan {
        /// Project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Include names with a single asset
        #[arg(short, long)]
        all: bool,

        /// Only names containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Page to print, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Rename members of one group to a new base name
    Rename {
        /// Project root
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Group to rename from, e.g. icon.png
        #[arg(short, long)]
        group: String,

        /// New base name; the group's extension is kept
        #[arg(short, long)]
        to: String,

        /// Project-relative path of a member to rename (repeatable)
        #[arg(short, long = "member", value_name = "PATH")]
        members: Vec<String>,

        /// Rename every member of the group
        #[arg(long, conflicts_with = "members")]
        all_members: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = UserSettings::load();

    match cli.command {
        Some(Command::Scan {
            path,
            all,
            search,
            page,
            format,
        }) => {
            init_stderr_logging();
            let config = scan_config(&settings, &path, &cli.scan);
            let params = FilterParams::new(!all, search.unwrap_or_default());
            run_scan(config, params, page, format)?;
        }
        Some(Command::Rename {
            path,
            group,
            to,
            members,
            all_members,
        }) => {
            init_stderr_logging();
            let config = scan_config(&settings, &path, &cli.scan);
            run_rename(config, &group, &to, &members, all_members)?;
        }
        None => {
            let _guard = init_file_logging();
            let mut config = TuiConfig::from_settings(&settings, &cli.path);
            config.scan = scan_config(&settings, &cli.path, &cli.scan);
            namesake_tui::run(config)?;
        }
    }

    Ok(())
}

/// Settings-derived scan configuration with command-line overrides applied.
fn scan_config(settings: &UserSettings, path: &Path, args: &ScanArgs) -> ScanConfig {
    let mut config = settings.scan_config(path);
    if !args.extensions.is_empty() {
        config.extensions = args.extensions.iter().map(|e| normalize_ext(e)).collect();
    }
    if !args.excluded_prefixes.is_empty() {
        config.excluded_prefixes = args.excluded_prefixes.clone();
    }
    config
}

/// Accept `png` as well as `.png`.
fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for one-shot subcommands.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log to a daily file in the cache dir so the TUI owns the terminal.
///
/// Returns a guard that must be held until the TUI exits.
fn init_file_logging() -> Option<WorkerGuard> {
    let logs_dir = dirs::cache_dir()?.join("namesake").join("logs");
    std::fs::create_dir_all(&logs_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "namesake.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    Some(guard)
}

fn open_session(config: ScanConfig) -> Result<Session<ProjectHost>> {
    let host = ProjectHost::open(config.clone())
        .wrap_err_with(|| format!("Invalid project path {}", config.root.display()))?;
    Ok(Session::new(host, config))
}

/// Scan with a progress line on stderr.
fn scan_session(session: &mut Session<ProjectHost>) -> Result<usize> {
    eprintln!("Scanning {}...", session.host().root().display());

    let scanner = ProjectScanner::new();
    let mut stderr = std::io::stderr();
    let groups = scanner
        .scan_with(session, |progress| {
            let _ = write!(
                stderr,
                "\r  {:>6}/{:<6} {:>3.0}%",
                progress.processed,
                progress.total,
                progress.fraction() * 100.0
            );
            let _ = stderr.flush();
        })
        .context("Scan failed")?;
    eprintln!();

    Ok(groups)
}

/// Run a scan and print one page of groups.
fn run_scan(
    config: ScanConfig,
    params: FilterParams,
    page: usize,
    format: OutputFormat,
) -> Result<()> {
    let mut session = open_session(config)?.with_filter(params);
    scan_session(&mut session)?;
    session.set_page(page.saturating_sub(1));

    // Print members in full; nothing is collapsed outside the TUI
    let keys: Vec<String> = session
        .current_entries()
        .iter()
        .map(|entry| entry.key.to_string())
        .collect();
    for key in &keys {
        session.set_expanded(key, true)?;
    }

    let snapshot = session.snapshot();
    match format {
        OutputFormat::Text => print_snapshot(&snapshot),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }

    Ok(())
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    println!();
    println!("{}", "─".repeat(70));
    println!(
        " {} names, {} assets{}",
        snapshot.total_groups,
        snapshot.total_assets,
        if snapshot.duplicates_only {
            ", duplicates only"
        } else {
            ""
        }
    );
    if !snapshot.search.is_empty() {
        println!(" Search: {}", snapshot.search);
    }
    println!("{}", "─".repeat(70));
    println!();

    if snapshot.groups.is_empty() {
        println!(" No matching assets found.");
        println!();
        return;
    }

    for group in &snapshot.groups {
        println!(" {} [{}]", group.key, group.members.len());
        for member in &group.members {
            println!("   {}", member.path);
        }
        println!();
    }

    println!(
        " Page {} of {} ({} matching names)",
        snapshot.page + 1,
        snapshot.page_count,
        snapshot.filtered_groups
    );
}

/// Select members of `group` and rename them once.
fn run_rename(
    config: ScanConfig,
    group: &str,
    to: &str,
    members: &[String],
    all_members: bool,
) -> Result<()> {
    if members.is_empty() && !all_members {
        bail!("Nothing to rename: pass --member PATH or --all-members");
    }

    let mut session = open_session(config)?.with_filter(FilterParams::new(false, ""));
    scan_session(&mut session)?;

    if all_members {
        session.select_all(group, true)?;
    } else {
        for member in members {
            session.select_path(group, member)?;
        }
    }

    let outcome = session
        .rename_selected_to(group, to)
        .wrap_err_with(|| format!("Failed to rename {group} to {to}"))?;

    for asset in &outcome.renamed {
        println!("{} -> {}", asset.from, asset.to);
    }
    println!(
        "Renamed {} asset(s) to {}{}",
        outcome.renamed.len(),
        outcome.target_key,
        if outcome.merged { " (merged)" } else { "" }
    );

    Ok(())
}
