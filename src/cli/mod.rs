//! Command-line front end for the `spendsavvy` binary.

pub mod output;

use std::{
    collections::{HashMap, HashSet},
    env,
    io::{self, Write},
    str::FromStr,
};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    core::{
        services::{EntryService, ReportSession, ReportState, ServiceError},
        time::{Clock, FixedClock, SystemClock},
        utils::PathResolver,
    },
    errors::{LedgerError, StoreError},
    ledger::{Entry, EntryKind, RepeatInterval, ReportWindow},
    storage::{JsonStore, RecordStore},
    utils::{build_info, dates::parse_date},
};

use output::{render_listing, render_report, OutputStyle};

const USAGE: &str = "Usage: spendsavvy <command>\n\
Commands:\n  \
add <expense|income> <name> <amount> <YYYY-MM-DD> [--repeat <label|days>] [--until <YYYY-MM-DD>] [--user <id>]\n  \
list [--user <id>]\n  \
remove <id> [--user <id>]\n  \
report [--from <YYYY-MM-DD>] [--to <YYYY-MM-DD>] [--user <id>] [--json]\n  \
version";

/// Overrides the clock's date, mostly for scripted runs.
pub const TODAY_ENV: &str = "SPENDSAVVY_TODAY";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Report failed: {0}")]
    Report(String),
    #[error("{0}")]
    Usage(String),
}

pub type CliResult<T> = Result<T, CliError>;

/// Everything a command needs besides its arguments.
pub struct CliContext {
    pub store: Box<dyn RecordStore>,
    pub config: Config,
    pub clock: Box<dyn Clock>,
    pub style: OutputStyle,
}

impl CliContext {
    /// Reads configuration and records from the data directory.
    pub fn from_env() -> CliResult<Self> {
        let base = PathResolver::base_dir();
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let store = JsonStore::new(Some(base))?;
        let clock: Box<dyn Clock> = match env::var(TODAY_ENV) {
            Ok(value) if !value.trim().is_empty() => Box::new(FixedClock::on(parse_date(&value)?)),
            _ => Box::new(SystemClock),
        };
        Ok(Self {
            store: Box::new(store),
            config,
            clock,
            style: OutputStyle::detect(),
        })
    }

    fn user<'a>(&'a self, args: &'a ParsedArgs) -> &'a str {
        args.option("user").unwrap_or(&self.config.default_user)
    }
}

pub fn run_cli() -> CliResult<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let context = CliContext::from_env()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(&args, &mut out, &context)
}

/// Runs one command, writing its output to `out`.
pub fn run_with(args: &[String], out: &mut dyn Write, context: &CliContext) -> CliResult<()> {
    let Some((command, rest)) = args.split_first() else {
        return Err(CliError::Usage(USAGE.into()));
    };
    debug!(command = command.as_str(), "running command");

    match command.as_str() {
        "add" => add(rest, out, context),
        "list" => list(rest, out, context),
        "remove" => remove(rest, out, context),
        "report" => report(rest, out, context),
        "version" => {
            writeln!(out, "{}", build_info::current().summary())?;
            Ok(())
        }
        "help" | "--help" | "-h" => {
            writeln!(out, "{USAGE}")?;
            Ok(())
        }
        other => Err(CliError::Usage(format!("Unknown command `{other}`\n{USAGE}"))),
    }
}

fn add(args: &[String], out: &mut dyn Write, context: &CliContext) -> CliResult<()> {
    let parsed = ParsedArgs::parse(args, &["repeat", "until", "user"], &[])?;
    let [kind, name, amount, start] = parsed.positionals.as_slice() else {
        return Err(CliError::Usage(
            "add expects <expense|income> <name> <amount> <YYYY-MM-DD>".into(),
        ));
    };

    let kind = EntryKind::from_str(kind)?;
    let amount = Decimal::from_str(amount.trim())
        .map_err(|_| CliError::Usage(format!("Invalid amount `{amount}`")))?;
    let start = parse_date(start)?;
    let repeat = match parsed.option("repeat") {
        Some(value) => RepeatInterval::from_str(value)?,
        None => RepeatInterval::ONE_TIME,
    };
    let until = parsed.option("until").map(parse_date).transpose()?;

    let entry = Entry::new(kind, name.as_str(), amount, start, until, repeat)?;
    let id = EntryService::add(context.store.as_ref(), context.user(&parsed), entry)?;
    writeln!(out, "Added {} {id}", kind.label().to_lowercase())?;
    Ok(())
}

fn list(args: &[String], out: &mut dyn Write, context: &CliContext) -> CliResult<()> {
    let parsed = ParsedArgs::parse(args, &["user"], &[])?;
    parsed.expect_no_positionals("list")?;
    let listings = EntryService::list(
        context.store.as_ref(),
        context.user(&parsed),
        context.clock.today(),
    )?;
    write!(out, "{}", render_listing(&listings, &context.config, &context.style))?;
    Ok(())
}

fn remove(args: &[String], out: &mut dyn Write, context: &CliContext) -> CliResult<()> {
    let parsed = ParsedArgs::parse(args, &["user"], &[])?;
    let [id] = parsed.positionals.as_slice() else {
        return Err(CliError::Usage("remove expects <id>".into()));
    };
    let id = Uuid::parse_str(id.trim())
        .map_err(|_| CliError::Usage(format!("Invalid entry id `{id}`")))?;
    EntryService::remove(context.store.as_ref(), context.user(&parsed), id)?;
    writeln!(out, "Removed {id}")?;
    Ok(())
}

fn report(args: &[String], out: &mut dyn Write, context: &CliContext) -> CliResult<()> {
    let parsed = ParsedArgs::parse(args, &["from", "to", "user"], &["json"])?;
    parsed.expect_no_positionals("report")?;
    let window = resolve_window(&parsed, context)?;

    let mut session = ReportSession::new();
    match session.load(context.store.as_ref(), context.user(&parsed), window) {
        ReportState::Ready(report) => {
            if parsed.flag("json") {
                writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
            } else {
                write!(out, "{}", render_report(report, &context.config, &context.style))?;
            }
            Ok(())
        }
        ReportState::Error(message) => Err(CliError::Report(message.clone())),
        ReportState::Idle | ReportState::Loading(_) => {
            Err(CliError::Report("report did not finish".into()))
        }
    }
}

fn resolve_window(parsed: &ParsedArgs, context: &CliContext) -> CliResult<ReportWindow> {
    let from = parsed.option("from").map(parse_date).transpose()?;
    let to = parsed.option("to").map(parse_date).transpose()?;
    let days = context.config.default_window_days;
    let window = match (from, to) {
        (Some(start), Some(end)) => ReportWindow::new(start, end)?,
        (Some(start), None) => ReportWindow::new(start, context.clock.today())?,
        (None, Some(end)) => ReportWindow::ending_on(end, days)?,
        (None, None) => ReportWindow::ending_on(context.clock.today(), days)?,
    };
    Ok(window)
}

/// Positionals plus `--key value` options and bare `--flag`s.
#[derive(Debug, Default)]
struct ParsedArgs {
    positionals: Vec<String>,
    options: HashMap<String, String>,
    flags: HashSet<String>,
}

impl ParsedArgs {
    fn parse(args: &[String], options: &[&str], flags: &[&str]) -> CliResult<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positionals.push(arg.clone());
                continue;
            };
            if flags.contains(&name) {
                parsed.flags.insert(name.to_string());
            } else if options.contains(&name) {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage(format!("Option --{name} needs a value")))?;
                parsed.options.insert(name.to_string(), value.clone());
            } else {
                return Err(CliError::Usage(format!("Unknown option --{name}")));
            }
        }
        Ok(parsed)
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    fn expect_no_positionals(&self, command: &str) -> CliResult<()> {
        match self.positionals.first() {
            Some(extra) => Err(CliError::Usage(format!(
                "{command} takes no argument `{extra}`"
            ))),
            None => Ok(()),
        }
    }
}
