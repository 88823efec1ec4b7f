//! theme-state: inspect and edit the persisted theme state from a terminal.
//!
//! # Usage
//!
//! ```text
//! theme-state [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show                        Print the UI's initial data as JSON
//!   dump                        Print the whole snapshot as JSON
//!   mode <dark|light|auto>      Set the theme mode
//!   day <true|false>            Set the day/night signal
//!   option <NAME> <VALUE>       Set one extension option
//!   hash <HASH>                 Set the current palette hash
//!   custom-color <SLOT> <COLOR> Override one palette slot for this palette
//!   reset-colors                Drop this palette's custom colors
//!   reset-theme                 Forget the generated theme
//!
//! Options:
//!   --state-file <PATH>   State JSON file [env: THEME_STATE_FILE]
//!   --log-level  <LEVEL>  Log filter when RUST_LOG is unset [env: THEME_STATE_LOG]
//! ```
//!
//! Every invocation loads (and if needed migrates) the state before running
//! its command.  Defaults for both options come from `settings.toml`; see
//! [`theme_state::infrastructure::settings`].

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use theme_state::infrastructure::settings::{self, Settings};
use theme_state::infrastructure::storage::JsonFileBackend;
use theme_state::{ExtensionStore, PendingWrite};
use theme_state_core::{
    CustomColors, ExtensionOption, OptionsPatch, ThemeMode, TimeIntervalEndpoint,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Inspect and edit the persisted state of the palette theme extension.
#[derive(Debug, Parser)]
#[command(name = "theme-state", version)]
struct Cli {
    /// Path of the state JSON file.  Overrides `storage.state_file`.
    #[arg(long, env = "THEME_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.  Overrides `logging.level`.
    #[arg(long, env = "THEME_STATE_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the data the UI requests when it opens, as JSON.
    Show,
    /// Print the whole state snapshot as JSON.
    Dump,
    /// Set the theme mode.
    Mode { mode: ThemeMode },
    /// Set whether it is currently day.
    Day {
        #[arg(action = ArgAction::Set)]
        is_day: bool,
    },
    /// Set one extension option, e.g. `option fontSize 15` or
    /// `option intervalStart 08:30`.
    #[command(name = "option")]
    SetOption { name: ExtensionOption, value: String },
    /// Set the current palette hash.
    Hash { hash: String },
    /// Override one palette slot for the current palette and mode.
    CustomColor { slot: String, color: String },
    /// Drop the custom colors of the current palette and mode.
    ResetColors,
    /// Forget the generated theme.
    ResetTheme,
}

impl Cli {
    /// Resolves the state file: CLI flag, then settings, then platform default.
    fn state_file(&self, settings: &Settings) -> anyhow::Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => settings
                .state_file()
                .context("could not determine where to store the state file"),
        }
    }
}

/// Builds the options patch setting `option` from its textual value.
fn option_patch(option: ExtensionOption, value: &str) -> anyhow::Result<OptionsPatch> {
    let toggle = || -> anyhow::Result<Option<bool>> {
        let enabled = value
            .trim()
            .parse::<bool>()
            .with_context(|| format!("{option} expects true or false, got '{value}'"))?;
        Ok(Some(enabled))
    };
    let time = || -> anyhow::Result<Option<TimeIntervalEndpoint>> {
        Ok(Some(value.parse::<TimeIntervalEndpoint>()?))
    };

    let mut patch = OptionsPatch::default();
    match option {
        ExtensionOption::UserChrome => patch.user_chrome = toggle()?,
        ExtensionOption::UserContent => patch.user_content = toggle()?,
        ExtensionOption::Duckduckgo => patch.duckduckgo = toggle()?,
        ExtensionOption::Darkreader => patch.darkreader = toggle()?,
        ExtensionOption::FetchOnStartup => patch.fetch_on_startup = toggle()?,
        ExtensionOption::FontSize => {
            let size = value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{option} expects a whole number, got '{value}'"))?;
            patch.font_size = Some(size);
        }
        ExtensionOption::IntervalStart => patch.interval_start = time()?,
        ExtensionOption::IntervalEnd => patch.interval_end = time()?,
    }
    Ok(patch)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}

/// Waits for `pending` to reach the backend.  `what` names the change in
/// logs and errors.
async fn persist(pending: PendingWrite, what: &str) -> anyhow::Result<()> {
    if pending.is_noop() {
        warn!("no palette hash is set; {what} was not changed");
        return Ok(());
    }
    pending
        .await
        .with_context(|| format!("failed to persist {what}"))?;
    info!("{what} updated");
    Ok(())
}

async fn run(command: Command, store: &ExtensionStore) -> anyhow::Result<()> {
    match command {
        Command::Show => print_json(&store.get_initial_data()),
        Command::Dump => {
            store.dump();
            print_json(&store.snapshot())
        }
        Command::Mode { mode } => persist(store.set_theme_mode(mode), "theme mode").await,
        Command::Day { is_day } => persist(store.set_is_day(is_day), "day/night signal").await,
        Command::SetOption { name, value } => {
            let patch = option_patch(name, &value)?;
            persist(store.update_options(patch), &format!("option {name}")).await
        }
        Command::Hash { hash } => persist(store.set_pywal_hash(Some(hash)), "palette hash").await,
        Command::CustomColor { slot, color } => {
            let colors = CustomColors::from([(slot, color)]);
            persist(store.set_custom_colors(colors), "custom colors").await
        }
        Command::ResetColors => persist(store.reset_custom_colors(), "custom colors").await,
        Command::ResetTheme => persist(store.reset_generated_theme(), "generated theme").await,
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Settings decide the default log level, so they are read before logging
    // exists; a failure is reported once the subscriber is installed.
    let (settings, settings_error) = match settings::load_settings() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = settings_error {
        warn!("ignoring settings file: {e}");
    }

    let state_file = cli.state_file(&settings)?;
    debug!("using state file {}", state_file.display());

    let store = ExtensionStore::new(Arc::new(JsonFileBackend::new(&state_file)));
    let outcome = store
        .load()
        .await
        .with_context(|| format!("failed to load state from {}", state_file.display()))?;
    debug!("load outcome: {outcome:?}");

    run(cli.command, &store).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
