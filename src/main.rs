use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod bridge;
mod config;
mod errors;
mod importer;
mod preferences;
mod progress;
mod report;
mod settings;
mod sites;
mod store;
mod ui;

use bridge::ImportBridge;
use config::BridgeConfig;
use importer::cookies::SqliteCookieJar;
use importer::replay::ReplayImporter;
use importer::{ImportSelection, ImporterCapability};
use preferences::ledger::LedgerData;
use preferences::payments::{OverlayFlags, PaymentsPage, PaymentsProps, PaymentsTab};
use preferences::{Overlay, PanelActions};
use report::ImportReport;
use store::AppStore;
use ui::ConsoleUi;

#[derive(Parser)]
#[command(name = "browser-import-bridge")]
#[command(about = "Feeds browser-importer events into a site store and cookie jar", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded importer event stream against the store
    Replay {
        /// JSON-lines recording of importer events
        #[arg(short, long)]
        events: PathBuf,

        /// Import bookmarks from this exported HTML recording instead of a profile
        #[arg(long)]
        html: Option<PathBuf>,

        /// State file (default: ~/.browser-import-bridge/state.json)
        #[arg(long)]
        state: Option<PathBuf>,

        /// Cookie database (default: ~/.browser-import-bridge/cookies.sqlite)
        #[arg(long)]
        cookie_db: Option<PathBuf>,

        /// Import bookmarks and favicons
        #[arg(long)]
        favorites: bool,

        /// Import history
        #[arg(long)]
        history: bool,

        /// Import cookies
        #[arg(long)]
        cookies: bool,

        /// Tab that shows message boxes; without one nothing is shown
        #[arg(long)]
        active_tab: Option<u32>,

        /// Dry run - handle events without saving state or writing cookies
        #[arg(short, long)]
        dry_run: bool,

        /// Show detailed report
        #[arg(short = 'D', long)]
        detailed: bool,

        /// Do not draw progress or message boxes
        #[arg(short, long)]
        quiet: bool,
    },

    /// Render the payments preferences panel as JSON
    Payments {
        /// State file holding the settings
        #[arg(long)]
        state: Option<PathBuf>,

        /// Ledger data as JSON; an empty wallet when omitted
        #[arg(short, long)]
        ledger: Option<PathBuf>,

        /// Overlays to open (comma-separated, e.g. addFunds,paymentHistory)
        #[arg(long, value_delimiter = ',')]
        show: Vec<String>,

        /// Overlays to close after --click (comma-separated)
        #[arg(long, value_delimiter = ',')]
        hide: Vec<String>,

        /// Recovery keys typed into the recovery overlay
        #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
        recovery_keys: Vec<String>,

        /// Interact with the panel before rendering
        #[arg(long, value_enum)]
        click: Option<PanelClick>,

        /// Save setting changes made by --click
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PanelClick {
    TogglePayments,
    ToggleAutoSuggest,
    History,
    AdvancedSettings,
    /// Submit the recovery overlay, closing the advanced overlays
    FinishRecovery,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            events,
            html,
            state,
            cookie_db,
            favorites,
            history,
            cookies,
            active_tab,
            dry_run,
            detailed,
            quiet,
        } => {
            let config = BridgeConfig::from_env(state, cookie_db)?;
            // No selection flags means everything the bridge stores.
            let everything = !(favorites || history || cookies);
            let selection = ImportSelection {
                favorites: favorites || everything,
                history: history || everything,
                cookies: cookies || everything,
                ..Default::default()
            };

            info!("📥 Replaying importer events from {:?}", events);
            if dry_run {
                info!("🔍 Dry run: nothing will be saved");
            }

            let report = replay(
                &config,
                &events,
                html.as_deref(),
                &selection,
                active_tab,
                dry_run,
                quiet,
            )
            .await?;
            println!("{}", report.format(detailed));
        }

        Commands::Payments {
            state,
            ledger,
            show,
            hide,
            recovery_keys,
            click,
            save,
        } => {
            let state_path = match state {
                Some(path) => path,
                None => BridgeConfig::from_env(None, None)?.state_path,
            };
            let overlays = PanelOverlays { show, hide };
            let json = render_payments(
                &state_path,
                ledger.as_deref(),
                &overlays,
                &recovery_keys,
                click,
                save,
            )?;
            println!("{}", json);
        }
    }

    Ok(())
}

async fn replay(
    config: &BridgeConfig,
    events: &Path,
    html: Option<&Path>,
    selection: &ImportSelection,
    active_tab: Option<u32>,
    dry_run: bool,
    quiet: bool,
) -> Result<ImportReport> {
    let store = AppStore::load(&config.state_path)
        .with_context(|| format!("Failed to load state from {:?}", config.state_path))?;
    let jar = if dry_run {
        SqliteCookieJar::open_in_memory()?
    } else {
        if let Some(parent) = config.cookie_db_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        SqliteCookieJar::open(&config.cookie_db_path)
            .with_context(|| format!("Failed to open cookie jar {:?}", config.cookie_db_path))?
    };

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut importer = ReplayImporter::new(events.to_path_buf(), tx);
    let mut bridge = ImportBridge::new(store, jar, ConsoleUi::new(active_tab, quiet));

    let mut report = ImportReport::new();

    // The browser list is handled before any import is requested.
    importer.initialize()?;
    while let Ok(event) = rx.try_recv() {
        let name = event.name();
        let outcome = bridge.handle(event);
        report.record(name, &outcome);
    }
    let announced = importer.sent();

    match html {
        Some(path) => bridge.import_html(&mut importer, path)?,
        None => bridge.import_data(&mut importer, selection)?,
    }
    let total = (importer.sent() - announced) as u64;
    // Closing the sender lets the bridge finish once the queue is drained.
    drop(importer);

    let pb = if quiet {
        progress::hidden()
    } else {
        progress::create_event_progress_bar(total, "Handling events")?
    };
    bridge.run(&mut rx, &mut report, &pb).await;
    if report.completed() {
        progress::finish_with_success(&pb, &format!("Handled {} events", report.events_handled()));
    } else {
        progress::finish_with_error(
            &pb,
            &format!("Handled {} events without import success", report.events_handled()),
        );
    }

    let (store, jar, _) = bridge.into_parts();
    if dry_run {
        info!("🔍 Dry run: {} actions were not saved", store.dispatched());
    } else {
        store
            .save()
            .with_context(|| format!("Failed to save state to {:?}", config.state_path))?;
        info!("💾 Saved state to {:?}", config.state_path);
        info!("🍪 Cookie jar now holds {} cookies", jar.count()?);
    }

    Ok(report)
}

/// Overlay names given on the command line.
struct PanelOverlays {
    show: Vec<String>,
    hide: Vec<String>,
}

fn parse_overlays(names: &[String]) -> Vec<Overlay> {
    names
        .iter()
        .filter_map(|name| {
            let overlay = Overlay::from_name(name);
            if overlay.is_none() {
                warn!("⚠️  Unknown overlay: {}", name);
            }
            overlay
        })
        .collect()
}

fn render_payments(
    state_path: &Path,
    ledger_path: Option<&Path>,
    requested: &PanelOverlays,
    recovery_keys: &[String],
    click: Option<PanelClick>,
    save: bool,
) -> Result<String> {
    let store = AppStore::load(state_path)
        .with_context(|| format!("Failed to load state from {:?}", state_path))?;
    let ledger: LedgerData = match ledger_path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read ledger data {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse ledger data {:?}", path))?
        }
        None => LedgerData::default(),
    };

    let mut overlays = OverlayFlags::default();
    for overlay in parse_overlays(&requested.show) {
        overlays.set(overlay, true);
    }

    let mut tab = PaymentsTab::new();
    if let [first, second] = recovery_keys {
        tab.handle_first_recovery_key_change(first.as_str());
        tab.handle_second_recovery_key_change(second.as_str());
    }

    let mut page = PaymentsPage::new(store, overlays);
    if let Some(click) = click {
        let settings = page.settings().clone();
        let props = PaymentsProps {
            settings: &settings,
            ledger: &ledger,
            overlays: page.overlays,
        };
        let acted = match click {
            PanelClick::TogglePayments => {
                tab.toggle_payments(&props, &mut page);
                true
            }
            PanelClick::ToggleAutoSuggest => tab.toggle_auto_suggest(&props, &mut page),
            PanelClick::History => tab.click_history_icon(&props, &mut page),
            PanelClick::AdvancedSettings => tab.click_advanced_settings_icon(&props, &mut page),
            PanelClick::FinishRecovery => {
                tab.finish_recovery(&mut page);
                true
            }
        };
        if !acted {
            warn!("⚠️  {:?} is not clickable in the current state", click);
        }
    }
    for overlay in parse_overlays(&requested.hide) {
        page.hide_overlay(overlay);
    }

    let props = PaymentsProps {
        settings: page.settings(),
        ledger: &ledger,
        overlays: page.overlays,
    };
    let view = tab.render(&props);
    let json = serde_json::to_string_pretty(&view)?;

    if save {
        let store = page.into_store();
        store
            .save()
            .with_context(|| format!("Failed to save state to {:?}", state_path))?;
        info!("💾 Saved settings to {:?}", state_path);
    }

    Ok(json)
}
