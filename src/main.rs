mod alert;
mod config;
mod hotkey;
mod listener;
mod notify;
mod stop;
mod telemetry;
mod tracker;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::Config;
use crate::listener::Supervisor;
use crate::notify::{CommandNotifier, LogNotifier, Notifier};
use crate::stop::{StopReason, StopSignal};
use crate::telemetry::Decoded;

#[derive(Parser)]
#[command(name = "sat-rise-alert")]
#[command(about = "Voice and popup alerts for satellite rise (FAOS) packets")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for FAOS packets and raise alerts
    Run {
        /// YAML config file
        #[arg(short, long)]
        config: Option<String>,
        /// Override listener.bind
        #[arg(long)]
        bind: Option<String>,
        /// Log alerts instead of speaking / showing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Load and validate a config file, then print the effective settings
    CheckConfig {
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Show how a single line decodes
    Decode { line: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Run {
            config,
            bind,
            dry_run,
        } => run(config.as_deref(), bind, dry_run),
        Commands::CheckConfig { config } => check_config(config.as_deref()),
        Commands::Decode { line } => decode(&line),
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match Config::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Config error: {}", e);
            None
        }
    }
}

fn run(path: Option<&str>, bind: Option<String>, dry_run: bool) -> ExitCode {
    let Some(mut config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    if let Some(bind) = bind {
        config.listener.bind = bind;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let notifier: Arc<dyn Notifier> = if dry_run {
        Arc::new(LogNotifier)
    } else {
        Arc::new(CommandNotifier::from_config(&config.notify))
    };

    let stop = StopSignal::new();
    hotkey::spawn(stop.clone());

    let failures = runtime.block_on(async {
        let interrupt = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Ctrl+C received. Shutting down...");
                interrupt.stop(StopReason::Interrupt);
            }
        });

        Supervisor::new(config, notifier, stop.clone()).run().await
    });
    if failures > 0 {
        log::warn!("Listener restarted after {} failure(s)", failures);
    }

    match stop.reason() {
        Some(StopReason::Fatal) => {
            log::error!("Listener failed and restarts are disabled");
            ExitCode::FAILURE
        }
        reason => {
            log::info!(
                "Exited cleanly ({})",
                reason.map(|r| r.to_string()).unwrap_or_default()
            );
            ExitCode::SUCCESS
        }
    }
}

fn check_config(path: Option<&str>) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let t = &config.tracking;
    println!("Config is valid");
    println!("  bind:                 {}", config.listener.bind);
    println!("  poll interval:        {}", config.listener.poll_interval);
    println!("  alert threshold:      {}s", t.alert_threshold_seconds);
    println!("  new pass jump:        {}s", t.pass_jump_threshold_seconds);
    println!("  tolerance:            {}s", t.tolerance_seconds);
    println!("  resync gap:           {}s", t.resync_gap_seconds);
    println!("  required good:        {}", t.required_good);
    println!("  speak once per pass:  {}", t.speak_once_per_pass);
    if t.allowed_sats.is_empty() {
        println!("  allowed satellites:   all");
    } else {
        let mut sats: Vec<_> = t.allowed_sats.iter().map(String::as_str).collect();
        sats.sort_unstable();
        println!("  allowed satellites:   {}", sats.join(", "));
    }
    println!(
        "  voice / popup:        {} / {} ({}s)",
        config.notify.enable_voice, config.notify.enable_popup, config.notify.popup_timeout_seconds
    );
    println!(
        "  restart on error:     {} (after {})",
        config.supervisor.restart_on_error, config.supervisor.restart_delay
    );
    ExitCode::SUCCESS
}

fn decode(line: &str) -> ExitCode {
    let decoded = telemetry::decode(line, chrono::Utc::now());
    match serde_json::to_string_pretty(&decoded) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            return ExitCode::FAILURE;
        }
    }
    if decoded == Decoded::Ignored {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
