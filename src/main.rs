use anyhow::Result;
use clap::{Parser, Subcommand};
use dynamic_preferences::{
    Autodiscovery, Preference, PreferenceRegistry, Scope, Settings, SettingsLoader,
};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Discover and inspect application preferences
///
/// Runs autodiscovery over the configured apps for one scope and prints the
/// result as JSON.
#[derive(Parser, Debug)]
#[command(name = "dynprefs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file
    ///
    /// If not specified, looks for:
    /// 1. ./.dynprefs.toml
    /// 2. $DYNPREFS_CONFIG
    /// 3. ~/.config/dynprefs/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding on-disk preference modules
    #[arg(long)]
    apps_dir: Option<PathBuf>,

    /// Installed app (repeatable, replaces installed_apps from settings)
    #[arg(short, long = "app", value_name = "APP")]
    apps: Vec<String>,

    /// Preference scope to discover
    #[arg(short, long, value_enum, default_value_t = Scope::Global)]
    scope: Scope,

    /// Load `{app}.tests.preferences` modules instead
    #[arg(long)]
    test_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log to file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every discovered preference
    Discover,

    /// Print the preferences of one app
    App { app: String },

    /// Print a single preference
    Get {
        app: String,
        name: String,

        /// Printed as the preference default when the lookup misses
        /// (JSON, or a bare string)
        #[arg(short, long)]
        default: Option<String>,
    },
}

fn setup_logging(log_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(log_path)?;
        subscriber.with_ansi(false).with_writer(file).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => SettingsLoader::load_file(path)?,
        None => SettingsLoader::new().load()?,
    };

    if !args.apps.is_empty() {
        settings.installed_apps = args.apps.clone();
    }
    if let Some(apps_dir) = &args.apps_dir {
        settings.apps_dir = Some(apps_dir.clone());
    }
    if args.test_mode {
        settings.test_mode = true;
    }

    settings.validate()?;
    Ok(settings)
}

fn parse_default(raw: &str) -> Preference {
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Preference::with_default(value)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            return Err(e);
        }
    };

    let log_level = args
        .log_level
        .clone()
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    setup_logging(&log_level, args.log_file.clone())?;

    debug!("Settings: {:?}", settings);
    info!(
        "Discovering {} preferences for {} apps",
        args.scope,
        settings.installed_apps.len()
    );

    let mut discovery: Autodiscovery<Preference> = Autodiscovery::from_settings(&settings);
    let mut registry = PreferenceRegistry::new(args.scope);
    registry.autodiscover(&mut discovery, false)?;

    let output = match &args.command {
        Command::Discover => serde_json::to_string_pretty(&registry)?,
        Command::App { app } => serde_json::to_string_pretty(registry.app(app)?)?,
        Command::Get { app, name, default } => match default {
            Some(raw) => {
                let default = parse_default(raw);
                serde_json::to_string_pretty(registry.get_or(app, name, &default))?
            }
            None => serde_json::to_string_pretty(registry.get(app, name)?)?,
        },
    };

    println!("{}", output);
    Ok(())
}
