use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use health_screening::{Config, FieldRegistry, FormKind, FormState, Predictor, Route};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "health-screening", version, about = "Health risk pre-screening forms")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Tui {
        /// Route to open first, e.g. /pre-heart
        #[arg(long, default_value = "/")]
        route: String,
    },

    /// List screening routes and their fields
    Forms,

    /// Validate and score one form without the UI
    Screen {
        /// Form route, e.g. /pre-diabetes or symptom
        route: String,

        /// Field value as name=value; repeat for each field
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {:?}", s))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command.unwrap_or(Command::Tui {
        route: "/".to_string(),
    }) {
        Command::Tui { route } => {
            init_file_logging(&config)?;
            run_ui_mode(&config, &route)
        }
        Command::Forms => {
            print_forms();
            Ok(())
        }
        Command::Screen {
            route,
            values,
            json,
        } => {
            init_stderr_logging(&config);
            run_screen(&config, &route, &values, json)
        }
    }
}

fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter))
}

fn init_stderr_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so it only logs when a file is configured
fn init_file_logging(config: &Config) -> Result<()> {
    let Some(path) = config.logging.file.as_ref() else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn form_route(route: &str) -> Result<FormKind> {
    match Route::from_path(route) {
        Some(Route::Form(kind)) => Ok(kind),
        Some(Route::Home) => bail!("the home page has no form; pick one of the routes from `forms`"),
        None => Err(anyhow!("unknown route: {}", route)),
    }
}

fn print_forms() {
    for kind in FormKind::all() {
        println!("{:<16} {}", kind.route(), kind.title());
        for field in FieldRegistry::for_form(*kind).fields() {
            println!("    {:<22} {:<34} {}", field.name, field.label, field.range_text());
        }
        println!();
    }
}

fn run_screen(config: &Config, route: &str, values: &[(String, String)], json: bool) -> Result<()> {
    let kind = form_route(route)?;
    let mut form = FormState::new(kind);

    for (name, value) in values {
        if !form.fields().iter().any(|f| &f.name == name) {
            bail!("{} has no field named {:?}", kind.route(), name);
        }
        form.set_value(name, value.as_str());
    }

    let payload = form
        .submit_payload()
        .ok_or_else(|| anyhow!(form.error.clone().unwrap_or_default()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut predictor = Predictor::from_config(config)?;

    info!(form = kind.endpoint(), mode = ?predictor.mode(), "screening");
    let result = runtime
        .block_on(predictor.predict(kind, &payload))
        .map_err(|e| anyhow!(e.user_message()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.summary());
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config, route: &str) -> Result<()> {
    let start = Route::from_path(route).ok_or_else(|| anyhow!("unknown route: {}", route))?;
    let predictor = Predictor::from_config(config)?;

    let mut app = health_screening::ui::App::new(predictor, start)?;
    health_screening::ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config, _route: &str) -> Result<()> {
    bail!("TUI mode not available; rebuild with --features tui or use `health-screening screen`")
}
