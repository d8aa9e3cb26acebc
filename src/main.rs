use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod config;
mod error;
mod event;
mod process;
mod ssh_config;
mod ui;

use app::App;
use config::{load_settings, AppConfig, ConfigManager};
use event::EventHandler;
use process::{find_executable, install_guidance, LoginRequest, SessionRunner, SshpassRunner};
use ssh_config::{HostEntry, SshConfig};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Browse the hosts in your SSH config and log in to one with a password.
#[derive(Parser, Debug)]
#[command(name = "sshpick", version)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    Cli::parse();

    let (config, log_dir) = load_settings(ConfigManager::new());
    if let Some(log_dir) = log_dir {
        match init_logging(&log_dir) {
            Ok(log_file) => debug!("Logging to {}", log_file.display()),
            Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
        }
    }
    debug!("Starting sshpick with {:?}", config);

    run(config).await
}

/// Where startup lands before any UI is shown.
enum Startup {
    Browse {
        ssh_config: SshConfig,
        hosts: Vec<HostEntry>,
    },
    Exit(u8),
}

/// Checks that run before the UI: the password feeder, the SSH config path
/// and its hosts. Messages for the early exits go to stdout.
fn prepare(config: &AppConfig, feeder: Option<PathBuf>) -> Startup {
    if feeder.is_none() {
        tracing::error!("{} not found on PATH", config.password_feeder);
        println!("{}", install_guidance(&config.password_feeder));
        return Startup::Exit(1);
    }

    let path = match config.ssh_config_path() {
        Ok(path) => path,
        Err(e) => {
            println!("Could not locate SSH config: {:#}", e);
            return Startup::Exit(1);
        }
    };

    let ssh_config = SshConfig::from_path(&path);
    let hosts = match ssh_config.hosts() {
        Ok(hosts) => hosts,
        Err(e) => {
            tracing::error!("{}", e);
            println!("Could not parse SSH config: {}", e);
            return Startup::Exit(1);
        }
    };
    if hosts.is_empty() {
        println!("No hosts found in {}", path.display());
        return Startup::Exit(0);
    }

    Startup::Browse { ssh_config, hosts }
}

async fn run(config: AppConfig) -> ExitCode {
    let feeder = find_executable(&config.password_feeder);
    let (ssh_config, hosts) = match prepare(&config, feeder) {
        Startup::Browse { ssh_config, hosts } => (ssh_config, hosts),
        Startup::Exit(code) => return ExitCode::from(code),
    };

    let runner: Arc<dyn SessionRunner> = Arc::new(SshpassRunner::new(&config));
    let launch = match run_tui(ssh_config, hosts, Arc::clone(&runner)).await {
        Ok(launch) => launch,
        Err(e) => {
            tracing::error!("UI failed: {:#}", e);
            println!("Error running program: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // The session's own outcome does not change ours.
    if let Some(request) = launch {
        if let Err(e) = runner.launch(&request) {
            tracing::error!("{:#}", e);
            eprintln!("{:#}", e);
        }
    }
    ExitCode::SUCCESS
}

fn init_logging(log_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "sshpick_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sshpick=debug".parse()?))
        .with_ansi(false)
        .with_writer(file)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(log_file)
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Enter raw mode and the alternate screen, undoing both if any step fails.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let terminal = execute!(io::stdout(), EnterAlternateScreen)
        .context("Failed to enter alternate screen")
        .and_then(|()| {
            Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")
        });
    if terminal.is_err() {
        restore_terminal();
    }
    terminal
}

/// Run the interactive loop and return the login to hand the terminal to.
async fn run_tui(
    ssh_config: SshConfig,
    hosts: Vec<HostEntry>,
    runner: Arc<dyn SessionRunner>,
) -> Result<Option<LoginRequest>> {
    // Install panic hook that restores terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let mut events = EventHandler::new(TICK_RATE);
    let mut app = App::new(ssh_config, hosts, runner, events.sender());
    let res = run_app(&mut terminal, &mut app, &mut events).await;

    // Stop the input reader before anything else touches stdin.
    drop(events);

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    res?;
    Ok(app.take_launch())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw::<B>(f, app))?;

        let Some(event) = events.next().await else {
            break;
        };
        app.handle_event(event)?;
    }
    Ok(())
}
