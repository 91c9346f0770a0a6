//! Weatherify - playlists that match the weather outside

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use url::Url;
use weatherify_app::{Action, Controller, Dispatch};
use weatherify_core::{AppError, Config, ConfigError, Notification, SystemBrowser};

/// Weatherify command line client
#[derive(Parser, Debug)]
#[command(name = "weatherify")]
#[command(version)]
#[command(about = "Generate a playlist that matches the weather where you are")]
struct Args {
    /// Launch URL, optionally carrying `login_success` / `login_error`
    /// (defaults to `app.url` from the config)
    #[arg(long)]
    url: Option<String>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Login,
    Generate,
    Logout,
    Refresh,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "login" => Ok(Self::Login),
            "generate" | "gen" => Ok(Self::Generate),
            "logout" => Ok(Self::Logout),
            "refresh" => Ok(Self::Refresh),
            "status" | "" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        }
    }
}

const HELP: &str = "\
Commands:
  login     open the browser to log in
  generate  create a playlist for the current weather
  logout    end the session
  refresh   look up the weather again
  status    show the current screen
  quit      exit";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    if let Err(e) = weatherify_core::init(log_level) {
        eprintln!("{}", e);
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{} ({})", e.user_message(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let (config, _) = Config::load_validated(args.config.as_deref())
        .map_err(|e| ConfigError::Invalid(format!("{:#}", e)))?;

    let app_url = parse_url(&config.app.url, "app.url")?;
    let launch_url = match &args.url {
        Some(url) => parse_url(url, "--url")?,
        None => app_url.clone(),
    };

    let mut controller = Controller::from_config(&config, Arc::new(SystemBrowser), launch_url)?;
    let mut shown = controller.notifications().subscribe();

    controller.mount();
    render(&controller, &mut shown);

    // Commands and task results are handled as they arrive; a slow request
    // only keeps its own part of the screen loading.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => return Err(AppError::Io(e)),
                };
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if run_command(&mut controller, command, &app_url, &mut shown).await {
                            render(&controller, &mut shown);
                        }
                    }
                    Err(message) => println!("{}", message),
                }
            }
            true = controller.process_next(), if controller.has_pending() => {
                render(&controller, &mut shown);
            }
            Ok(()) = shown.changed() => {
                // Hides need no redraw; the next screen simply omits them.
                if shown.borrow_and_update().is_some() {
                    print!("{}", controller.screen());
                }
            }
        }
    }

    tracing::info!("Weatherify exiting");
    Ok(())
}

/// Run one command. Returns whether the screen should be redrawn.
async fn run_command(
    controller: &mut Controller,
    command: Command,
    app_url: &Url,
    shown: &mut Shown,
) -> bool {
    match command {
        Command::Quit => false,
        Command::Help => {
            println!("{}", HELP);
            false
        }
        Command::Status => true,
        Command::Refresh => {
            controller.refresh_weather();
            true
        }
        Command::Login => {
            login(controller, app_url, shown).await;
            true
        }
        Command::Generate => {
            if !controller.screen().offers(Action::Generate) {
                println!("Log in first.");
                return false;
            }
            if controller.generate() == Dispatch::Busy {
                println!("A request is already running.");
            }
            true
        }
        Command::Logout => {
            if !controller.screen().offers(Action::Logout) {
                println!("Not logged in.");
                return false;
            }
            if controller.logout() == Dispatch::Busy {
                println!("A request is already running.");
            }
            true
        }
    }
}

/// Open the browser for login and wait for the backend to redirect back.
///
/// Task results keep being handled while waiting.
async fn login(controller: &mut Controller, app_url: &Url, shown: &mut Shown) {
    if !controller.screen().offers(Action::Login) {
        println!("Already logged in.");
        return;
    }

    let listener = match controller.begin_login(app_url) {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Login failed to start: {}", e);
            println!("{}", e.user_message());
            return;
        }
    };

    println!("Finish logging in in your browser (Ctrl+C to cancel).");
    let redirect = listener.wait_for_redirect();
    tokio::pin!(redirect);
    let cancel = tokio::signal::ctrl_c();
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            result = &mut redirect => {
                match result {
                    Ok(redirect) => controller.complete_login(redirect),
                    Err(e) => {
                        tracing::error!("Login redirect failed: {}", e);
                        println!("{}", e.user_message());
                    }
                }
                return;
            }
            _ = &mut cancel => {
                println!("Login cancelled.");
                return;
            }
            true = controller.process_next(), if controller.has_pending() => {
                render(controller, shown);
            }
        }
    }
}

type Shown = watch::Receiver<Option<Notification>>;

/// Print the screen, marking the visible notification as seen.
fn render(controller: &Controller, shown: &mut Shown) {
    shown.borrow_and_update();
    print!("{}", controller.screen());
}

fn parse_url(value: &str, field: &str) -> Result<Url, AppError> {
    Url::parse(value)
        .map_err(|e| ConfigError::Invalid(format!("{}: {} ({})", field, value, e)).into())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::time::Duration;
    use weatherify_core::NotificationPresenter;
    use weatherify_services::BackendClient;
    use weatherify_weather::{ConfiguredLocation, LocationWeatherResolver, WeatherProvider};

    fn offline_controller() -> Controller {
        let unreachable = "http://127.0.0.1:9";
        let location = ConfiguredLocation::from_settings(Some((0.0, 0.0)), unreachable);
        let provider = WeatherProvider::new(unreachable, None).unwrap();
        Controller::new(
            LocationWeatherResolver::new(location, provider),
            Arc::new(BackendClient::new(unreachable, None).unwrap()),
            NotificationPresenter::new(Duration::from_secs(60)),
            Arc::new(SystemBrowser),
            Url::parse("http://127.0.0.1:5173/").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_render_marks_notification_seen() {
        let controller = offline_controller();
        let mut shown = controller.notifications().subscribe();

        controller.notifications().show("In progress!");
        assert!(shown.has_changed().unwrap());

        render(&controller, &mut shown);
        assert!(!shown.has_changed().unwrap());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("login".parse::<Command>(), Ok(Command::Login));
        assert_eq!(" Generate ".parse::<Command>(), Ok(Command::Generate));
        assert_eq!("".parse::<Command>(), Ok(Command::Status));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "weatherify",
            "--url",
            "http://127.0.0.1:5173/?login_success=true",
            "--debug",
        ]);
        assert!(args.debug);
        assert_eq!(
            args.url.as_deref(),
            Some("http://127.0.0.1:5173/?login_success=true")
        );
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        assert!(parse_url("not a url", "--url").is_err());
    }
}
