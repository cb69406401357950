use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use pages_core::{update, AppState, Msg, ResultKind};
use pages_engine::{
    BackgroundEvent, CommonMarkRenderer, EngineServices, FileRelay, MenuClick, ReqwestApiClient,
    StateRelay, TriggerDispatcher, WindowId, ASK_MENU_ID,
};
use pages_logging::{pages_info, pages_warn};

use super::config::{load_config, AppConfig};
use super::effects::EffectRunner;
use super::host::{CliHost, SurfaceRequest};
use super::logging::{self, LogDestination};
use super::ui;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

const USAGE: &str = "\
usage: pages_app [--tab <url>] [--log-terminal] <command>

commands:
  install             register the \"Ask Prompt Pages\" selection menu
  select <text>       stage selected text as the question and open the popup
  icon <window-id>    open the side panel for a window
  popup               open the popup";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Background(BackgroundEvent),
    Popup,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    command: Command,
    active_tab: Option<String>,
    log_terminal: bool,
}

pub fn run_app() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args)?;
    logging::initialize(if invocation.log_terminal {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    let cwd = std::env::current_dir().context("reading working directory")?;
    let config = load_config(&cwd);
    let relay: Arc<dyn StateRelay> = Arc::new(FileRelay::new(config.store_dir.clone()));
    let host = Arc::new(CliHost::new(
        config.store_dir.clone(),
        invocation.active_tab.clone(),
    ));

    match invocation.command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Popup => run_popup(&config, relay, host),
        Command::Background(event) => {
            pages_info!("background event {:?}", event);
            let dispatcher = TriggerDispatcher::new(relay.clone(), host.clone());
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("starting background runtime")?;
            runtime.block_on(dispatcher.handle(event))?;

            match host.take_surface_request() {
                Some(SurfaceRequest::Popup) => run_popup(&config, relay, host),
                Some(SurfaceRequest::SidePanel(window_id)) => {
                    println!("side panel for window {window_id}");
                    run_popup(&config, relay, host)
                }
                None => Ok(()),
            }
        }
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut active_tab = None;
    let mut log_terminal = false;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tab" => {
                let Some(url) = iter.next() else {
                    bail!("--tab needs a URL\n\n{USAGE}");
                };
                active_tab = Some(url.clone());
            }
            "--log-terminal" => log_terminal = true,
            _ => rest.push(arg.as_str()),
        }
    }

    let command = match rest.as_slice() {
        [] | ["help"] | ["--help"] | ["-h"] => Command::Help,
        ["install"] => Command::Background(BackgroundEvent::Installed),
        ["select", words @ ..] => Command::Background(BackgroundEvent::MenuClicked(MenuClick {
            menu_item_id: ASK_MENU_ID.to_string(),
            selection_text: Some(words.join(" ")),
        })),
        ["icon", window_id] => {
            let window_id: WindowId = window_id
                .parse()
                .with_context(|| format!("invalid window id {window_id:?}"))?;
            Command::Background(BackgroundEvent::IconActivated { window_id })
        }
        ["popup"] => Command::Popup,
        other => bail!("unknown command {:?}\n\n{USAGE}", other.join(" ")),
    };

    Ok(Invocation {
        command,
        active_tab,
        log_terminal,
    })
}

/// Runs one popup surface until the user quits or input ends. State lives
/// only for this call; what should outlast it goes through the relay.
fn run_popup(
    config: &AppConfig,
    relay: Arc<dyn StateRelay>,
    host: Arc<CliHost>,
) -> anyhow::Result<()> {
    let api = ReqwestApiClient::new(config.api_settings())
        .with_context(|| format!("invalid API base {:?}", config.api_base))?;
    let runner = EffectRunner::new(EngineServices {
        api: Arc::new(api),
        relay,
        host,
        renderer: Arc::new(CommonMarkRenderer::default()),
    })
    .context("starting engine")?;

    let mut state = AppState::with_options(config.popup_options());
    for msg in runner.load_initial(STARTUP_TIMEOUT) {
        state = apply(state, msg, &runner);
    }
    print_view(&state);
    println!("{}", ui::constants::POPUP_HELP);

    let input_rx = spawn_input_reader();
    let mut input_closed = false;
    loop {
        // Once input ends, wait for in-flight requests so their output is shown.
        let wait = if input_closed {
            POLL_INTERVAL
        } else {
            Duration::ZERO
        };
        for msg in runner.poll(wait) {
            state = apply(state, msg, &runner);
        }
        if input_closed {
            if !state.is_loading(ResultKind::Summary) && !state.is_loading(ResultKind::Answer) {
                break;
            }
            continue;
        }

        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(ui::input::PopupInput::Msg(msg)) => state = apply(state, msg, &runner),
            Ok(ui::input::PopupInput::Show) => print_view(&state),
            Ok(ui::input::PopupInput::Quit) => break,
            Ok(ui::input::PopupInput::Unknown(line)) => {
                if !line.trim().is_empty() {
                    println!("unknown command {line:?}\n{}", ui::constants::POPUP_HELP);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => input_closed = true,
        }
    }

    runner.shutdown();
    pages_info!("popup closed");
    Ok(())
}

fn apply(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.enqueue(effects);
    if state.consume_dirty() {
        print_view(&state);
    }
    state
}

fn print_view(state: &AppState) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", ui::render::render(&state.view()));
    let _ = stdout.flush();
}

fn spawn_input_reader() -> mpsc::Receiver<ui::input::PopupInput> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(ui::input::parse_line(&line)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    pages_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use pages_engine::{BackgroundEvent, MenuClick, ASK_MENU_ID};

    use super::{parse_args, Command};

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn select_joins_words_into_selection() {
        let invocation = parse_args(&args("select what is borrowing")).unwrap();
        assert_eq!(
            invocation.command,
            Command::Background(BackgroundEvent::MenuClicked(MenuClick {
                menu_item_id: ASK_MENU_ID.to_string(),
                selection_text: Some("what is borrowing".to_string()),
            }))
        );
    }

    #[test]
    fn flags_can_precede_command() {
        let invocation = parse_args(&args("--tab https://example.com --log-terminal popup")).unwrap();
        assert_eq!(invocation.command, Command::Popup);
        assert_eq!(invocation.active_tab.as_deref(), Some("https://example.com"));
        assert!(invocation.log_terminal);
    }

    #[test]
    fn icon_needs_numeric_window() {
        assert_eq!(
            parse_args(&args("icon 12")).unwrap().command,
            Command::Background(BackgroundEvent::IconActivated { window_id: 12 })
        );
        assert!(parse_args(&args("icon main")).is_err());
        assert!(parse_args(&args("--tab")).is_err());
        assert!(parse_args(&args("frobnicate")).is_err());
    }

    #[test]
    fn no_arguments_prints_help() {
        assert_eq!(parse_args(&[]).unwrap().command, Command::Help);
    }
}
