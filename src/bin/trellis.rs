use std::io::BufRead;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Deserialize;
use tracing::{debug, info, warn};
use trellis_wm::actor::reactor::{self, Reactor};
use trellis_wm::bus::{Bus, Dispatch, WmEvent};
use trellis_wm::common::config::{Config, config_file};
use trellis_wm::common::log;
use trellis_wm::context::{Context, WmState};
use trellis_wm::handlers;
use trellis_wm::sys::geometry::Rect;
use trellis_wm::sys::screen::{ScreenDescriptor, VirtualScreens};
use trellis_wm::sys::window::WindowHandle;

/// Drives the window manager core from JSON lines on stdin and prints every
/// event it raises as a JSON line on stdout.
#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    /// Print the final container tree as JSON on exit.
    #[arg(long)]
    dump: bool,
}

/// One line of input.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum Input {
    /// The full, current set of screens.
    Screens { screens: Vec<ScreenDescriptor> },
    WindowCreated {
        handle: WindowHandle,
        #[serde(default)]
        title: String,
        frame: Rect,
    },
    WindowMoved { handle: WindowHandle, frame: Rect },
    WindowDestroyed { handle: WindowHandle },
    WindowFocused { handle: WindowHandle },
    Quit,
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();

    log::init_logging();
    install_panic_hook();

    let config_path = opt.config.clone().unwrap_or_else(config_file);
    let config = match Config::read_or_default(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    };

    let issues = config.validate();
    if opt.validate || !issues.is_empty() {
        if issues.is_empty() {
            println!("Config validation passed");
            return;
        }
        for issue in issues {
            eprintln!("{issue}");
        }
        process::exit(1);
    }

    let screens = VirtualScreens::default();
    let cx = match build_context(&config, screens.clone()) {
        Ok(cx) => cx,
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    };

    let (events_tx, events_rx) = trellis_wm::actor::channel();

    let signal_tx = events_tx.clone();
    if let Err(err) = ctrlc::set_handler(move || signal_tx.send(reactor::Event::Shutdown)) {
        warn!("Could not install Ctrl+C handler: {err}");
    }

    std::thread::spawn(move || read_input(screens, events_tx));

    info!(config = %config_path.display(), "Started");
    let cx = Reactor::new(cx).run(events_rx);
    debug!("Final tree:\n{}", cx.tree().draw());

    if opt.dump {
        match serde_json::to_string_pretty(&cx.tree().snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!("Could not serialize tree: {err}"),
        }
    }
}

fn build_context(config: &Config, screens: VirtualScreens) -> anyhow::Result<Context> {
    let mut bus = Bus::new();
    // Subscribed first so events print in the order they are raised.
    bus.subscribe_all(|_: &mut Dispatch<'_>, event: &WmEvent| match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(err) => warn!("Could not serialize {:?}: {err}", event.kind()),
    });
    handlers::register_all(&mut bus, config)?;
    Ok(Context::new(bus, WmState::new(screens))?)
}

fn read_input(screens: VirtualScreens, tx: reactor::Sender) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("Failed to read stdin: {err}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let input = match serde_json::from_str::<Input>(&line) {
            Ok(input) => input,
            Err(err) => {
                warn!("Ignoring malformed input: {err}");
                continue;
            }
        };
        debug!(?input, "input");
        let event = match input {
            Input::Screens { screens: current } => {
                screens.set_screens(current);
                reactor::Event::ScreensChanged
            }
            Input::WindowCreated { handle, title, frame } => {
                screens.set_window_frame(handle, frame);
                reactor::Event::WindowCreated { handle, title }
            }
            Input::WindowMoved { handle, frame } => {
                screens.set_window_frame(handle, frame);
                continue;
            }
            Input::WindowDestroyed { handle } => {
                screens.forget_window(handle);
                reactor::Event::WindowDestroyed(handle)
            }
            Input::WindowFocused { handle } => reactor::Event::WindowFocused(handle),
            Input::Quit => break,
        };
        tx.send(event);
    }
    tx.send(reactor::Event::Shutdown);
}

#[cfg(panic = "unwind")]
fn install_panic_hook() {
    // A panic on the input thread must not leave the reactor waiting forever.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        original_hook(info);
        std::process::abort();
    }));
}

#[cfg(not(panic = "unwind"))]
fn install_panic_hook() {}
