//! cobble: hold the mouse button and cycle tools on a timer, driven by hotkeys.
//!
//! Run with: cobble /dev/input/eventN
//!
//! Press and release the toggle key (Z) to start or stop, the quit key
//! (Delete) to exit. Requires read access to the keyboard node and write
//! access to /dev/uinput.

use clap::Parser;
use cobble::config::DEFAULT_TITLE;
use cobble::{
    ActionRegistry, Args, Config, EvdevReader, Error, MAIN, Outcome, Result, Session,
    StatusReporter, ToolCycler, UinputMouse,
};
use std::io;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        println!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::try_from(args)?;
    log::debug!("config: {config:?}");

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| Error::Signal(e.to_string()))?;

    let reader = EvdevReader::open(&config.device)?;
    log::info!(
        "toggle with {}, quit with {} on {}",
        config.cycler.toggle_key,
        config.cycler.quit_key,
        reader.path().display()
    );
    let mouse = UinputMouse::create(&config.identity, &config.capabilities())?;

    let mut registry = ActionRegistry::new();
    let cycler = ToolCycler::new(config.cycler.clone());
    let status = cycler.status();
    registry.register(MAIN, cycler);
    if config.status {
        registry.register(MAIN, StatusReporter::new(io::stdout(), DEFAULT_TITLE, status));
    }

    let outcome = Session::new(reader, mouse, registry)
        .with_tick_rate(config.tick_rate)
        .run(&stop)?;

    match outcome {
        Outcome::Sentinel(code) => log::info!("exiting after quit key (code {code})"),
        Outcome::Interrupted => log::info!("exiting after signal"),
    }
    Ok(())
}
