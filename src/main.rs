//! Flappy Fiasco headless runner
//!
//! Plays one round with the autopilot at a fixed frame rate, then prints the
//! final snapshot as JSON and saves the wallet.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use flappy_fiasco::consts::FRAME_DT;
#[cfg(not(target_arch = "wasm32"))]
use flappy_fiasco::sim::{Autopilot, GameEvent, SimRng, Snapshot};
#[cfg(not(target_arch = "wasm32"))]
use flappy_fiasco::{RoundController, RoundError, TokenLedger, Tuning, Wallet};

#[cfg(not(target_arch = "wasm32"))]
struct RunnerConfig {
    seed: Option<u64>,
    wager: u64,
    target: f64,
    tuning: Option<PathBuf>,
    wallet: PathBuf,
    /// Autopilot stops flapping after this many seconds
    max_secs: f32,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            wager: 10,
            target: Autopilot::default().cash_out_at,
            tuning: None,
            wallet: PathBuf::from("wallet.json"),
            max_secs: 120.0,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Flappy Fiasco (headless) starting...");

    let Some(config) = parse_args() else {
        return ExitCode::FAILURE;
    };

    match run(&config) {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: failed to encode snapshot: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no runner in the browser
}

#[cfg(not(target_arch = "wasm32"))]
fn run(config: &RunnerConfig) -> Result<Snapshot, RoundError> {
    let tuning = match &config.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let rng = match config.seed {
        Some(seed) => SimRng::seeded(seed),
        None => SimRng::from_entropy(),
    };
    let wallet = Wallet::load_or_default(&config.wallet);

    let mut game = RoundController::new(wallet, rng, tuning)?;
    let pilot = Autopilot::new(config.target);
    game.start(config.wager)?;

    while game.round().is_running() {
        let command = pilot.decide(game.round(), game.tuning());
        if command.cash_out {
            match game.cash_out() {
                Ok(_) => {}
                Err(RoundError::CashOutTooEarly { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        if command.flap && game.round().elapsed < config.max_secs {
            game.flap();
        }
        game.update(FRAME_DT);
        for event in game.drain_events() {
            log_event(&event);
        }
    }

    for event in game.drain_events() {
        log_event(&event);
    }
    log::info!("Final balance: {}", game.ledger().balance());
    if let Err(e) = game.ledger().save(&config.wallet) {
        log::warn!("Failed to save wallet to {}: {}", config.wallet.display(), e);
    }
    Ok(game.snapshot())
}

#[cfg(not(target_arch = "wasm32"))]
fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Flapped => log::trace!("{event:?}"),
        GameEvent::CashedOut { .. } | GameEvent::Crashed { .. } => log::info!("{event:?}"),
        _ => log::debug!("{event:?}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn print_usage() {
    eprintln!("Usage: flappy-fiasco [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed N          RNG seed (random if omitted)");
    eprintln!("  --wager N         Tokens to stake (default 10)");
    eprintln!("  --target X        Autopilot cash-out multiplier (default 1.05)");
    eprintln!("  --tuning FILE     Tuning JSON document");
    eprintln!("  --wallet FILE     Wallet file (default wallet.json)");
    eprintln!("  --max-secs S      Stop flapping after S seconds (default 120)");
    eprintln!("  -h, --help        Show this help");
}

/// Parse the value following an option, or None with a message
#[cfg(not(target_arch = "wasm32"))]
fn parse_arg<T: std::str::FromStr>(args: &[String], i: &mut usize, opt_name: &str) -> Option<T> {
    *i += 1;
    if *i >= args.len() {
        eprintln!("Error: {opt_name} requires an argument");
        return None;
    }
    args[*i].parse().ok().or_else(|| {
        eprintln!("Error: {opt_name} requires a valid value");
        None
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Option<RunnerConfig> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RunnerConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--seed" => config.seed = Some(parse_arg(&args, &mut i, "--seed")?),
            "--wager" => config.wager = parse_arg(&args, &mut i, "--wager")?,
            "--target" => config.target = parse_arg(&args, &mut i, "--target")?,
            "--tuning" => config.tuning = Some(parse_arg(&args, &mut i, "--tuning")?),
            "--wallet" => config.wallet = parse_arg(&args, &mut i, "--wallet")?,
            "--max-secs" => config.max_secs = parse_arg(&args, &mut i, "--max-secs")?,
            "--help" | "-h" => {
                print_usage();
                return None;
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                return None;
            }
        }
        i += 1;
    }
    Some(config)
}
