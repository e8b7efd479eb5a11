use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use platformer_engine::core::{Game, GameConfig, InitializationError};
use platformer_engine::logging::{init_logging, LoggingConfig};
use platformer_engine::platform::{Platform, WinitPlatform};

fn main() -> ExitCode {
    // Command-line arguments are accepted and ignored.
    init_logging(LoggingConfig::default());

    println!("==================================");
    println!("===  Platformer Game  ·  Rust  ===");
    println!("==================================");
    println!();

    let outcome = guarded(|| launch(WinitPlatform::default(), GameConfig::default()));
    let code = exit_status(&outcome);

    match &outcome {
        Ok(()) => println!("\nGame terminated successfully."),
        Err(err) => eprintln!("{}", diagnostic(err)),
    }

    ExitCode::from(code)
}

/// Builds the game, runs it to completion, then drops it (releasing the display).
fn launch<P: Platform>(platform: P, config: GameConfig) -> anyhow::Result<()> {
    let mut game = Game::new(platform, config)?;
    game.run();
    Ok(())
}

/// Runs `f`, turning a panic into an ordinary error.
///
/// The game is dropped while unwinding, so the display is released before the
/// error reaches `main`.
fn guarded<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("game loop panicked")),
    }
}

/// `0` on a normal stop, `1` on any failure.
fn exit_status(outcome: &anyhow::Result<()>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Message written to stderr for a failed run.
///
/// Only display acquisition failures are known to the user; anything else gets
/// a generic line (details are in the log).
fn diagnostic(err: &anyhow::Error) -> String {
    match err.downcast_ref::<InitializationError>() {
        Some(init) => format!("Fatal error: {init}"),
        None => {
            log::error!("unrecognized failure: {err:#}");
            "Unknown fatal error occurred.".to_string()
        }
    }
}
