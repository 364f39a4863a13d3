//! Ghost Flap entry point
//!
//! Runs a headless autopilot session: the demo AI flaps through gaps,
//! restarts after each death, and the session summary is printed at the end.

use std::process::ExitCode;

use ghost_flap::sim::{GameEvent, GamePhase};
use ghost_flap::{Game, Settings};

/// Frame time fed to the runner (60 Hz display)
const FRAME_DT: f32 = 1.0 / 60.0;

const USAGE: &str =
    "usage: ghost-flap [--settings <path>] [--seed <u64>] [--seconds <f32>] [--json]";

struct Args {
    settings_path: Option<String>,
    seed: Option<u64>,
    seconds: f32,
    json: bool,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        settings_path: None,
        seed: None,
        seconds: 60.0,
        json: false,
    };
    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => {
                args.settings_path = Some(iter.next().ok_or("--settings needs a path")?);
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = Some(value.parse().map_err(|e| format!("bad --seed: {e}"))?);
            }
            "--seconds" => {
                let value = iter.next().ok_or("--seconds needs a value")?;
                let seconds: f32 = value.parse().map_err(|e| format!("bad --seconds: {e}"))?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(format!("bad --seconds: {value} is not a finite duration"));
                }
                args.seconds = seconds;
            }
            "--json" => args.json = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let mut settings = match &args.settings_path {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    log::info!("Ghost Flap (headless) starting with seed {}", settings.seed);

    let mut game = Game::new(settings);
    game.set_idle_mode(true);

    let frames = (args.seconds / FRAME_DT) as u64;
    for _ in 0..frames {
        for event in game.update(FRAME_DT) {
            match event {
                GameEvent::Died { score } => log::info!("Run over: {} points", score),
                GameEvent::Scored { score } => log::debug!("Score {}", score),
                _ => {}
            }
        }

        // Press restart once the control has fully scaled in
        let world = &game.world;
        if world.phase == GamePhase::Dead
            && world.restart.as_ref().is_some_and(|r| r.scale >= 1.0)
        {
            let center = world.settings.screen_center();
            game.tap(center);
        }
    }

    if args.json {
        let summary = serde_json::json!({
            "snapshot": game.world.snapshot(),
            "session": game.session,
            "total_ticks": game.total_ticks,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                log::error!("Failed to serialize summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let session = &game.session;
        println!(
            "{} runs finished, best score {}, mean {:.2}, longest run {:.1}s",
            session.run_count(),
            session.best_score(),
            session.mean_score(),
            ghost_flap::ticks_to_secs(session.longest_survival_ticks())
        );
        let best_run = session.best().map(|r| r.run);
        for record in &session.runs {
            let marker = if Some(record.run) == best_run { " *" } else { "" };
            println!(
                "{:>3}. {:>4} points  {:>6.1}s{}",
                record.run,
                record.score,
                record.seconds_survived(),
                marker
            );
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        parse_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["--seed", "42", "--seconds", "2.5", "--json"]).unwrap();
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.seconds, 2.5);
        assert!(args.json);
        assert!(args.settings_path.is_none());
    }

    #[test]
    fn test_seconds_must_be_finite() {
        assert!(parse(&["--seconds", "inf"]).is_err());
        assert!(parse(&["--seconds", "NaN"]).is_err());
        assert!(parse(&["--seconds", "-1"]).is_err());
        assert!(parse(&["--seconds", "0"]).is_ok());
    }

    #[test]
    fn test_unknown_argument() {
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["--seed"]).is_err());
    }
}
