//! Replay a gesture script and print the resulting scene snapshot as JSON.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay a recorded InkPad gesture script headlessly.
#[derive(Parser, Debug)]
#[command(name = "inkpad-replay", version, about)]
struct Args {
    /// JSON script holding an optional canvas config and a list of steps.
    #[arg(value_name = "SCRIPT.json")]
    script: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Replaying {}", args.script.display());

    let output = inkpad_replay::replay_file(&args.script)
        .and_then(|snapshot| Ok(snapshot.to_json()?));
    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay failed: {e}");
            eprintln!("inkpad-replay: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["inkpad-replay", "session.json"]).unwrap();
        assert_eq!(args.script, PathBuf::from("session.json"));

        assert!(Args::try_parse_from(["inkpad-replay"]).is_err());
    }
}
