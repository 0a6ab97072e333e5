use std::io::stdin;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use quarto::{
    engine::{DEFAULT_MAX_DEPTH, Engine, EngineConfig, MAX_DEPTH, transposition::TablePolicy},
    protocol::{Command, Response},
};

/// Quarto solver speaking a line-based protocol on stdin/stdout
#[derive(Parser, Debug)]
struct Args {
    /// Search depth used when `go` does not specify one
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::value_parser!(u8).range(1..=MAX_DEPTH as i64)
    )]
    depth: u8,

    /// Only reuse stored bounds from the transposition table when they fall outside the search window
    #[arg(long)]
    bound_checked: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut engine = Engine::new(EngineConfig {
        max_depth: args.depth,
        table_policy: if args.bound_checked {
            TablePolicy::BoundChecked
        } else {
            TablePolicy::Loose
        },
    });
    info!("Engine started with {:?}", engine.config());

    for line in stdin().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!("Rejected input {line:?}: {e}");
                println!("{}", Response::Error(e.to_string()));
                continue;
            }
        };

        match command {
            Command::IsReady => {
                // Everything is blocking, so by the time we read this message, we're ready
                println!("{}", Response::ReadyOk);
            }
            Command::NewGame => engine.reset_game(),
            Command::Debug(debug) => engine.set_debug(debug),
            Command::Position { moves } => {
                if let Err(e) = engine.set_position(moves) {
                    println!("{}", Response::Error(e.to_string()));
                }
            }
            Command::Go { piece, depth } => match engine.go(piece, depth) {
                Ok(result) => {
                    if engine.debug() {
                        println!("{}", Response::info(&result));
                    }
                    println!("{}", Response::BestMove(result));
                }
                Err(e) => println!("{}", Response::Error(e.to_string())),
            },
            Command::Quit => return Ok(()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn default_depth_must_be_searchable() {
        assert!(Args::try_parse_from(["quarto", "--depth", "0"]).is_err());
        assert!(Args::try_parse_from(["quarto", "--depth", "17"]).is_err());

        let args = Args::try_parse_from(["quarto", "-d", "16"]).unwrap();
        assert_eq!(args.depth, MAX_DEPTH);
        let args = Args::try_parse_from(["quarto"]).unwrap();
        assert_eq!(args.depth, DEFAULT_MAX_DEPTH);
        assert!(!args.bound_checked);
    }
}
