use std::io::{self, BufRead};
use std::process;
use std::sync::mpsc::{self, Sender};
use std::thread;

use mission_clock::config::USAGE;
use mission_clock::logging::init_tracing;
use mission_clock::{CliOptions, ClockCommand, MissionClock};

fn main() {
    init_tracing("mission_clock=info,warn");

    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("mission-clock: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };
    if options.show_help {
        println!("{USAGE}");
        return;
    }

    let clock = MissionClock::new(options.config);
    let result = if options.read_stdin {
        let (tx, rx) = mpsc::channel();
        spawn_stdin_reader(tx);
        clock.show_with_commands(rx)
    } else {
        clock.show()
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        process::exit(1);
    }
}

/// Forward command lines from stdin until EOF or until the window is gone.
fn spawn_stdin_reader(tx: Sender<ClockCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {e}");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ClockCommand>() {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!("Ignoring '{}': {e}", line.trim()),
            }
        }
        tracing::debug!("Stdin reader finished");
    });
}
