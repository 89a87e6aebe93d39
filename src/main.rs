//! Tombola - live raffle drawing from weighted number pools

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tombola::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
