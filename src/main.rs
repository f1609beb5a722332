use std::process::ExitCode;

use distpack::cli;

fn main() -> ExitCode {
    match cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}
