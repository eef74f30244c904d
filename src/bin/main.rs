use std::process::ExitCode;

fn main() -> ExitCode {
    match kanjigraph::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
