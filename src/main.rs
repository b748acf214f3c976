use std::process::ExitCode;

fn main() -> ExitCode {
    match conjoint_utils::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
