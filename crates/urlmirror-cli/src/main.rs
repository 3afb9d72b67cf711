use urlmirror_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log file under the XDG state dir; stderr if that is not writable.
    if let Err(file_err) = logging::init_logging() {
        if let Err(err) = logging::init_logging_stderr() {
            eprintln!("urlmirror: logging disabled: {:#}; {:#}", file_err, err);
        }
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("urlmirror error: {:#}", err);
        std::process::exit(1);
    }
}
