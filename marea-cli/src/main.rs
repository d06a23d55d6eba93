//! Entry point for the `marea` command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr before exiting"
)]
fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = marea_cli::run() {
        eprintln!("marea: {err}");
        std::process::exit(1);
    }
}
