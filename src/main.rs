use probitas::ExitCode;
use probitas::cli::{self, Commands, Output, Router};
use probitas::engine::UnlinkedEngine;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    cli::setup_logging();

    let output = Output::stdio();
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            tracing::error!(error = %err, "Failed to resolve working directory");
            output.error(&format!("Cannot determine the current directory: {err}"));
            return ExitCode::USAGE_ERROR.into();
        }
    };

    let args = std::env::args_os().skip(1);
    let router = Router::new(Commands::new(UnlinkedEngine, output.clone()), output);
    router.run(args, &cwd).await.into()
}
