use anyhow::Context;
use imgmap::pipeline::run_image;
use imgmap_signalfx::cli::{self, Invocation};
use imgmap_signalfx::{IngestConfig, SignalFxSink};
use log::{LevelFilter, info};
use simple_logger::SimpleLogger;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Warnings and errors by default, RUST_LOG overrides.
    if let Err(err) = SimpleLogger::new().with_level(LevelFilter::Warn).env().init() {
        eprintln!("Error: could not set up logging: {err}");
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Written directly so that RUST_LOG cannot hide why the run failed.
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let image_path = match cli::parse_args(std::env::args_os())? {
        Invocation::Send(path) => path,
        Invocation::Print(text) => {
            print!("{text}");
            return Ok(());
        }
    };

    let report = run_image(&image_path, || IngestConfig::from_env().and_then(SignalFxSink::new))
        .await
        .with_context(|| format!("Could not send {}", image_path.display()))?;

    info!(
        "Sent {} datapoints for {} ({}x{}) at {}",
        report.samples, report.image, report.width, report.height, report.timestamp
    );
    Ok(())
}
