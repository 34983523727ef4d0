// THEORY:
// The command line takes exactly one thing: the image to send. Everything else
// (endpoint, token, batching) is configuration from the environment, so the
// argument surface stays a single positional path.

use clap::Parser;
use clap::error::ErrorKind;
use imgmap::{ImgMapError, ImgMapResult};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "imgmap",
    version,
    about = "Send an image to a metrics backend, one datapoint per pixel",
    after_help = "Configuration: IMGMAP_TOKEN (required), IMGMAP_INGEST_URL, IMGMAP_SENDER, \
                  IMGMAP_BATCH_SIZE, IMGMAP_TIMEOUT_SECS. Log level: RUST_LOG."
)]
pub struct Cli {
    /// Image file to send
    pub image: Option<PathBuf>,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Send the image at this path.
    Send(PathBuf),
    /// Print this text to stdout and exit successfully (`--help`, `--version`).
    Print(String),
}

/// Parses `args` (program name first).
///
/// Every parse failure other than help or version, including a missing path,
/// is an `Argument` error.
pub fn parse_args<I, T>(args: I) -> ImgMapResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Ok(Invocation::Print(err.render().to_string())),
                _ => Err(ImgMapError::Argument(err.render().to_string().trim().to_string())),
            };
        }
    };
    cli.image
        .map(Invocation::Send)
        .ok_or_else(|| ImgMapError::Argument("Missing file name.".to_string()))
}
