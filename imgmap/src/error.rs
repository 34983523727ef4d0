// THEORY:
// Every failure a run can hit is terminal. Instead of exiting from wherever the
// problem is noticed, each layer returns an `ImgMapError` and lets it travel with
// `?` up to the binary, which reports it once and picks the exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an imgmap run.
#[derive(Error, Debug)]
pub enum ImgMapError {
    /// The command line did not name exactly one image file.
    #[error("{0}")]
    Argument(String),
    /// The image path does not exist.
    #[error("File {} does not exist.", .0.display())]
    FileNotFound(PathBuf),
    /// The image could not be read or decoded.
    #[error("Failed to read image file {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The sink rejected a batch or could not reach the endpoint.
    #[error("Error sending datapoints: {0}")]
    Transmission(Box<dyn std::error::Error + Send + Sync>),
    /// The ingest endpoint configuration is unusable.
    #[error("Bad ingest configuration: {0}")]
    Configuration(String),
}

/// Result type for imgmap operations
pub type ImgMapResult<T> = Result<T, ImgMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let missing = ImgMapError::FileNotFound(PathBuf::from("/tmp/nope.png"));
        assert_eq!(missing.to_string(), "File /tmp/nope.png does not exist.");

        let rejected = ImgMapError::Transmission("ingest answered 401".into());
        assert_eq!(rejected.to_string(), "Error sending datapoints: ingest answered 401");
    }
}
