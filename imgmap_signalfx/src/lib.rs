// THEORY:
// `imgmap_signalfx` is the delivery side of imgmap. It implements the core
// `MetricSink` against the SignalFx JSON ingest API and carries the command-line
// runner that wires a file path, the environment configuration and the sink into
// one `imgmap::pipeline::run_image` call.

pub mod cli;
pub mod client;
pub mod config;
pub mod protocol;

pub use client::{SignalFxSession, SignalFxSink};
pub use config::IngestConfig;
