// THEORY:
// This file is the entry point for the `imgmap` library crate. It exposes the
// pieces needed to turn one image into one run of labeled metric samples:
// position encoders, the pixel grid, the sample emitter and the sink traits that
// a transport crate (such as `imgmap_signalfx`) implements.
//
// The top-level `pipeline` module ties them together for a single image file,
// and is what the command-line runner calls.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use error::{ImgMapError, ImgMapResult};
