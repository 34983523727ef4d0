// THEORY:
// The sink is the delivery side of a run. It is described by two traits so the
// core never depends on a transport:
// 1.  `MetricSink` knows how to reach an endpoint and opens one `Session` per run.
// 2.  `Session` accepts samples one at a time and owns batching, auth and
//     flushing. `close` consumes the session, so a closed session cannot be used
//     again.
//
// Failures are reported as `ImgMapError::Transmission` and are never retried
// here; the caller decides that the run is over.

use crate::core_modules::sample::LabeledSample;
use crate::error::ImgMapResult;
use std::future::Future;

/// An open delivery session for one run.
pub trait Session {
    /// Hands one sample to the session. The session may buffer it.
    fn submit(&mut self, sample: LabeledSample) -> impl Future<Output = ImgMapResult<()>>;

    /// Flushes anything still buffered and releases the session.
    fn close(self) -> impl Future<Output = ImgMapResult<()>>;
}

/// A configured destination that can open sessions.
pub trait MetricSink {
    type Session: Session;

    fn create_session(&self) -> impl Future<Output = ImgMapResult<Self::Session>>;
}
