// THEORY:
// The `SampleEmitter` walks a `PixelGrid` and turns every pixel into a
// `LabeledSample`. It is an orchestrator, not a store: each sample is built and
// handed to the session before the next one exists, so memory use does not grow
// with the image.
//
// Key rules:
// 1.  **Scan order**: rows top to bottom, columns left to right. The linear index
//     is `row * width + column` and the value is read at (column, row).
// 2.  **Run-level labels**: `image` and `size` are built once and shared.
// 3.  **Session scope**: `emit_run` opens the session, scans and always closes
//     it, whether the scan finished or a submit failed. A failed submit ends the
//     scan; whatever was already handed over stays delivered.

use crate::core_modules::pixel_grid::pixel_grid::{PackedPixel, PixelGrid};
use crate::core_modules::position::position::PositionEncoder;
use crate::core_modules::sample::{LabeledSample, PIXEL_METRIC, SampleLabels, Timestamp};
use crate::core_modules::sink::{MetricSink, Session};
use crate::error::{ImgMapError, ImgMapResult};
use log::{debug, warn};
use std::sync::Arc;

/// Builds and streams the samples of one run over one grid.
#[derive(Debug, Clone)]
pub struct SampleEmitter<'g, E> {
    /// The grid being scanned; the `size` label is taken from it.
    grid: &'g PixelGrid,
    /// Maps scan indices to position labels.
    encoder: E,
    /// The `image` label value.
    image: Arc<str>,
    /// The `size` label value, `"<width>x<height>"`.
    size: Arc<str>,
    /// The capture instant shared by every sample.
    timestamp: Timestamp,
}

impl<'g, E: PositionEncoder> SampleEmitter<'g, E> {
    /// Prepares the run-level labels for `grid`. The image name must not be empty.
    pub fn new(encoder: E, image_name: &str, grid: &'g PixelGrid, timestamp: Timestamp) -> ImgMapResult<Self> {
        if image_name.is_empty() {
            return Err(ImgMapError::Argument("Image name must not be empty.".to_string()));
        }
        Ok(Self {
            grid,
            encoder,
            image: Arc::from(image_name),
            size: Arc::from(format!("{}x{}", grid.width(), grid.height())),
            timestamp,
        })
    }

    /// The sample for the pixel at scan `index` holding `value`.
    pub fn sample_for(&self, index: u64, value: PackedPixel) -> LabeledSample {
        LabeledSample {
            metric: PIXEL_METRIC,
            value: i64::from(value),
            timestamp: self.timestamp,
            labels: SampleLabels {
                image: Arc::clone(&self.image),
                size: Arc::clone(&self.size),
                position: self.encoder.encode(index),
            },
        }
    }

    /// Submits every pixel of the grid to an already open session, in scan order.
    /// Returns how many samples were accepted.
    pub async fn emit<S: Session>(&self, session: &mut S) -> ImgMapResult<u64> {
        let grid = self.grid;
        let width = u64::from(grid.width());
        let mut emitted = 0u64;
        for row in 0..grid.height() {
            for column in 0..grid.width() {
                let index = u64::from(row) * width + u64::from(column);
                session.submit(self.sample_for(index, grid.pixel(column, row))).await?;
                emitted += 1;
            }
        }
        Ok(emitted)
    }

    /// Opens a session on `sink`, emits the grid and closes the session on every
    /// path. A scan error wins over a close error.
    pub async fn emit_run<M: MetricSink>(&self, sink: &M) -> ImgMapResult<u64> {
        let mut session = sink.create_session().await?;
        let scanned = self.emit(&mut session).await;
        let closed = session.close().await;

        match (scanned, closed) {
            (Ok(emitted), Ok(())) => {
                debug!("Session closed after {emitted} samples");
                Ok(emitted)
            }
            (Ok(_), Err(err)) => Err(err),
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    warn!("Closing the session after a failed scan also failed: {close_err}");
                }
                Err(err)
            }
        }
    }
}
