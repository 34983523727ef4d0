// THEORY:
// The `pipeline` module is the top-level API of the crate: one image file in,
// one run of samples out. It fixes the order of the steps so that nothing
// touches the network before the input is known to be good:
// 1.  Check the image path exists.
// 2.  Decode it into a `PixelGrid`.
// 3.  Build the sink (reading its configuration) through the caller's factory.
// 4.  Take one timestamp and stream every pixel into a single session.
//
// Runs use the fixed-width decimal position labels, which sort in scan order.

use crate::core_modules::emitter::SampleEmitter;
use crate::core_modules::pixel_grid::pixel_grid;
use crate::core_modules::position::position::DecimalEncoder;
use crate::core_modules::sample::{Timestamp, capture_timestamp};
use crate::core_modules::sink::MetricSink;
use crate::error::{ImgMapError, ImgMapResult};
use log::info;
use std::path::{Path, PathBuf};

// Re-export the pieces a caller needs to drive or observe a run.
pub use crate::core_modules::pixel_grid::pixel_grid::PixelGrid;
pub use crate::core_modules::sample::LabeledSample;
pub use crate::core_modules::sink::Session;

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The `image` label used for every sample.
    pub image: String,
    pub width: u32,
    pub height: u32,
    /// Number of samples handed to the sink.
    pub samples: u64,
    /// The shared capture instant.
    pub timestamp: Timestamp,
}

/// Returns `path` if it exists, or a `FileNotFound` error naming its absolute form.
pub fn locate_image(path: &Path) -> ImgMapResult<&Path> {
    if path.exists() {
        return Ok(path);
    }
    let shown = std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path));
    Err(ImgMapError::FileNotFound(shown))
}

/// The `image` label for a file: its final path component.
pub fn image_name(path: &Path) -> ImgMapResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ImgMapError::Argument(format!("{} does not name a file.", path.display())))
}

/// Sends the image at `path` as one sample per pixel. `connect` is only called
/// once the image has been decoded.
pub async fn run_image<M, F>(path: &Path, connect: F) -> ImgMapResult<RunReport>
where
    M: MetricSink,
    F: FnOnce() -> ImgMapResult<M>,
{
    let path = locate_image(path)?;
    let name = image_name(path)?;
    let grid = pixel_grid::decode(path)?;
    let sink = connect()?;

    let timestamp = capture_timestamp();
    let emitter = SampleEmitter::new(DecimalEncoder::for_total(grid.len()), &name, &grid, timestamp)?;
    info!(
        "Sending {} ({}x{}, {} datapoints) at {}",
        name,
        grid.width(),
        grid.height(),
        grid.len(),
        timestamp
    );
    let samples = emitter.emit_run(&sink).await?;

    Ok(RunReport {
        image: name,
        width: grid.width(),
        height: grid.height(),
        samples,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_grid::pixel_grid::pack_argb;
    use crate::core_modules::sink::testing::RecordingSink;
    use image::{Rgba, RgbaImage};

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("imgmap-pipeline-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn missing_file_never_connects() {
        let mut connected = false;
        let err = run_image(Path::new("/definitely/not/here.png"), || {
            connected = true;
            Ok(RecordingSink::default())
        })
        .await
        .expect_err("missing file");

        assert!(matches!(err, ImgMapError::FileNotFound(_)));
        assert!(!connected);
    }

    #[tokio::test]
    async fn undecodable_file_never_connects() {
        let path = scratch_file("broken.png");
        std::fs::write(&path, b"\x89PNG but not really").expect("Error Saving File.");
        let mut connected = false;

        let err = run_image(&path, || {
            connected = true;
            Ok(RecordingSink::default())
        })
        .await
        .expect_err("corrupt file");
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ImgMapError::Decode { .. }));
        assert!(!connected);
    }

    #[tokio::test]
    async fn configuration_error_stops_the_run() {
        let path = scratch_file("config.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
            .save(&path)
            .expect("Error Saving File.");

        let err = run_image::<RecordingSink, _>(&path, || Err(ImgMapError::Configuration("no token".into())))
            .await
            .expect_err("configuration error");
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ImgMapError::Configuration(_)));
    }

    #[tokio::test]
    async fn sends_every_pixel_of_a_file() {
        let path = scratch_file("tiny.png");
        let image = RgbaImage::from_fn(2, 2, |x, y| Rgba([10 * (1 + x + 2 * y) as u8, 0, 0, 255]));
        image.save(&path).expect("Error Saving File.");
        let sink = RecordingSink::default();

        let report = run_image(&path, || Ok(sink.clone())).await.expect("run");
        std::fs::remove_file(&path).ok();

        let expected_name = path.file_name().expect("file name").to_string_lossy().into_owned();
        assert_eq!(report.image, expected_name);
        assert_eq!((report.width, report.height, report.samples), (2, 2, 4));

        let recording = sink.recording.borrow();
        let values: Vec<i64> = recording.samples.iter().map(|s| s.value).collect();
        let expected: Vec<i64> = [10u8, 20, 30, 40]
            .iter()
            .map(|&red| i64::from(pack_argb([red, 0, 0, 255])))
            .collect();
        assert_eq!(values, expected);
        assert!(recording.samples.iter().all(|s| s.timestamp == report.timestamp));
        assert!(recording.samples.iter().all(|s| &*s.labels.image == expected_name));
    }

    #[test]
    fn image_name_is_the_file_name() {
        assert_eq!(image_name(Path::new("/data/pics/cat.png")).expect("name"), "cat.png");
        assert!(image_name(Path::new("/")).is_err());
    }
}
