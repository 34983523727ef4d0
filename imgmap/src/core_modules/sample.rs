// THEORY:
// A `LabeledSample` is one pixel expressed as a metric datapoint: the constant
// metric name "pixel", the packed pixel value, the capture time of the run and
// three labels. `image` and `size` are the same for every sample of a run, so
// they are shared `Arc<str>` values rather than copied strings. Only `position`
// is unique per sample.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

pub const PIXEL_METRIC: &str = "pixel";
pub const IMAGE_LABEL: &str = "image";
pub const SIZE_LABEL: &str = "size";
pub const POSITION_LABEL: &str = "position";

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// The capture instant for a new run.
pub fn capture_timestamp() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as Timestamp)
}

/// The label set carried by every pixel sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLabels {
    /// The source file name, shared by the whole run.
    pub image: Arc<str>,
    /// The image dimensions as `"<width>x<height>"`, shared by the whole run.
    pub size: Arc<str>,
    /// The encoded position of this pixel in the scan.
    pub position: String,
}

impl SampleLabels {
    /// The labels as `(key, value)` pairs, in a fixed order.
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (IMAGE_LABEL, &*self.image),
            (SIZE_LABEL, &*self.size),
            (POSITION_LABEL, self.position.as_str()),
        ]
    }
}

/// One pixel as a gauge datapoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSample {
    pub metric: &'static str,
    pub value: i64,
    pub timestamp: Timestamp,
    pub labels: SampleLabels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_pairs_use_fixed_keys() {
        let labels = SampleLabels {
            image: Arc::from("cat.png"),
            size: Arc::from("4x3"),
            position: "07".to_string(),
        };
        assert_eq!(
            labels.pairs(),
            [("image", "cat.png"), ("size", "4x3"), ("position", "07")]
        );
    }

    #[test]
    fn capture_timestamp_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(capture_timestamp() > 1_577_836_800_000);
    }
}
