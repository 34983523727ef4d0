// THEORY:
// Wire shapes for the SignalFx JSON datapoint API (`POST /v2/datapoint`). A
// request body groups datapoints by metric type; pixels are always gauges:
//
//   {"gauge": [{"metric": "pixel", "value": -16777216, "timestamp": 1700000000000,
//               "dimensions": {"image": "cat.png", "size": "4x3", "position": "07"}}]}

use imgmap::pipeline::LabeledSample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One gauge datapoint as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datapoint {
    pub metric: String,
    pub value: i64,
    pub timestamp: u64,
    pub dimensions: BTreeMap<String, String>,
}

impl From<LabeledSample> for Datapoint {
    fn from(sample: LabeledSample) -> Self {
        let dimensions = sample
            .labels
            .pairs()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self {
            metric: sample.metric.to_string(),
            value: sample.value,
            timestamp: sample.timestamp,
            dimensions,
        }
    }
}

/// The body of one ingest request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatapointUpload {
    pub gauge: Vec<Datapoint>,
}
