// src/predict/mod.rs

pub mod http;

use crate::dataset::SelectedFile;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

pub use http::HttpPredictionClient;

/// Multipart part names the prediction service expects.
pub const TODAY_PART: &str = "today_file";
pub const TOMORROW_PART: &str = "tomorrow_file";

/// One forecast record returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub predicted_mean_per_hour: f64,
    pub predicted_day_total: f64,
}

/// Successful response body: `{"rows": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub rows: Vec<PredictionRow>,
}

impl PredictionSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The two accepted uploads, sent verbatim.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub today: SelectedFile,
    pub tomorrow: SelectedFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Non-success status; `body` is the raw response text.
    #[error("server error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Boundary to the remote prediction service.
pub trait PredictionClient: Send + Sync {
    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionSet, TransportError>> + Send;
}

/// Client for sessions that only inspect uploads; every call fails without
/// touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl PredictionClient for Offline {
    async fn predict(&self, _request: &PredictionRequest) -> Result<PredictionSet, TransportError> {
        Err(TransportError::Network(
            "no prediction service configured".to_string(),
        ))
    }
}
