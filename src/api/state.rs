use chrono::{DateTime, Utc};

use crate::analytics::CardioAnalytics;
use crate::prediction::InferencePipeline;

/// Shared application state for API handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded artifacts; the router cannot be built without them
    pub pipeline: InferencePipeline,

    /// Preprocessed dataset behind the `/cardio` endpoints
    pub analytics: CardioAnalytics,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: InferencePipeline, analytics: CardioAnalytics) -> Self {
        Self {
            pipeline,
            analytics,
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
