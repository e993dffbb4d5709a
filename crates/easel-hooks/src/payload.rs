//! Payload shared by the callbacks of one pipeline call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::hook::HookPoint;

/// Shared, mutable payload passed down the chain.
///
/// Each callback sees the changes made by the callbacks before it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookPayload {
    /// Unique identifier for this pipeline call.
    pub invocation_id: Uuid,
    /// Hook point being run.
    pub point: HookPoint,
    /// When the call started.
    pub timestamp: DateTime<Utc>,
    /// The serialized document the hook is about.
    pub document: Value,
    /// Extra values exchanged between callbacks.
    #[serde(default)]
    pub data: HashMap<String, Value>,
}

impl HookPayload {
    /// Create a payload for a hook point.
    #[must_use]
    pub fn new(point: HookPoint, document: Value) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            point,
            timestamp: Utc::now(),
            document,
            data: HashMap::new(),
        }
    }

    /// Add data to the payload.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Insert or replace a data value.
    pub fn insert_data(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a data value.
    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get a data value as a specific type.
    #[must_use]
    pub fn get_data_as<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
