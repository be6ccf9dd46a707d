//! Room model.
//!
//! Rooms are the resources activities run in. The capacity that matters for
//! allocation is the number of physical timing stations, stored in the
//! `Room` extension rather than on the room itself.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::Activity;
use crate::extension::Extension;

/// A room holding top-level activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: u32,
    /// Human-readable name.
    pub name: String,
    /// Top-level activities in schedule order.
    #[serde(default)]
    pub activities: Vec<Arc<Activity>>,
    /// Namespaced metadata blocks.
    #[serde(default)]
    pub extensions: Vec<Extension>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    /// Creates an empty room.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            activities: Vec::new(),
            extensions: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Adds a top-level activity.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(Arc::new(activity));
        self
    }

    /// Whether `activity_id` is one of this room's activities at any depth.
    pub fn contains_activity(&self, activity_id: u32) -> bool {
        self.activities
            .iter()
            .any(|a| a.find(activity_id).is_some())
    }
}
