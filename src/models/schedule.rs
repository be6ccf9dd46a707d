//! Schedule and venue models.
//!
//! Only the first venue is authoritative for allocation and scorecards.
//! Further venues round-trip through serialization untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::Room;

/// The competition schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Venues; the first one is authoritative.
    #[serde(default)]
    pub venues: Vec<Arc<Venue>>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A venue holding rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue identifier.
    pub id: u32,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Rooms in display order.
    #[serde(default)]
    pub rooms: Vec<Arc<Room>>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Venue {
    /// Creates an empty venue.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rooms: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(Arc::new(room));
        self
    }
}
