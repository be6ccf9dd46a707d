//! Activity model.
//!
//! An activity is the smallest schedulable unit of a competition: a round,
//! a group within a round, or a single attempt. Activities nest arbitrarily
//! deep through `child_activities`; identifiers are unique across the whole
//! forest of a document.
//!
//! # Time Model
//! Start and end are instants. The activity occupies the half-open interval
//! `[start_time, end_time)`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::extension::Extension;

/// A scheduled activity.
///
/// Children are `Arc`-shared so that replacing one activity leaves every
/// other subtree of the document pointer-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique activity identifier (unique across all nesting levels).
    pub id: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Compact activity code, e.g. `333-r1-g2`.
    pub activity_code: String,
    /// Start instant (inclusive).
    pub start_time: DateTime<Utc>,
    /// End instant (exclusive).
    pub end_time: DateTime<Utc>,
    /// Nested activities (groups under rounds, attempts under groups).
    #[serde(default)]
    pub child_activities: Vec<Arc<Activity>>,
    /// Namespaced metadata blocks.
    #[serde(default)]
    pub extensions: Vec<Extension>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    /// Creates a new activity spanning `[start_time, end_time)`.
    pub fn new(
        id: u32,
        activity_code: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: String::new(),
            activity_code: activity_code.into(),
            start_time,
            end_time,
            child_activities: Vec::new(),
            extensions: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a child activity.
    pub fn with_child(mut self, child: Activity) -> Self {
        self.child_activities.push(Arc::new(child));
        self
    }

    /// Length of the activity.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Whether the two activities' `[start, end)` intervals intersect.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Depth-first search of this activity and its descendants.
    pub fn find(&self, activity_id: u32) -> Option<&Activity> {
        if self.id == activity_id {
            return Some(self);
        }
        self.child_activities
            .iter()
            .find_map(|child| child.find(activity_id))
    }

    /// Visits this activity and every descendant in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Activity)) {
        visit(self);
        for child in &self.child_activities {
            child.walk(visit);
        }
    }
}
