//! Namespaced extension data attached to document nodes.
//!
//! WCIF lets tools attach custom metadata to the competition, rooms and
//! activities as a list of `{id, specUrl, data}` blocks. This module hides
//! that encoding: callers address a block by namespace (`"Room"`,
//! `"Activity"`, `"CompetitionConfig"`) and get back its `data`.
//!
//! Known namespaces have a typed schema ([`RoomConfig`], [`ActivityConfig`],
//! [`CompetitionConfig`]) via [`ExtensionSchema`]. Blocks from other tools
//! or unknown namespaces are kept opaquely and never rewritten.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{Activity, Competition, Room};
use crate::path;

/// Prefix of the `id` of every extension block written by this crate.
pub const EXTENSION_PREFIX: &str = "groupify";

const SPEC_URL_BASE: &str = "https://groupify.iyulab.com/wcif-extensions";

/// An extension block as it appears on the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Fully-qualified identifier, e.g. `groupify.Room`.
    pub id: String,
    /// URL of the JSON schema describing `data`.
    #[serde(default)]
    pub spec_url: String,
    /// The payload.
    pub data: Value,
}

impl Extension {
    fn build(namespace: &str, data: Value) -> Self {
        Self {
            id: extension_id(namespace),
            spec_url: format!("{SPEC_URL_BASE}/{namespace}.json"),
            data,
        }
    }
}

fn extension_id(namespace: &str) -> String {
    format!("{EXTENSION_PREFIX}.{namespace}")
}

/// A document node that carries extension blocks.
pub trait HasExtensions: Sized {
    /// Blocks currently attached.
    fn extensions(&self) -> &[Extension];

    /// The node with its blocks replaced by `extensions`.
    fn with_extensions(self, extensions: Vec<Extension>) -> Self;
}

macro_rules! impl_has_extensions {
    ($($node:ty),*) => {
        $(
            impl HasExtensions for $node {
                fn extensions(&self) -> &[Extension] {
                    &self.extensions
                }

                fn with_extensions(mut self, extensions: Vec<Extension>) -> Self {
                    self.extensions = extensions;
                    self
                }
            }
        )*
    };
}

impl_has_extensions!(Competition, Room, Activity);

/// Data stored for `namespace` on `node`, if any.
pub fn get_extension_data<'a, N: HasExtensions>(namespace: &str, node: &'a N) -> Option<&'a Value> {
    let id = extension_id(namespace);
    node.extensions()
        .iter()
        .find(|e| e.id == id)
        .map(|e| &e.data)
}

/// Returns `node` with the `namespace` block set to exactly `data`.
///
/// Other blocks keep their content and relative order; the rewritten block
/// moves to the end.
pub fn set_extension_data<N: HasExtensions>(namespace: &str, node: N, data: Value) -> N {
    let id = extension_id(namespace);
    let mut extensions: Vec<Extension> = node
        .extensions()
        .iter()
        .filter(|e| e.id != id)
        .cloned()
        .collect();
    extensions.push(Extension::build(namespace, data));
    node.with_extensions(extensions)
}

/// Returns `node` with `patch` shallow-merged into the `namespace` block.
///
/// The block is created on first write.
pub fn merge_extension_data<N: HasExtensions>(
    namespace: &str,
    node: N,
    patch: Map<String, Value>,
) -> Result<N> {
    let current = get_extension_data(namespace, &node)
        .cloned()
        .unwrap_or(Value::Null);
    let merged = path::merge_in(current, &[], patch)?;
    Ok(set_extension_data(namespace, node, merged))
}

/// A typed schema for one extension namespace.
pub trait ExtensionSchema: Serialize + DeserializeOwned {
    /// Namespace the schema is stored under.
    const NAMESPACE: &'static str;
}

/// Typed data stored on `node`, `Ok(None)` if never set.
pub fn get_extension<T: ExtensionSchema, N: HasExtensions>(node: &N) -> Result<Option<T>> {
    get_extension_data(T::NAMESPACE, node)
        .map(|data| {
            serde_json::from_value(data.clone()).map_err(|source| Error::Extension {
                namespace: T::NAMESPACE.to_string(),
                source,
            })
        })
        .transpose()
}

/// Returns `node` with the typed block set to `data` (full replace).
pub fn set_extension<T: ExtensionSchema, N: HasExtensions>(node: N, data: &T) -> Result<N> {
    let value = serde_json::to_value(data).map_err(|source| Error::Extension {
        namespace: T::NAMESPACE.to_string(),
        source,
    })?;
    Ok(set_extension_data(T::NAMESPACE, node, value))
}

/// Room metadata: number of physical timing stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Timing stations; `None` until configured.
    pub stations: Option<u32>,
}

impl ExtensionSchema for RoomConfig {
    const NAMESPACE: &'static str = "Room";
}

/// Allocation metadata of a configurable activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityConfig {
    /// Share (0..=1) of the round's competitors expected in this activity.
    pub capacity: f64,
    /// Suggested number of groups.
    pub groups: u32,
    /// Suggested number of scramblers per group.
    pub scramblers: u32,
    /// Suggested number of runners per group.
    pub runners: u32,
    /// Whether judges should be assigned.
    pub assign_judges: bool,
}

impl ExtensionSchema for ActivityConfig {
    const NAMESPACE: &'static str = "Activity";
}

/// Competition-wide settings read by the scorecard layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionConfig {
    /// Background image printed behind each scorecard's results table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scorecards_background_url: Option<String>,
    /// Print local names before latin ones.
    #[serde(default)]
    pub local_names_first: bool,
}

impl ExtensionSchema for CompetitionConfig {
    const NAMESPACE: &'static str = "CompetitionConfig";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn foreign_block() -> Extension {
        Extension {
            id: "othertool.Room".into(),
            spec_url: "https://example.org/room.json".into(),
            data: json!({ "color": "red" }),
        }
    }

    #[test]
    fn test_get_unset_is_none() {
        let room = Room::new(1, "Red");
        assert!(get_extension_data("Room", &room).is_none());
        assert_eq!(get_extension::<RoomConfig, _>(&room).unwrap(), None);
    }

    #[test]
    fn test_set_replaces_namespace_only() {
        let room = Room::new(1, "Red").with_extensions(vec![foreign_block()]);
        let room = set_extension_data("Room", room, json!({ "stations": 4 }));
        let room = set_extension_data("Room", room, json!({ "stations": 6 }));

        assert_eq!(room.extensions.len(), 2);
        assert_eq!(room.extensions[0], foreign_block());
        assert_eq!(get_extension_data("Room", &room), Some(&json!({ "stations": 6 })));
        assert_eq!(room.extensions[1].id, "groupify.Room");
        assert!(room.extensions[1].spec_url.ends_with("/Room.json"));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let room = Room::new(1, "Red");
        let room = set_extension_data("Room", room, json!({ "stations": 4 }));
        let room = set_extension_data("Notes", room, json!("near the door"));

        assert_eq!(get_extension_data("Room", &room), Some(&json!({ "stations": 4 })));
        assert_eq!(get_extension_data("Notes", &room), Some(&json!("near the door")));
    }

    #[test]
    fn test_merge_creates_then_merges() {
        let mut patch = Map::new();
        patch.insert("stations".into(), json!(null));
        let room = merge_extension_data("Room", Room::new(1, "Red"), patch).unwrap();
        assert_eq!(get_extension_data("Room", &room), Some(&json!({ "stations": null })));

        let mut patch = Map::new();
        patch.insert("label".into(), json!("A"));
        let room = merge_extension_data("Room", room, patch).unwrap();
        assert_eq!(
            get_extension_data("Room", &room),
            Some(&json!({ "stations": null, "label": "A" }))
        );
    }

    #[test]
    fn test_typed_roundtrip() {
        let config = ActivityConfig {
            capacity: 0.25,
            groups: 3,
            scramblers: 2,
            runners: 1,
            assign_judges: true,
        };
        let competition = Competition::new("C", "C");
        let activity = crate::models::Activity::new(
            1,
            "333-r1",
            crate::models::activity::fixtures::at(0),
            crate::models::activity::fixtures::at(60),
        );
        let activity = set_extension(activity, &config).unwrap();

        assert_eq!(
            get_extension_data("Activity", &activity).and_then(|d| d.get("assignJudges")),
            Some(&json!(true))
        );
        assert_eq!(get_extension::<ActivityConfig, _>(&activity).unwrap(), Some(config));
        assert_eq!(get_extension::<CompetitionConfig, _>(&competition).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let room = set_extension_data("Room", Room::new(1, "Red"), json!({ "stations": "many" }));
        let err = get_extension::<RoomConfig, _>(&room).unwrap_err();
        assert!(matches!(err, Error::Extension { ref namespace, .. } if namespace == "Room"));
    }

    #[test]
    fn test_competition_config_defaults() {
        let c = set_extension_data("CompetitionConfig", Competition::new("C", "C"), json!({}));
        assert_eq!(
            get_extension::<CompetitionConfig, _>(&c).unwrap(),
            Some(CompetitionConfig::default())
        );
    }
}
