//! Scheduling core for speedcubing competitions.
//!
//! Operates on WCIF competition documents: decodes activity codes, walks the
//! activity tree of the first venue, distributes expected competitors over a
//! round's rooms in proportion to station-time, and lays out numbered
//! scorecards for printing.
//!
//! # Modules
//!
//! - **`models`**: Document types: `Competition`, `Venue`, `Room`, `Activity`,
//!   `Person`, `Event`, `Round`
//! - **`path`**: Nested lookup and update of untyped JSON values
//! - **`extension`**: Namespaced metadata blocks attached to document nodes
//! - **`activity_code`**: Activity code grammar and human-readable names
//! - **`navigation`**: Queries and copy-on-write updates over the activity tree
//! - **`allocation`**: Station-capacity allocation per round
//! - **`roster`**, **`formatters`**, **`scorecard`**: Scorecard layout
//! - **`validation`**: Structural checks (duplicate IDs, malformed codes)
//!
//! # Document Model
//!
//! Documents are immutable values. Updates return a new document that shares
//! every untouched subtree with the old one through `Arc`.
//!
//! # References
//!
//! - WCA Competition Interchange Format, <https://github.com/thewca/wcif>

pub mod activity_code;
pub mod allocation;
pub mod error;
pub mod extension;
pub mod formatters;
pub mod models;
pub mod navigation;
pub mod path;
pub mod roster;
pub mod scorecard;
pub mod validation;

pub use error::{Error, Result};
