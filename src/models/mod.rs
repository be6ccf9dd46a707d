//! Competition document models.
//!
//! Typed view of the WCIF document: competition, events and rounds, the
//! venue/room/activity schedule tree, and people with their assignments.
//!
//! # Domain Mappings
//!
//! | u-groupify | Scheduling | Printing |
//! |------------|-----------|----------|
//! | Room | Resource (stations = capacity) | - |
//! | Activity | Operation / time slot | - |
//! | Round | Task | Scorecard batch |
//! | Person | - | Scorecard owner |
//!
//! Every node that can be replaced independently is held behind an `Arc`,
//! so cloning a document is shallow and updates share untouched subtrees.

pub(crate) mod activity;
mod competition;
mod person;
mod room;
mod schedule;

pub use activity::Activity;
pub use competition::{Competition, Cutoff, Event, Round, RoundFormat, TimeLimit};
pub use person::{Assignment, AssignmentCode, Person};
pub use room::Room;
pub use schedule::{Schedule, Venue};
