//! Competitor rosters per round.
//!
//! The scorecard layout needs, for each round, the ordered list of people
//! competing in it. Where that list comes from (registrations, results of
//! the previous round, manual edits) is the caller's business; [`Roster`]
//! is the seam. [`AssignedRoster`] derives it from existing group
//! assignments.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::{AssignmentCode, Competition, Person};
use crate::navigation::round_group_activities;

/// Source of the ordered competitor list of a round.
pub trait Roster {
    /// Competitors of `round_id`, in scorecard order.
    fn competitors_for_round<'a>(
        &self,
        competition: &'a Competition,
        round_id: &str,
    ) -> Result<Vec<&'a Person>>;
}

/// Whether `person` holds `code` for `activity_id`.
pub fn has_assignment(person: &Person, activity_id: u32, code: &AssignmentCode) -> bool {
    person.has_assignment(activity_id, code)
}

/// Roster of everyone assigned to compete in one of the round's groups.
///
/// Ordered by name, then registrant id, so that the result is stable for a
/// given document.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignedRoster;

impl Roster for AssignedRoster {
    fn competitors_for_round<'a>(
        &self,
        competition: &'a Competition,
        round_id: &str,
    ) -> Result<Vec<&'a Person>> {
        let group_ids: HashSet<u32> = round_group_activities(competition, round_id)?
            .into_iter()
            .map(|(_, activity)| activity.id)
            .collect();

        let mut competitors: Vec<&Person> = competition
            .persons
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| {
                p.assignments.iter().any(|a| {
                    a.assignment_code == AssignmentCode::Competitor
                        && group_ids.contains(&a.activity_id)
                })
            })
            .collect();
        competitors.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.registrant_id.cmp(&b.registrant_id))
        });
        Ok(competitors)
    }
}
