//! Station-capacity allocation across a round's activities.
//!
//! # Algorithm
//!
//! For each round independently:
//! 1. Collect the round's configurable activities in document order.
//! 2. Weight each by `stations(room) × duration(activity)` (milliseconds).
//! 3. Scale the weights to sum to one; a round with no station-time at all
//!    splits evenly instead.
//! 4. Derive groups, scramblers and runners from the external
//!    [`StaffingFormulas`] and store the result as [`ActivityConfig`].
//!
//! All computed activities are applied to the document in one batch.
//! Re-running replaces earlier allocation metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::extension::{self, ActivityConfig, ExtensionSchema};
use crate::models::{Activity, Competition};
use crate::navigation::{
    all_activities, round_configurable_activities, room_stations, update_activities,
};

/// Suggested staffing numbers.
///
/// Implemented outside this crate; the allocation engine treats it as a
/// pure black box.
pub trait StaffingFormulas {
    /// Groups for `expected_competitors` sharing `stations` timing stations.
    fn suggested_group_count(&self, expected_competitors: u32, stations: u32) -> u32;

    /// Scramblers needed to keep `stations` stations busy.
    fn suggested_scrambler_count(&self, stations: u32) -> u32;

    /// Runners needed to serve `stations` stations.
    fn suggested_runner_count(&self, stations: u32) -> u32;
}

/// Which staff roles to plan for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocationOptions {
    /// Suggest scramblers (zero otherwise).
    pub assign_scramblers: bool,
    /// Suggest runners (zero otherwise).
    pub assign_runners: bool,
    /// Copied verbatim into every activity's config.
    pub assign_judges: bool,
}

impl AllocationOptions {
    /// Plans for every staff role.
    pub fn all() -> Self {
        Self {
            assign_scramblers: true,
            assign_runners: true,
            assign_judges: true,
        }
    }
}

/// Scales `weights` to sum to one, preserving proportions.
///
/// An all-zero input maps to the uniform distribution `1/n`; an empty input
/// maps to an empty output.
pub fn scale_to_one(weights: &[f64]) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        let share = 1.0 / weights.len() as f64;
        return vec![share; weights.len()];
    }
    weights.iter().map(|w| w / sum).collect()
}

/// Attaches allocation metadata to every configurable activity.
///
/// `expected_competitors_by_round` maps round id to the number of
/// competitors expected in that round.
///
/// # Errors
/// - [`Error::MissingExpectedCompetitors`] for a round that has configurable
///   activities but no expected-competitor entry.
/// - Malformed activity codes, malformed room metadata, or a document
///   without a venue (when anything needs updating).
pub fn populate_activities_config<F>(
    competition: &Competition,
    expected_competitors_by_round: &HashMap<String, usize>,
    options: AllocationOptions,
    formulas: &F,
) -> Result<Competition>
where
    F: StaffingFormulas + ?Sized,
{
    let mut configured: Vec<Activity> = Vec::new();

    for round in competition.rounds() {
        let activities = round_configurable_activities(competition, &round.id)?;
        if activities.is_empty() {
            debug!(round_id = %round.id, "round has no configurable activities");
            continue;
        }
        let expected = *expected_competitors_by_round.get(&round.id).ok_or_else(|| {
            Error::MissingExpectedCompetitors {
                round_id: round.id.clone(),
            }
        })?;

        let stations = activities
            .iter()
            .map(|(room, _)| room_stations(room))
            .collect::<Result<Vec<u32>>>()?;
        let weights: Vec<f64> = activities
            .iter()
            .zip(&stations)
            .map(|((_, activity), &s)| f64::from(s) * activity.duration().num_milliseconds() as f64)
            .collect();
        if weights.iter().all(|w| *w == 0.0) {
            warn!(
                round_id = %round.id,
                activities = activities.len(),
                "no station time in round, splitting capacity evenly"
            );
        }

        for (((_, activity), capacity), stations) in
            activities.iter().zip(scale_to_one(&weights)).zip(stations)
        {
            let round_competitors = (capacity * expected as f64).round() as u32;
            let config = ActivityConfig {
                capacity,
                groups: formulas.suggested_group_count(round_competitors, stations),
                scramblers: if options.assign_scramblers {
                    formulas.suggested_scrambler_count(stations)
                } else {
                    0
                },
                runners: if options.assign_runners {
                    formulas.suggested_runner_count(stations)
                } else {
                    0
                },
                assign_judges: options.assign_judges,
            };
            debug!(
                round_id = %round.id,
                activity_id = activity.id,
                capacity,
                groups = config.groups,
                "allocated activity"
            );
            configured.push(extension::set_extension((*activity).clone(), &config)?);
        }
    }

    info!(
        competition_id = %competition.id,
        activities = configured.len(),
        "populated activity configuration"
    );
    if configured.is_empty() {
        return Ok(competition.clone());
    }
    update_activities(competition, configured)
}

/// Whether any activity, at any nesting depth, already carries allocation
/// metadata.
pub fn any_activity_configured(competition: &Competition) -> bool {
    all_activities(competition)
        .into_iter()
        .any(|activity| extension::get_extension_data(ActivityConfig::NAMESPACE, activity).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::get_extension;
    use crate::models::activity::fixtures::at;
    use crate::models::{Room, Venue};
    use crate::navigation::fixtures::competition;
    use crate::navigation::{activity_by_id, set_room_stations};
    use proptest::prelude::*;

    /// Deterministic stand-in for the external formulas.
    struct FixedFormulas;

    impl StaffingFormulas for FixedFormulas {
        fn suggested_group_count(&self, expected_competitors: u32, stations: u32) -> u32 {
            if stations == 0 {
                1
            } else {
                expected_competitors.div_ceil(stations).max(1)
            }
        }

        fn suggested_scrambler_count(&self, stations: u32) -> u32 {
            stations / 4 + 1
        }

        fn suggested_runner_count(&self, stations: u32) -> u32 {
            stations / 8 + 1
        }
    }

    fn expected() -> HashMap<String, usize> {
        HashMap::from([("333-r1".to_string(), 30), ("333fm-r1".to_string(), 12)])
    }

    fn config_of(comp: &Competition, activity_id: u32) -> ActivityConfig {
        get_extension::<ActivityConfig, _>(activity_by_id(comp, activity_id).unwrap())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_scale_to_one() {
        assert_eq!(scale_to_one(&[1.0, 3.0]), vec![0.25, 0.75]);
        assert_eq!(scale_to_one(&[0.0, 0.0, 0.0, 0.0]), vec![0.25; 4]);
        assert!(scale_to_one(&[]).is_empty());
    }

    #[test]
    fn test_capacity_proportional_to_station_time() {
        // Red: 8 stations × 60 min, Blue: 4 stations × 30 min.
        let comp = set_room_stations(&competition(), 10, Some(8)).unwrap();
        let comp = set_room_stations(&comp, 20, Some(4)).unwrap();

        let result =
            populate_activities_config(&comp, &expected(), AllocationOptions::all(), &FixedFormulas)
                .unwrap();

        let red = config_of(&result, 1);
        let blue = config_of(&result, 2);
        assert!((red.capacity - 0.8).abs() < 1e-12);
        assert!((blue.capacity - 0.2).abs() < 1e-12);
        assert_eq!(red.groups, 3); // round(0.8 × 30) = 24 over 8 stations
        assert_eq!(blue.groups, 2); // round(0.2 × 30) = 6 over 4 stations
        assert_eq!(red.scramblers, 3);
        assert_eq!(red.runners, 2);
        assert!(red.assign_judges);
    }

    #[test]
    fn test_per_attempt_event_configures_first_attempt() {
        let comp = set_room_stations(&competition(), 10, Some(8)).unwrap();
        let result =
            populate_activities_config(&comp, &expected(), AllocationOptions::default(), &FixedFormulas)
                .unwrap();

        let fm = config_of(&result, 5);
        assert!((fm.capacity - 1.0).abs() < 1e-12);
        assert_eq!(fm.scramblers, 0);
        assert_eq!(fm.runners, 0);
        assert!(!fm.assign_judges);

        let second_attempt = activity_by_id(&result, 6).unwrap();
        assert_eq!(get_extension::<ActivityConfig, _>(second_attempt).unwrap(), None);
        let lunch = activity_by_id(&result, 3).unwrap();
        assert!(lunch.extensions.is_empty());
    }

    #[test]
    fn test_zero_station_time_splits_evenly() {
        let result = populate_activities_config(
            &competition(),
            &expected(),
            AllocationOptions::default(),
            &FixedFormulas,
        )
        .unwrap();

        assert!((config_of(&result, 1).capacity - 0.5).abs() < 1e-12);
        assert!((config_of(&result, 2).capacity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_expected_competitors() {
        let expected = HashMap::from([("333-r1".to_string(), 30)]);
        let err = populate_activities_config(
            &competition(),
            &expected,
            AllocationOptions::default(),
            &FixedFormulas,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingExpectedCompetitors { ref round_id } if round_id == "333fm-r1"));
    }

    #[test]
    fn test_any_activity_configured() {
        let comp = competition();
        assert!(!any_activity_configured(&comp));

        let result =
            populate_activities_config(&comp, &expected(), AllocationOptions::default(), &FixedFormulas)
                .unwrap();
        assert!(any_activity_configured(&result));
        assert!(!any_activity_configured(&Competition::new("C", "C")));
    }

    #[test]
    fn test_any_activity_configured_sees_children() {
        let config = ActivityConfig {
            capacity: 1.0,
            groups: 2,
            scramblers: 0,
            runners: 0,
            assign_judges: false,
        };
        let group = extension::set_extension(Activity::new(7, "333-r1-g1", at(0), at(30)), &config)
            .unwrap();
        let comp = Competition::new("C", "C").with_venue(
            Venue::new(1, "Hall").with_room(
                Room::new(1, "Main")
                    .with_activity(Activity::new(3, "333-r1", at(0), at(60)).with_child(group)),
            ),
        );
        assert!(any_activity_configured(&comp));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let comp = set_room_stations(&competition(), 10, Some(6)).unwrap();
        let once =
            populate_activities_config(&comp, &expected(), AllocationOptions::all(), &FixedFormulas)
                .unwrap();
        let twice =
            populate_activities_config(&once, &expected(), AllocationOptions::all(), &FixedFormulas)
                .unwrap();
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn prop_scale_to_one_sums_to_one(weights in prop::collection::vec(0.0f64..1e6, 1..20)) {
            let scaled = scale_to_one(&weights);
            prop_assert_eq!(scaled.len(), weights.len());
            let sum: f64 = scaled.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
            if weights.iter().all(|w| *w == 0.0) {
                for s in &scaled {
                    prop_assert!((s - 1.0 / weights.len() as f64).abs() < 1e-12);
                }
            }
        }

        #[test]
        fn prop_round_capacities_sum_to_one(red in 0u32..40, blue in 0u32..40, competitors in 0usize..500) {
            let comp = set_room_stations(&competition(), 10, Some(red)).unwrap();
            let comp = set_room_stations(&comp, 20, Some(blue)).unwrap();
            let expected = HashMap::from([
                ("333-r1".to_string(), competitors),
                ("333fm-r1".to_string(), competitors),
            ]);

            let result = populate_activities_config(&comp, &expected, AllocationOptions::all(), &FixedFormulas).unwrap();
            let sum = config_of(&result, 1).capacity + config_of(&result, 2).capacity;
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}
