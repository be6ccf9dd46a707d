//! Activity tree navigation and typed document updates.
//!
//! Reads walk the first venue's rooms and the full child-activity forest
//! below them. Updates return a new [`Competition`]: every node on the path
//! to a change is rebuilt, every other subtree stays `Arc`-shared with the
//! input document.
//!
//! Only the first venue is considered. Reads on a document without venues
//! see no activities; updates on one fail with
//! [`Error::NoVenue`](crate::Error::NoVenue).

use chrono::Duration;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::activity_code::{parse_activity_code, ActivityCode};
use crate::error::Result;
use crate::extension::{self, ExtensionSchema, RoomConfig};
use crate::models::{Activity, Competition, Room};
use crate::path::is_present_deep;

/// Length of an activity.
pub fn activity_duration(activity: &Activity) -> Duration {
    activity.duration()
}

/// Whether the `[start, end)` intervals of two activities intersect.
pub fn activities_overlap(first: &Activity, second: &Activity) -> bool {
    first.overlaps(second)
}

fn rooms(competition: &Competition) -> &[Arc<Room>] {
    competition
        .first_venue()
        .map_or(&[], |venue| venue.rooms.as_slice())
}

/// Every activity in the first venue, each room's trees in pre-order.
pub fn all_activities(competition: &Competition) -> Vec<&Activity> {
    let mut activities = Vec::new();
    for room in rooms(competition) {
        for activity in &room.activities {
            activity.walk(&mut |a| activities.push(a));
        }
    }
    activities
}

/// Finds an activity at any nesting depth.
pub fn activity_by_id(competition: &Competition, activity_id: u32) -> Option<&Activity> {
    rooms(competition)
        .iter()
        .flat_map(|room| room.activities.iter())
        .find_map(|activity| activity.find(activity_id))
}

/// Largest activity identifier in use, `None` when there are no activities.
pub fn max_activity_id(competition: &Competition) -> Option<u32> {
    all_activities(competition).iter().map(|a| a.id).max()
}

/// The room whose activity tree contains `activity_id`.
pub fn room_for_activity(competition: &Competition, activity_id: u32) -> Option<&Room> {
    rooms(competition)
        .iter()
        .find(|room| room.contains_activity(activity_id))
        .map(|room| room.as_ref())
}

/// Top-level activities of a round, in document order, with their rooms.
///
/// # Errors
/// Fails on a malformed round identifier or activity code.
pub fn round_activities<'a>(
    competition: &'a Competition,
    round_id: &str,
) -> Result<Vec<(&'a Room, &'a Activity)>> {
    let round = parse_activity_code(round_id)?;
    let mut found = Vec::new();
    for room in rooms(competition) {
        for activity in &room.activities {
            if parse_activity_code(&activity.activity_code)?.is_in_round(&round) {
                found.push((room.as_ref(), activity.as_ref()));
            }
        }
    }
    Ok(found)
}

/// Configurable activities of a round, in document order, with their rooms.
pub fn round_configurable_activities<'a>(
    competition: &'a Competition,
    round_id: &str,
) -> Result<Vec<(&'a Room, &'a Activity)>> {
    let mut found = Vec::new();
    for (room, activity) in round_activities(competition, round_id)? {
        if parse_activity_code(&activity.activity_code)?.is_configurable() {
            found.push((room, activity));
        }
    }
    Ok(found)
}

/// Group activities of a round with their parsed codes, in document order.
///
/// Groups are the children carrying a group number one level below the
/// round's configurable activities. For per-attempt events those children
/// also carry the attempt number of their parent.
pub fn round_group_activities<'a>(
    competition: &'a Competition,
    round_id: &str,
) -> Result<Vec<(ActivityCode, &'a Activity)>> {
    let mut groups = Vec::new();
    for (_, parent) in round_configurable_activities(competition, round_id)? {
        for child in &parent.child_activities {
            let code = parse_activity_code(&child.activity_code)?;
            if code.group_number.is_some() {
                groups.push((code, child.as_ref()));
            }
        }
    }
    Ok(groups)
}

/// Stations configured for a room; unconfigured rooms count as zero.
pub fn room_stations(room: &Room) -> Result<u32> {
    Ok(extension::get_extension::<RoomConfig, _>(room)?
        .and_then(|config| config.stations)
        .unwrap_or(0))
}

/// Whether every room of the first venue has complete `Room` metadata.
pub fn all_rooms_configured(competition: &Competition) -> bool {
    rooms(competition).iter().all(|room| {
        extension::get_extension_data(RoomConfig::NAMESPACE, room.as_ref())
            .is_some_and(is_present_deep)
    })
}

/// Rebuilds the rooms for which `rewrite` returns a replacement.
fn rewrite_rooms<F>(competition: &Competition, mut rewrite: F) -> Result<Competition>
where
    F: FnMut(&Room) -> Result<Option<Room>>,
{
    let mut replacements = Vec::new();
    for (index, room) in competition.first_venue()?.rooms.iter().enumerate() {
        if let Some(new_room) = rewrite(room.as_ref())? {
            replacements.push((index, new_room));
        }
    }

    let mut updated = competition.clone();
    if replacements.is_empty() {
        return Ok(updated);
    }

    // first_venue succeeded, so venue 0 exists.
    let venue = Arc::make_mut(&mut updated.schedule.venues[0]);
    for (index, new_room) in replacements {
        venue.rooms[index] = Arc::new(new_room);
    }
    Ok(updated)
}

/// Replaces the top-level activity with `updated.id` in the first venue.
///
/// Child activities are not targeted. An unknown id leaves the document
/// content unchanged.
pub fn update_activity(competition: &Competition, updated: Activity) -> Result<Competition> {
    update_activities(competition, vec![updated])
}

/// Replaces many top-level activities in one pass.
///
/// Equivalent to applying [`update_activity`] for each element, independent
/// of order; later duplicates of an id win.
pub fn update_activities(competition: &Competition, updated: Vec<Activity>) -> Result<Competition> {
    let by_id: HashMap<u32, Arc<Activity>> = updated
        .into_iter()
        .map(|activity| (activity.id, Arc::new(activity)))
        .collect();

    rewrite_rooms(competition, |room| {
        if !room.activities.iter().any(|a| by_id.contains_key(&a.id)) {
            return Ok(None);
        }
        let mut new_room = room.clone();
        for activity in &mut new_room.activities {
            if let Some(replacement) = by_id.get(&activity.id) {
                *activity = Arc::clone(replacement);
            }
        }
        Ok(Some(new_room))
    })
}

/// Sets the typed extension block of one room.
pub fn with_room_extension<T: ExtensionSchema>(
    competition: &Competition,
    room_id: u32,
    data: &T,
) -> Result<Competition> {
    rewrite_rooms(competition, |room| {
        if room.id != room_id {
            return Ok(None);
        }
        extension::set_extension(room.clone(), data).map(Some)
    })
}

/// Sets the typed extension block of one top-level activity.
pub fn with_activity_extension<T: ExtensionSchema>(
    competition: &Competition,
    activity_id: u32,
    data: &T,
) -> Result<Competition> {
    let Some(activity) = rooms(competition)
        .iter()
        .flat_map(|room| room.activities.iter())
        .find(|a| a.id == activity_id)
    else {
        return Ok(competition.clone());
    };
    let activity = extension::set_extension(activity.as_ref().clone(), data)?;
    update_activity(competition, activity)
}

/// Sets a room's station count, keeping any other `Room` metadata.
pub fn set_room_stations(
    competition: &Competition,
    room_id: u32,
    stations: Option<u32>,
) -> Result<Competition> {
    rewrite_rooms(competition, |room| {
        if room.id != room_id {
            return Ok(None);
        }
        let mut patch = Map::new();
        patch.insert("stations".to_string(), stations.map_or(Value::Null, Value::from));
        extension::merge_extension_data(RoomConfig::NAMESPACE, room.clone(), patch).map(Some)
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::competition;
    use super::*;
    use crate::error::Error;
    use crate::extension::{get_extension, ActivityConfig};
    use crate::models::activity::fixtures::at;
    use crate::models::{Event, Venue};

    #[test]
    fn test_duration_and_overlap() {
        let comp = competition();
        let red = activity_by_id(&comp, 1).unwrap();
        let blue = activity_by_id(&comp, 2).unwrap();
        let lunch = activity_by_id(&comp, 3).unwrap();

        assert_eq!(activity_duration(red), Duration::minutes(60));
        assert!(activities_overlap(red, blue));
        assert!(!activities_overlap(red, lunch));
    }

    #[test]
    fn test_activity_by_id_searches_children() {
        let comp = competition();
        assert_eq!(activity_by_id(&comp, 15).unwrap().activity_code, "333fm-r1-g1-a1");
        assert_eq!(activity_by_id(&comp, 21).unwrap().activity_code, "333-r1-g2");
        assert!(activity_by_id(&comp, 99).is_none());
    }

    #[test]
    fn test_max_activity_id_includes_children() {
        let comp = Competition::new("C", "C").with_venue(
            Venue::new(1, "V").with_room(
                Room::new(1, "R")
                    .with_activity(
                        Activity::new(3, "333-r1", at(0), at(60))
                            .with_child(Activity::new(7, "333-r1-g1", at(0), at(60))),
                    )
                    .with_activity(Activity::new(5, "222-r1", at(60), at(90))),
            ),
        );
        assert_eq!(max_activity_id(&comp), Some(7));
        assert_eq!(max_activity_id(&competition()), Some(21));
    }

    #[test]
    fn test_max_activity_id_empty() {
        let comp = Competition::new("C", "C").with_venue(Venue::new(1, "V"));
        assert_eq!(max_activity_id(&comp), None);
        assert_eq!(max_activity_id(&Competition::new("C", "C")), None);
    }

    #[test]
    fn test_room_for_activity() {
        let comp = competition();
        assert_eq!(room_for_activity(&comp, 21).map(|r| r.name.as_str()), Some("Blue"));
        assert_eq!(room_for_activity(&comp, 15).map(|r| r.name.as_str()), Some("Red"));
        assert!(room_for_activity(&comp, 99).is_none());
    }

    #[test]
    fn test_round_activities() {
        let comp = competition();
        let ids: Vec<u32> = round_activities(&comp, "333-r1")
            .unwrap()
            .iter()
            .map(|(_, a)| a.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let ids: Vec<u32> = round_configurable_activities(&comp, "333fm-r1")
            .unwrap()
            .iter()
            .map(|(_, a)| a.id)
            .collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn test_round_group_activities() {
        let comp = competition();
        let groups: Vec<u32> = round_group_activities(&comp, "333-r1")
            .unwrap()
            .iter()
            .map(|(_, a)| a.id)
            .collect();
        assert_eq!(groups, vec![11, 12, 21]);

        let groups = round_group_activities(&comp, "333fm-r1").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0.group_number, Some(1));
    }

    #[test]
    fn test_update_activity_shares_untouched_nodes() {
        let comp = competition();
        let mut changed = activity_by_id(&comp, 5).unwrap().clone();
        changed.name = "Fewest Moves".into();

        let updated = update_activity(&comp, changed).unwrap();

        assert_eq!(activity_by_id(&updated, 5).unwrap().name, "Fewest Moves");
        assert_eq!(activity_by_id(&comp, 5).unwrap().name, "");

        let old_venue = &comp.schedule.venues[0];
        let new_venue = &updated.schedule.venues[0];
        assert!(!Arc::ptr_eq(&old_venue.rooms[0], &new_venue.rooms[0]));
        assert!(Arc::ptr_eq(&old_venue.rooms[1], &new_venue.rooms[1]));
        for i in [0, 1, 3] {
            assert!(Arc::ptr_eq(
                &old_venue.rooms[0].activities[i],
                &new_venue.rooms[0].activities[i]
            ));
        }
        assert!(Arc::ptr_eq(&comp.events[0], &updated.events[0]));
    }

    #[test]
    fn test_update_activity_ignores_children() {
        let comp = competition();
        let child = activity_by_id(&comp, 11).unwrap().clone().with_name("renamed");
        let updated = update_activity(&comp, child).unwrap();

        assert_eq!(updated, comp);
        assert!(Arc::ptr_eq(&comp.schedule.venues[0], &updated.schedule.venues[0]));
    }

    #[test]
    fn test_update_activities_batch() {
        let comp = competition();
        let a = activity_by_id(&comp, 1).unwrap().clone().with_name("A");
        let b = activity_by_id(&comp, 2).unwrap().clone().with_name("B");

        let batched = update_activities(&comp, vec![a.clone(), b.clone()]).unwrap();
        let folded = update_activity(&update_activity(&comp, b).unwrap(), a).unwrap();

        assert_eq!(batched, folded);
        assert_eq!(activity_by_id(&batched, 2).unwrap().name, "B");
    }

    #[test]
    fn test_update_without_venue_fails() {
        let comp = Competition::new("C", "C").with_event(Event::new("333"));
        let act = Activity::new(1, "333-r1", at(0), at(60));
        assert!(matches!(update_activity(&comp, act), Err(Error::NoVenue { .. })));
    }

    #[test]
    fn test_room_stations() {
        let comp = competition();
        assert_eq!(room_stations(&comp.schedule.venues[0].rooms[0]).unwrap(), 0);
        assert!(!all_rooms_configured(&comp));

        let comp = set_room_stations(&comp, 10, Some(8)).unwrap();
        let comp = set_room_stations(&comp, 20, None).unwrap();
        assert_eq!(room_stations(&comp.schedule.venues[0].rooms[0]).unwrap(), 8);
        assert!(!all_rooms_configured(&comp));

        let comp = set_room_stations(&comp, 20, Some(4)).unwrap();
        assert!(all_rooms_configured(&comp));
    }

    #[test]
    fn test_with_room_extension_replaces_block() {
        let comp = with_room_extension(&competition(), 20, &RoomConfig { stations: Some(3) }).unwrap();
        assert_eq!(room_stations(&comp.schedule.venues[0].rooms[1]).unwrap(), 3);
    }

    #[test]
    fn test_with_activity_extension() {
        let config = ActivityConfig {
            capacity: 1.0,
            groups: 2,
            scramblers: 0,
            runners: 0,
            assign_judges: false,
        };
        let comp = with_activity_extension(&competition(), 2, &config).unwrap();
        let act = activity_by_id(&comp, 2).unwrap();
        assert_eq!(get_extension::<ActivityConfig, _>(act).unwrap(), Some(config));
    }
}
