//! Competition, event and round models.
//!
//! The competition document is the root of everything this crate touches.
//! Events own an ordered list of rounds; each round's identifier is the
//! prefix shared by the activity codes scheduled for it (`333-r1`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::{Person, Schedule, Venue};
use crate::error::{Error, Result};
use crate::extension::Extension;

/// Root competition document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    /// Unique competition identifier.
    pub id: String,
    /// Full display name.
    pub name: String,
    /// Short name printed on scorecards.
    #[serde(default)]
    pub short_name: String,
    /// Registered people with their assignments.
    #[serde(default)]
    pub persons: Vec<Arc<Person>>,
    /// Events held, in display order.
    #[serde(default)]
    pub events: Vec<Arc<Event>>,
    /// Venues, rooms and activities.
    #[serde(default)]
    pub schedule: Schedule,
    /// Namespaced metadata blocks.
    #[serde(default)]
    pub extensions: Vec<Extension>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Competition {
    /// Creates an empty competition.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            short_name: String::new(),
            persons: Vec::new(),
            events: Vec::new(),
            schedule: Schedule::default(),
            extensions: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the short name.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    /// Adds an event.
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(Arc::new(event));
        self
    }

    /// Adds a person.
    pub fn with_person(mut self, person: Person) -> Self {
        self.persons.push(Arc::new(person));
        self
    }

    /// Adds a venue.
    pub fn with_venue(mut self, venue: Venue) -> Self {
        self.schedule.venues.push(Arc::new(venue));
        self
    }

    /// The venue all allocation and layout logic works on.
    ///
    /// Additional venues are carried through untouched but never read.
    pub fn first_venue(&self) -> Result<&Venue> {
        self.schedule
            .venues
            .first()
            .map(|v| v.as_ref())
            .ok_or_else(|| Error::NoVenue {
                competition_id: self.id.clone(),
            })
    }

    /// All rounds across all events, in event order.
    pub fn rounds(&self) -> impl Iterator<Item = &Round> {
        self.events.iter().flat_map(|e| e.rounds.iter())
    }

    /// Finds a round by its identifier.
    pub fn round_by_id(&self, round_id: &str) -> Option<&Round> {
        self.rounds().find(|r| r.id == round_id)
    }
}

/// An event (puzzle category) with its rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier, e.g. `333`.
    pub id: String,
    /// Rounds in order.
    #[serde(default)]
    pub rounds: Vec<Round>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Creates an event without rounds.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rounds: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Adds a round.
    pub fn with_round(mut self, round: Round) -> Self {
        self.rounds.push(round);
        self
    }
}

/// A round of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Round identifier, e.g. `333-r1`.
    pub id: String,
    /// Result format, determines the attempt count.
    pub format: RoundFormat,
    /// Cutoff after a limited number of attempts.
    #[serde(default)]
    pub cutoff: Option<Cutoff>,
    /// Per-attempt (or cumulative) time limit.
    #[serde(default)]
    pub time_limit: Option<TimeLimit>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Round {
    /// Creates a round without cutoff or time limit.
    pub fn new(id: impl Into<String>, format: RoundFormat) -> Self {
        Self {
            id: id.into(),
            format,
            cutoff: None,
            time_limit: None,
            extra: Map::new(),
        }
    }

    /// Sets the cutoff.
    pub fn with_cutoff(mut self, number_of_attempts: u32, attempt_result: i64) -> Self {
        self.cutoff = Some(Cutoff {
            number_of_attempts,
            attempt_result,
        });
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, time_limit: TimeLimit) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

/// Result format of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundFormat {
    /// Best of 1.
    #[serde(rename = "1")]
    BestOf1,
    /// Best of 2.
    #[serde(rename = "2")]
    BestOf2,
    /// Best of 3.
    #[serde(rename = "3")]
    BestOf3,
    /// Mean of 3.
    #[serde(rename = "m")]
    MeanOf3,
    /// Average of 5.
    #[serde(rename = "a")]
    AverageOf5,
}

impl RoundFormat {
    /// Maximum number of attempts a competitor can take.
    pub fn max_attempts(self) -> u32 {
        match self {
            Self::BestOf1 => 1,
            Self::BestOf2 => 2,
            Self::BestOf3 | Self::MeanOf3 => 3,
            Self::AverageOf5 => 5,
        }
    }
}

/// A result threshold after `number_of_attempts` attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cutoff {
    /// Attempts after which the cutoff applies.
    pub number_of_attempts: u32,
    /// Result to beat (centiseconds, moves or multi-blind encoding).
    pub attempt_result: i64,
}

/// Time limit of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLimit {
    /// Limit in centiseconds.
    pub centiseconds: i64,
    /// Rounds sharing a cumulative limit. Empty = per attempt.
    #[serde(default)]
    pub cumulative_round_ids: Vec<String>,
}

impl TimeLimit {
    /// Per-attempt limit.
    pub fn per_attempt(centiseconds: i64) -> Self {
        Self {
            centiseconds,
            cumulative_round_ids: Vec::new(),
        }
    }

    /// Limit shared cumulatively by the given rounds.
    pub fn cumulative(centiseconds: i64, round_ids: Vec<String>) -> Self {
        Self {
            centiseconds,
            cumulative_round_ids: round_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_attempts_by_format() {
        assert_eq!(RoundFormat::BestOf1.max_attempts(), 1);
        assert_eq!(RoundFormat::BestOf2.max_attempts(), 2);
        assert_eq!(RoundFormat::BestOf3.max_attempts(), 3);
        assert_eq!(RoundFormat::MeanOf3.max_attempts(), 3);
        assert_eq!(RoundFormat::AverageOf5.max_attempts(), 5);
    }

    #[test]
    fn test_first_venue_missing() {
        let comp = Competition::new("Empty2024", "Empty 2024");
        assert!(matches!(comp.first_venue(), Err(Error::NoVenue { .. })));
    }

    #[test]
    fn test_round_lookup() {
        let comp = Competition::new("C", "C")
            .with_event(
                Event::new("333")
                    .with_round(Round::new("333-r1", RoundFormat::AverageOf5))
                    .with_round(Round::new("333-r2", RoundFormat::AverageOf5)),
            )
            .with_event(Event::new("333bf").with_round(Round::new("333bf-r1", RoundFormat::BestOf3)));

        assert_eq!(comp.rounds().count(), 3);
        assert_eq!(
            comp.round_by_id("333bf-r1").map(|r| r.format),
            Some(RoundFormat::BestOf3)
        );
        assert!(comp.round_by_id("444-r1").is_none());
    }

    #[test]
    fn test_deserialize_round() {
        let json = serde_json::json!({
            "id": "333-r1",
            "format": "a",
            "cutoff": { "numberOfAttempts": 2, "attemptResult": 6000 },
            "timeLimit": { "centiseconds": 60000, "cumulativeRoundIds": [] },
            "advancementCondition": { "type": "ranking", "level": 16 }
        });
        let round: Round = serde_json::from_value(json).unwrap();

        assert_eq!(round.format, RoundFormat::AverageOf5);
        assert_eq!(round.cutoff.as_ref().map(|c| c.number_of_attempts), Some(2));
        assert_eq!(round.time_limit, Some(TimeLimit::per_attempt(60000)));
        assert!(round.extra.contains_key("advancementCondition"));
    }
}
