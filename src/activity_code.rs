//! Activity code grammar.
//!
//! Activity codes pack event, round, group and attempt into one string:
//!
//! ```text
//! event[-r<round>][-g<group>][-a<attempt>]
//! ```
//!
//! The event token is mandatory; the rest are optional and independent but
//! must appear in that order. Absent parts are `None`, never zero.
//!
//! # Examples
//! | Code | Meaning |
//! |------|---------|
//! | `333-r1` | 3x3x3 round 1 |
//! | `333-r1-g2` | group 2 of that round |
//! | `333fm-r1-a1` | first attempt of Fewest Moves round 1 |
//! | `other-lunch` | non-competition activity (event `other`) |

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::error::{Error, Result};
use crate::models::Activity;

static ACTIVITY_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([[:alnum:]]+)(?:-r(\d+))?(?:-g(\d+))?(?:-a(\d+))?")
        .expect("Invalid activity code regex")
});

/// Events scheduled per attempt, without a round-level activity.
const PER_ATTEMPT_EVENTS: [&str; 2] = ["333fm", "333mbf"];

/// A parsed activity code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityCode {
    /// Event identifier, e.g. `333`.
    pub event_id: String,
    /// Round number, if present.
    pub round_number: Option<u32>,
    /// Group number, if present.
    pub group_number: Option<u32>,
    /// Attempt number, if present.
    pub attempt_number: Option<u32>,
}

impl ActivityCode {
    /// Whether this code carries configuration for its round.
    ///
    /// Round-level codes qualify. For per-attempt events the first attempt
    /// stands in for the round, since no round-level activity exists.
    pub fn is_configurable(&self) -> bool {
        if self.round_number.is_none() || self.group_number.is_some() {
            return false;
        }
        if PER_ATTEMPT_EVENTS.contains(&self.event_id.as_str()) {
            self.attempt_number == Some(1)
        } else {
            self.attempt_number.is_none()
        }
    }

    /// Whether this code belongs to the round `event_id`-r`round_number`.
    pub fn is_in_round(&self, round: &ActivityCode) -> bool {
        self.event_id == round.event_id && self.round_number == round.round_number
    }

    /// Human-readable name, e.g. `3x3x3 Cube, Round 1, Group 2`.
    pub fn to_name(&self) -> String {
        let mut parts = vec![event_name_by_id(&self.event_id).to_string()];
        if let Some(r) = self.round_number {
            parts.push(format!("Round {r}"));
        }
        if let Some(g) = self.group_number {
            parts.push(format!("Group {g}"));
        }
        if let Some(a) = self.attempt_number {
            parts.push(format!("Attempt {a}"));
        }
        parts.join(", ")
    }
}

impl fmt::Display for ActivityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event_id)?;
        if let Some(r) = self.round_number {
            write!(f, "-r{r}")?;
        }
        if let Some(g) = self.group_number {
            write!(f, "-g{g}")?;
        }
        if let Some(a) = self.attempt_number {
            write!(f, "-a{a}")?;
        }
        Ok(())
    }
}

/// Parses an activity code.
///
/// # Errors
/// [`Error::InvalidActivityCode`] if the code does not start with an event
/// token or a number does not fit in `u32`.
pub fn parse_activity_code(code: &str) -> Result<ActivityCode> {
    let caps = ACTIVITY_CODE
        .captures(code)
        .ok_or_else(|| Error::invalid_code(code))?;
    let number = |i: usize| -> Result<Option<u32>> {
        caps.get(i)
            .map(|m| m.as_str().parse::<u32>().map_err(|_| Error::invalid_code(code)))
            .transpose()
    };

    Ok(ActivityCode {
        event_id: caps[1].to_string(),
        round_number: number(2)?,
        group_number: number(3)?,
        attempt_number: number(4)?,
    })
}

/// Human-readable name for an activity code.
pub fn activity_code_to_name(code: &str) -> Result<String> {
    parse_activity_code(code).map(|c| c.to_name())
}

/// Whether `activity` is the one carrying its round's allocation metadata.
pub fn is_activity_configurable(activity: &Activity) -> Result<bool> {
    parse_activity_code(&activity.activity_code).map(|c| c.is_configurable())
}

/// Full name of a WCA event; unknown identifiers are returned unchanged.
pub fn event_name_by_id(event_id: &str) -> &str {
    match event_id {
        "333" => "3x3x3 Cube",
        "222" => "2x2x2 Cube",
        "444" => "4x4x4 Cube",
        "555" => "5x5x5 Cube",
        "666" => "6x6x6 Cube",
        "777" => "7x7x7 Cube",
        "333bf" => "3x3x3 Blindfolded",
        "333fm" => "3x3x3 Fewest Moves",
        "333oh" => "3x3x3 One-Handed",
        "333ft" => "3x3x3 With Feet",
        "clock" => "Clock",
        "minx" => "Megaminx",
        "pyram" => "Pyraminx",
        "skewb" => "Skewb",
        "sq1" => "Square-1",
        "444bf" => "4x4x4 Blindfolded",
        "555bf" => "5x5x5 Blindfolded",
        "333mbf" => "3x3x3 Multi-Blind",
        other => other,
    }
}
