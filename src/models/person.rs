//! Person and assignment models.
//!
//! An assignment links a person to an activity with a role. Competing in a
//! group, scrambling, running and judging are the roles this crate knows;
//! any other role code is kept verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A registered person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Registration number printed on scorecards. `None` for staff-only people.
    #[serde(default)]
    pub registrant_id: Option<u32>,
    /// Display name, `"Latin (Local)"` when a local name exists.
    pub name: String,
    /// WCA identifier, if the person has competed before.
    #[serde(default)]
    pub wca_id: Option<String>,
    /// Activity assignments.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Person {
    /// Creates a person without assignments.
    pub fn new(registrant_id: u32, name: impl Into<String>) -> Self {
        Self {
            registrant_id: Some(registrant_id),
            name: name.into(),
            wca_id: None,
            assignments: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Sets the WCA identifier.
    pub fn with_wca_id(mut self, wca_id: impl Into<String>) -> Self {
        self.wca_id = Some(wca_id.into());
        self
    }

    /// Adds an assignment.
    pub fn with_assignment(mut self, activity_id: u32, assignment_code: AssignmentCode) -> Self {
        self.assignments.push(Assignment {
            activity_id,
            assignment_code,
        });
        self
    }

    /// Whether this person holds `code` for `activity_id`.
    pub fn has_assignment(&self, activity_id: u32, code: &AssignmentCode) -> bool {
        self.assignments
            .iter()
            .any(|a| a.activity_id == activity_id && &a.assignment_code == code)
    }
}

/// A person-to-activity assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assigned activity.
    pub activity_id: u32,
    /// Role in that activity.
    pub assignment_code: AssignmentCode,
}

/// Role of a person within an activity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignmentCode {
    /// Competing.
    Competitor,
    /// Scrambling puzzles.
    Scrambler,
    /// Carrying puzzles between scramblers and stations.
    Runner,
    /// Judging at a station.
    Judge,
    /// Any other role, stored verbatim.
    Other(String),
}

impl AssignmentCode {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Competitor => "competitor",
            Self::Scrambler => "staff-scrambler",
            Self::Runner => "staff-runner",
            Self::Judge => "staff-judge",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for AssignmentCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "competitor" => Self::Competitor,
            "staff-scrambler" => Self::Scrambler,
            "staff-runner" => Self::Runner,
            "staff-judge" => Self::Judge,
            _ => Self::Other(code),
        }
    }
}

impl From<AssignmentCode> for String {
    fn from(code: AssignmentCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for AssignmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_assignment() {
        let p = Person::new(1, "Sherlock Holmes")
            .with_assignment(10, AssignmentCode::Competitor)
            .with_assignment(11, AssignmentCode::Judge);

        assert!(p.has_assignment(10, &AssignmentCode::Competitor));
        assert!(p.has_assignment(11, &AssignmentCode::Judge));
        assert!(!p.has_assignment(11, &AssignmentCode::Competitor));
        assert!(!p.has_assignment(12, &AssignmentCode::Judge));
    }

    #[test]
    fn test_assignment_code_wire_format() {
        let json = serde_json::json!({ "activityId": 3, "assignmentCode": "staff-runner" });
        let a: Assignment = serde_json::from_value(json).unwrap();
        assert_eq!(a.assignment_code, AssignmentCode::Runner);

        let other = AssignmentCode::from("staff-delegate".to_string());
        assert_eq!(other, AssignmentCode::Other("staff-delegate".into()));
        assert_eq!(
            serde_json::to_value(&other).unwrap(),
            serde_json::json!("staff-delegate")
        );
    }

    #[test]
    fn test_deserialize_person_without_registration() {
        let json = serde_json::json!({
            "name": "John Watson",
            "registrantId": null,
            "wcaUserId": 42,
            "assignments": []
        });
        let p: Person = serde_json::from_value(json).unwrap();
        assert_eq!(p.registrant_id, None);
        assert!(p.extra.contains_key("wcaUserId"));
    }
}
