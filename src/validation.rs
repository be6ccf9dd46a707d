//! Structural validation of competition documents.
//!
//! Checks the integrity of a document before it is scheduled or printed.
//! Detects:
//! - Missing venue
//! - Duplicate activity IDs (across every nesting level)
//! - Activity codes that do not parse
//! - Child activities starting before or ending after their parent
//! - Room metadata that does not deserialize
//!
//! Every problem is collected; validation never stops at the first one.

use std::collections::HashSet;

use crate::activity_code::parse_activity_code;
use crate::extension::{get_extension, RoomConfig};
use crate::models::{Activity, Competition};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The schedule has no venue.
    NoVenue,
    /// Two activities share the same ID.
    DuplicateActivityId,
    /// An activity code does not follow the grammar.
    InvalidActivityCode,
    /// A child activity is not contained in its parent's time span.
    ChildOutsideParent,
    /// A metadata block cannot be read as its schema.
    InvalidExtension,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a competition document.
///
/// Only the first venue is inspected, matching every other operation of
/// the crate.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_competition(competition: &Competition) -> ValidationResult {
    let mut errors = Vec::new();

    let Some(venue) = competition.schedule.venues.first() else {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::NoVenue,
            format!("Competition '{}' has no venue", competition.id),
        )]);
    };

    let mut activity_ids = HashSet::new();
    for room in &venue.rooms {
        if let Err(e) = get_extension::<RoomConfig, _>(room.as_ref()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidExtension,
                format!("Room '{}': {e}", room.name),
            ));
        }

        for activity in &room.activities {
            check_activity(activity, None, &mut activity_ids, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_activity(
    activity: &Activity,
    parent: Option<&Activity>,
    seen: &mut HashSet<u32>,
    errors: &mut Vec<ValidationError>,
) {
    if !seen.insert(activity.id) {
        errors.push(ValidationError::new(
            ValidationErrorKind::DuplicateActivityId,
            format!("Duplicate activity ID: {}", activity.id),
        ));
    }

    if parse_activity_code(&activity.activity_code).is_err() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidActivityCode,
            format!(
                "Activity {} has malformed code '{}'",
                activity.id, activity.activity_code
            ),
        ));
    }

    if let Some(parent) = parent {
        if activity.start_time < parent.start_time || activity.end_time > parent.end_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::ChildOutsideParent,
                format!(
                    "Activity {} is outside its parent {}",
                    activity.id, parent.id
                ),
            ));
        }
    }

    for child in &activity.child_activities {
        check_activity(child, Some(activity), seen, errors);
    }
}
