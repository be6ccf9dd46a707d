//! Path-addressed reads and updates over untyped JSON values.
//!
//! Extension payloads are stored as opaque [`serde_json::Value`]s. These
//! helpers read and rewrite them by property path without the caller having
//! to destructure every level by hand.
//!
//! # Semantics
//! - Updates consume the input and return the rewritten value; only the
//!   containers along the path are touched.
//! - Missing keys (and `null`) along an update path become empty objects.
//! - Absence on reads is decided by key presence: an explicit `null` is a
//!   value, not a miss.
//! - Array containers are addressed with decimal segments (`"0"`).
//! - Stepping into a scalar is an input-contract violation and fails with
//!   [`Error::NotAContainer`].

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Value at `path`, or `None` if any segment is absent.
pub fn get_in<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(*segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Value at `path`, or `default` if any segment is absent.
pub fn get_in_or<'a>(value: &'a Value, path: &[&str], default: &'a Value) -> &'a Value {
    get_in(value, path).unwrap_or(default)
}

/// Replaces the value at `path` with `updater(current)`.
///
/// `current` is `None` when the final key does not exist yet.
pub fn update_in<F>(value: Value, path: &[&str], updater: F) -> Result<Value>
where
    F: FnOnce(Option<Value>) -> Value,
{
    let Some((segment, rest)) = path.split_first() else {
        return Ok(updater(Some(value)));
    };

    match value {
        Value::Object(mut map) => {
            let current = map.get_mut(*segment).map(std::mem::take);
            let updated = descend(current, rest, updater)?;
            map.insert((*segment).to_string(), updated);
            Ok(Value::Object(map))
        }
        Value::Null => update_in(Value::Object(Map::new()), path, updater),
        Value::Array(mut items) => {
            let index = segment
                .parse::<usize>()
                .ok()
                .filter(|i| *i < items.len())
                .ok_or_else(|| Error::not_a_container(*segment))?;
            let current = std::mem::take(&mut items[index]);
            items[index] = descend(Some(current), rest, updater)?;
            Ok(Value::Array(items))
        }
        _ => Err(Error::not_a_container(*segment)),
    }
}

fn descend<F>(current: Option<Value>, rest: &[&str], updater: F) -> Result<Value>
where
    F: FnOnce(Option<Value>) -> Value,
{
    if rest.is_empty() {
        Ok(updater(current))
    } else {
        update_in(current.unwrap_or(Value::Null), rest, updater)
    }
}

/// Sets the value at `path`.
pub fn set_in(value: Value, path: &[&str], new_value: Value) -> Result<Value> {
    update_in(value, path, |_| new_value)
}

/// Shallow-merges `patch` into the object at `path`.
///
/// A missing or non-object current value is replaced by `patch`.
pub fn merge_in(value: Value, path: &[&str], patch: Map<String, Value>) -> Result<Value> {
    update_in(value, path, |current| match current {
        Some(Value::Object(mut existing)) => {
            existing.extend(patch);
            Value::Object(existing)
        }
        _ => Value::Object(patch),
    })
}

/// Whether `value` (and, for containers, every nested value) is non-null.
pub fn is_present_deep(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => map.values().all(is_present_deep),
        Value::Array(items) => items.iter().all(is_present_deep),
        _ => true,
    }
}
