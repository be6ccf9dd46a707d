//! Human-readable rendering of results, cutoffs, time limits and names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::activity_code::{event_name_by_id, parse_activity_code};
use crate::error::Result;
use crate::models::{Cutoff, TimeLimit};

static LOCAL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\((.+)\)$").expect("Invalid local name regex"));

/// Formats centiseconds as `H:MM:SS.cc`, dropping leading zero units.
///
/// `950` → `9.50`, `6000` → `1:00.00`, `360000` → `1:00:00.00`.
pub fn centiseconds_to_clock_format(centiseconds: i64) -> String {
    let hours = centiseconds / 360_000;
    let minutes = (centiseconds % 360_000) / 6_000;
    let seconds = (centiseconds % 6_000) / 100;
    let centis = centiseconds % 100;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
    } else if minutes > 0 {
        format!("{minutes}:{seconds:02}.{centis:02}")
    } else {
        format!("{seconds}.{centis:02}")
    }
}

/// Points encoded in a multi-blind attempt result (`0DDTTTTTMM`, points = 99 − DD).
pub fn multiblind_points(attempt_result: i64) -> i64 {
    99 - (attempt_result / 10_000_000) % 100
}

/// Cutoff result in the unit of the event.
pub fn cutoff_to_string(cutoff: &Cutoff, event_id: &str) -> String {
    match event_id {
        "333mbf" => format!("{} points", multiblind_points(cutoff.attempt_result)),
        "333fm" => format!("{} moves", cutoff.attempt_result),
        _ => centiseconds_to_clock_format(cutoff.attempt_result),
    }
}

/// Short round label, e.g. `3x3x3 Blindfolded R1`.
pub fn round_short_name(round_id: &str) -> Result<String> {
    let code = parse_activity_code(round_id)?;
    let event = event_name_by_id(&code.event_id);
    Ok(match code.round_number {
        Some(r) => format!("{event} R{r}"),
        None => event.to_string(),
    })
}

/// Time limit text; cumulative limits name the rounds sharing them.
pub fn time_limit_to_string(time_limit: &TimeLimit) -> Result<String> {
    let clock = centiseconds_to_clock_format(time_limit.centiseconds);
    Ok(match time_limit.cumulative_round_ids.as_slice() {
        [] => clock,
        [_] => format!("{clock} in total"),
        rounds => {
            let names = rounds
                .iter()
                .map(String::as_str)
                .map(round_short_name)
                .collect::<Result<Vec<_>>>()?;
            format!("{clock} total for {}", names.join(", "))
        }
    })
}

/// Name as printed: `Latin (Local)` becomes `Local (Latin)` when local
/// names go first. Names without a local part are returned unchanged.
pub fn pdf_name(name: &str, local_names_first: bool) -> String {
    if !local_names_first {
        return name.to_string();
    }
    match LOCAL_NAME.captures(name) {
        Some(caps) => format!("{} ({})", &caps[2], &caps[1]),
        None => name.to_string(),
    }
}
