//! The four structure edits.
//!
//! Each takes the tree by value and hands it back together with a `found`
//! flag. The flag only feeds diagnostics; a missing section or a tree with no
//! matching component is a no-op, never an error.

use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::warn;

use crate::component_id::generate_id;
use crate::rounding::try_round_number;
use crate::structure::{
    CHANCE_KEY, ID_KEY, MAZE_ID_KEY, WEIGHT_KEY, generation_infos_mut, has_maze_id,
    matching_components, maze_component_info_mut, variables_mut,
};

/// Rounds every component `weight` and every variable `chance`.
///
/// `found` is true when at least one numeric field was rounded. Values outside
/// the rounding band are left exactly as written and do not count.
pub fn round_numbers(mut tree: JsonValue) -> (bool, JsonValue) {
    let mut found = false;

    if let Some(entries) = generation_infos_mut(&mut tree) {
        for entry in entries.iter_mut() {
            if let Some(info) = maze_component_info_mut(entry) {
                found |= round_field(info, WEIGHT_KEY);
            }
        }
    }

    if let Some(variables) = variables_mut(&mut tree) {
        for variable in variables.iter_mut() {
            if let Some(variable) = variable.as_object_mut() {
                found |= round_field(variable, CHANCE_KEY);
            }
        }
    }

    (found, tree)
}

/// Appends a copy of every component named `old_name`, renamed to `new_name`
/// and given a fresh id. Sources stay where they are.
pub fn clone_component(mut tree: JsonValue, old_name: &str, new_name: &str) -> (bool, JsonValue) {
    let found = clone_matching(&mut tree, old_name, new_name);
    (found, tree)
}

pub fn rename_component(
    mut tree: JsonValue,
    old_name: &str,
    new_name: &str,
) -> (bool, JsonValue) {
    let found = update_matching(&mut tree, old_name, |info| {
        info.insert(MAZE_ID_KEY.to_string(), JsonValue::from(new_name));
    });
    (found, tree)
}

/// Sets `weight` to zero on every component named `maze_name`.
///
/// Components without a `weight` still count as found but gain no key.
pub fn zero_weights(mut tree: JsonValue, maze_name: &str) -> (bool, JsonValue) {
    let found = update_matching(&mut tree, maze_name, |info| {
        if let Some(weight) = info.get_mut(WEIGHT_KEY) {
            *weight = JsonValue::from(0.0);
        }
    });
    (found, tree)
}

fn update_matching(
    tree: &mut JsonValue,
    name: &str,
    mut update: impl FnMut(&mut JsonMap<String, JsonValue>),
) -> bool {
    let Some(entries) = generation_infos_mut(tree) else {
        return false;
    };

    let mut found = false;
    for entry in entries.iter_mut().filter(|entry| has_maze_id(entry, name)) {
        if let Some(info) = maze_component_info_mut(entry) {
            update(info);
            found = true;
        }
    }
    found
}

fn clone_matching(tree: &mut JsonValue, old_name: &str, new_name: &str) -> bool {
    let Some(entries) = generation_infos_mut(tree) else {
        return false;
    };

    // Only entries present before the scan are sources.
    let sources = matching_components(entries, old_name);
    for &index in &sources {
        let mut cloned = entries[index].clone();
        if let Some(info) = maze_component_info_mut(&mut cloned) {
            info.insert(MAZE_ID_KEY.to_string(), JsonValue::from(new_name));
            info.insert(ID_KEY.to_string(), JsonValue::from(generate_id()));
        }
        entries.push(cloned);
    }
    !sources.is_empty()
}

fn round_field(record: &mut JsonMap<String, JsonValue>, key: &str) -> bool {
    let Some(value) = record.get_mut(key) else {
        return false;
    };
    let Some(number) = value.as_f64() else {
        warn!(field = key, value = %value, "field is not a number, leaving it unchanged");
        return false;
    };
    let Some(rounded) = try_round_number(number) else {
        warn!(field = key, number, "number is out of the expected range, leaving it unchanged");
        return false;
    };
    *value = JsonValue::from(rounded);
    true
}
