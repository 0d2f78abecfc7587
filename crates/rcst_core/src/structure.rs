//! Navigation helpers over a decoded `structure.json` tree.
//!
//! The tree is kept as a generic `serde_json::Value` so that fields this crate
//! never looks at survive a decode/encode cycle untouched.

use serde_json::{Map as JsonMap, Value as JsonValue};

pub const GENERATION_INFOS_KEY: &str = "generationInfos";
pub const GENERATION_INFO_KEY: &str = "generationInfo";
pub const TYPE_KEY: &str = "type";
pub const MAZE_COMPONENT_TYPE: &str = "mazeComponent";
pub const MAZE_ID_KEY: &str = "mazeID";
pub const ID_KEY: &str = "id";
pub const WEIGHT_KEY: &str = "weight";
pub const VARIABLE_DOMAIN_KEY: &str = "variableDomain";
pub const VARIABLES_KEY: &str = "variables";
pub const CHANCE_KEY: &str = "chance";

pub fn generation_infos(tree: &JsonValue) -> Option<&Vec<JsonValue>> {
    tree.get(GENERATION_INFOS_KEY)?.as_array()
}

pub fn generation_infos_mut(tree: &mut JsonValue) -> Option<&mut Vec<JsonValue>> {
    tree.get_mut(GENERATION_INFOS_KEY)?.as_array_mut()
}

pub fn variables_mut(tree: &mut JsonValue) -> Option<&mut Vec<JsonValue>> {
    tree.get_mut(VARIABLE_DOMAIN_KEY)?
        .get_mut(VARIABLES_KEY)?
        .as_array_mut()
}

pub fn is_maze_component(entry: &JsonValue) -> bool {
    entry.get(TYPE_KEY).and_then(JsonValue::as_str) == Some(MAZE_COMPONENT_TYPE)
}

/// The inner `generationInfo` record of a `mazeComponent` entry.
pub fn maze_component_info(entry: &JsonValue) -> Option<&JsonMap<String, JsonValue>> {
    if !is_maze_component(entry) {
        return None;
    }
    entry.get(GENERATION_INFO_KEY)?.as_object()
}

pub fn maze_component_info_mut(
    entry: &mut JsonValue,
) -> Option<&mut JsonMap<String, JsonValue>> {
    if !is_maze_component(entry) {
        return None;
    }
    entry.get_mut(GENERATION_INFO_KEY)?.as_object_mut()
}

pub fn maze_id(info: &JsonMap<String, JsonValue>) -> Option<&str> {
    info.get(MAZE_ID_KEY).and_then(JsonValue::as_str)
}

pub fn has_maze_id(entry: &JsonValue, name: &str) -> bool {
    maze_component_info(entry).and_then(maze_id) == Some(name)
}

/// Positions of every `mazeComponent` entry whose `mazeID` equals `name`.
///
/// `mazeID` is not unique, so this is a full scan rather than a lookup.
pub fn matching_components(entries: &[JsonValue], name: &str) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| has_maze_id(entry, name))
        .map(|(index, _)| index)
        .collect()
}
