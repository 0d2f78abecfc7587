//! The operation list configuration.
//!
//! JSON shape:
//! {
//!   "operation_list": [
//!     {"type": "vd1_maze_component_rename", "old_name": "A", "new_name": "B"},
//!     {"type": "vd1_maze_component_clone", "old_name": "B", "new_name": "C"},
//!     {"type": "vd1_maze_component_zero_weights", "maze_name": "C"},
//!     {"type": "vd1_round_numbers"}
//!   ]
//! }
//!
//! Records without a `type`, or with a type not listed above, are logged and
//! skipped. A recognized type with missing parameters is a configuration error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::core_api::{CoreError, CoreErrorCode};
use crate::transform;

pub const ROUND_NUMBERS_TYPE: &str = "vd1_round_numbers";
pub const CLONE_TYPE: &str = "vd1_maze_component_clone";
pub const RENAME_TYPE: &str = "vd1_maze_component_rename";
pub const ZERO_WEIGHTS_TYPE: &str = "vd1_maze_component_zero_weights";

pub const KNOWN_TYPES: [&str; 4] = [ROUND_NUMBERS_TYPE, CLONE_TYPE, RENAME_TYPE, ZERO_WEIGHTS_TYPE];

const OPERATION_LIST_KEY: &str = "operation_list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operation {
    #[serde(rename = "vd1_round_numbers")]
    RoundNumbers,
    #[serde(rename = "vd1_maze_component_clone")]
    CloneComponent { old_name: String, new_name: String },
    #[serde(rename = "vd1_maze_component_rename")]
    RenameComponent { old_name: String, new_name: String },
    #[serde(rename = "vd1_maze_component_zero_weights")]
    ZeroWeights { maze_name: String },
}

impl Operation {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RoundNumbers => ROUND_NUMBERS_TYPE,
            Self::CloneComponent { .. } => CLONE_TYPE,
            Self::RenameComponent { .. } => RENAME_TYPE,
            Self::ZeroWeights { .. } => ZERO_WEIGHTS_TYPE,
        }
    }

    /// The component name this operation looks for, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::RoundNumbers => None,
            Self::CloneComponent { old_name, .. } | Self::RenameComponent { old_name, .. } => {
                Some(old_name.as_str())
            }
            Self::ZeroWeights { maze_name } => Some(maze_name.as_str()),
        }
    }

    pub fn apply(&self, tree: JsonValue) -> (bool, JsonValue) {
        match self {
            Self::RoundNumbers => transform::round_numbers(tree),
            Self::CloneComponent { old_name, new_name } => {
                transform::clone_component(tree, old_name, new_name)
            }
            Self::RenameComponent { old_name, new_name } => {
                transform::rename_component(tree, old_name, new_name)
            }
            Self::ZeroWeights { maze_name } => transform::zero_weights(tree, maze_name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationList {
    operations: Vec<Operation>,
    skipped: usize,
}

impl OperationList {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.is_file() {
            return Err(CoreError::new(
                CoreErrorCode::Config,
                format!("operation list {} is not a file", path.display()),
            ));
        }
        let text = fs::read_to_string(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Config,
                format!("failed to read operation list {}: {e}", path.display()),
            )
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        let document: JsonValue = serde_json::from_str(text).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Config,
                format!("operation list is not valid JSON: {e}"),
            )
        })?;
        let records = document
            .get(OPERATION_LIST_KEY)
            .and_then(JsonValue::as_array)
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::Config,
                    format!(
                        "operation list must be an object with an `{OPERATION_LIST_KEY}` array"
                    ),
                )
            })?;

        let mut list = Self::default();
        for (index, record) in records.iter().enumerate() {
            match parse_record(index, record)? {
                Some(operation) => list.operations.push(operation),
                None => list.skipped += 1,
            }
        }
        Ok(list)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of records dropped because their type was missing or unknown.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

fn parse_record(index: usize, record: &JsonValue) -> Result<Option<Operation>, CoreError> {
    let Some(kind) = record.get("type") else {
        warn!(index, "missing type for operation in operation list, skipping");
        return Ok(None);
    };
    let Some(kind) = kind.as_str().filter(|k| KNOWN_TYPES.contains(k)) else {
        error!(index, operation = %kind, "unexpected operation, skipping");
        return Ok(None);
    };

    serde_json::from_value(record.clone()).map(Some).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Config,
            format!("operation #{index} ({kind}) is malformed: {e}"),
        )
    })
}
