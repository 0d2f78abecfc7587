use serde::{Deserialize, Serialize};

use crate::operation::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MazeComponentEntry {
    pub index: usize,
    pub maze_id: String,
    pub id: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerReport {
    pub file_name: String,
    pub outcomes: Vec<OperationOutcome>,
}

impl ContainerReport {
    pub fn missed(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| !o.found)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSummary {
    pub containers: Vec<ContainerReport>,
    pub skipped_operations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerComponents {
    pub file_name: String,
    pub components: Vec<MazeComponentEntry>,
}
