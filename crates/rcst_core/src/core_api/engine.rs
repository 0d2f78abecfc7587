use crate::container::Container;
use crate::operation::{Operation, OperationList};
use crate::structure::{self, ID_KEY, WEIGHT_KEY};

use super::error::CoreError;
use super::types::{MazeComponentEntry, OperationOutcome};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    container: Container,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        Container::from_zip_bytes(bytes.as_ref()).map(Session::from_container)
    }
}

impl Session {
    pub fn from_container(container: Container) -> Self {
        Self { container }
    }

    pub fn structure(&self) -> &serde_json::Value {
        &self.container.structure
    }

    pub fn world_data(&self) -> &[u8] {
        &self.container.world_data
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn apply(&mut self, operation: &Operation) -> OperationOutcome {
        let tree = std::mem::take(&mut self.container.structure);
        let (found, tree) = operation.apply(tree);
        self.container.structure = tree;
        OperationOutcome {
            operation: operation.clone(),
            found,
        }
    }

    pub fn apply_all(&mut self, operations: &OperationList) -> Vec<OperationOutcome> {
        operations
            .operations()
            .iter()
            .map(|operation| self.apply(operation))
            .collect()
    }

    pub fn maze_components(&self) -> Vec<MazeComponentEntry> {
        let Some(entries) = structure::generation_infos(&self.container.structure) else {
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let info = structure::maze_component_info(entry)?;
                Some(MazeComponentEntry {
                    index,
                    maze_id: structure::maze_id(info)?.to_string(),
                    id: info
                        .get(ID_KEY)
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string),
                    weight: info.get(WEIGHT_KEY).and_then(serde_json::Value::as_f64),
                })
            })
            .collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.container.to_zip_bytes()
    }
}
