//! Directory-level driver: validate the input directory, prepare the output
//! (and optional staging) directories, then edit every container in turn.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::container::{Container, STRUCTURE_MEMBER, WORLD_DATA_MEMBER, is_zip_archive};
use crate::core_api::{
    BatchSummary, ContainerComponents, ContainerReport, CoreError, CoreErrorCode, Engine, Session,
};
use crate::operation::{Operation, OperationList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: Option<PathBuf>,
}

/// Every entry must be a regular file that opens as a zip archive. Returns
/// the container paths sorted by file name.
pub fn verify_container_directory(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    if !dir.is_dir() {
        return Err(CoreError::new(
            CoreErrorCode::Path,
            format!("input path is not a directory: {}", dir.display()),
        ));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error("list", dir, e))? {
        let entry = entry.map_err(|e| io_error("list", dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();

    let mut problems = Vec::new();
    for path in &paths {
        let name = display_name(path);
        if !path.is_file() {
            problems.push(format!("found content that was not a file: {name}"));
            continue;
        }
        let bytes = fs::read(path).map_err(|e| io_error("read", path, e))?;
        if !is_zip_archive(&bytes) {
            problems.push(format!("found content that was not .rcst (zip) format: {name}"));
        }
    }

    if !problems.is_empty() {
        return Err(CoreError::new(
            CoreErrorCode::Path,
            format!(
                "unexpected content in input directory {}: {}",
                dir.display(),
                problems.join("; ")
            ),
        ));
    }
    Ok(paths)
}

/// Creates `dir` if needed, then removes everything inside it.
pub fn make_directory_empty(dir: &Path) -> Result<(), CoreError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| io_error("create", dir, e))?;
    }
    if !dir.is_dir() {
        return Err(CoreError::new(
            CoreErrorCode::Path,
            format!("path is not a directory: {}", dir.display()),
        ));
    }

    for entry in fs::read_dir(dir).map_err(|e| io_error("list", dir, e))? {
        let entry = entry.map_err(|e| io_error("list", dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_error("inspect", &path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| io_error("remove", &path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| io_error("remove", &path, e))?;
        }
    }
    Ok(())
}

pub fn run_batch(
    options: &BatchOptions,
    operations: &OperationList,
) -> Result<BatchSummary, CoreError> {
    let inputs = verify_container_directory(&options.input_dir)?;

    prepare_directory(&options.output_dir, &options.input_dir)?;
    if let Some(temp_dir) = &options.temp_dir {
        prepare_directory(temp_dir, &options.input_dir)?;
    }

    let mut summary = BatchSummary {
        containers: Vec::with_capacity(inputs.len()),
        skipped_operations: operations.skipped(),
    };

    for input in &inputs {
        let file_name = display_name(input);
        info!(file = %file_name, operations = operations.len(), "processing container");

        let mut session = open_container(input)?;
        let outcomes = session.apply_all(operations);
        for outcome in outcomes.iter().filter(|o| !o.found) {
            log_missed(&file_name, &outcome.operation);
        }

        if let Some(temp_dir) = &options.temp_dir {
            stage_container(temp_dir, input, session.container())?;
        }

        let output_path = options.output_dir.join(&file_name);
        let bytes = session.to_bytes()?;
        fs::write(&output_path, bytes).map_err(|e| io_error("write", &output_path, e))?;
        debug!(path = %output_path.display(), "wrote container");

        summary.containers.push(ContainerReport {
            file_name,
            outcomes,
        });
    }

    Ok(summary)
}

/// Read-only listing of the maze components in every container.
pub fn list_components(input_dir: &Path) -> Result<Vec<ContainerComponents>, CoreError> {
    verify_container_directory(input_dir)?
        .iter()
        .map(|path| -> Result<ContainerComponents, CoreError> {
            let session = open_container(path)?;
            Ok(ContainerComponents {
                file_name: display_name(path),
                components: session.maze_components(),
            })
        })
        .collect()
}

fn open_container(path: &Path) -> Result<Session, CoreError> {
    let bytes = fs::read(path).map_err(|e| io_error("read", path, e))?;
    Engine::new()
        .open_bytes(bytes)
        .map_err(|e| CoreError::new(e.code, format!("{}: {}", path.display(), e.message)))
}

/// Clearing `dir` must never reach the input directory, so `dir` may be
/// neither the input directory nor one of its ancestors.
fn prepare_directory(dir: &Path, input_dir: &Path) -> Result<(), CoreError> {
    if let (Ok(dir), Ok(input)) = (fs::canonicalize(dir), fs::canonicalize(input_dir)) {
        if input.starts_with(&dir) {
            return Err(CoreError::new(
                CoreErrorCode::Path,
                format!(
                    "refusing to clear {} because it contains the input directory {}",
                    dir.display(),
                    input.display()
                ),
            ));
        }
    }
    make_directory_empty(dir)
}

fn stage_container(temp_dir: &Path, input: &Path, container: &Container) -> Result<(), CoreError> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| display_name(input));
    let stage_dir = temp_dir.join(stem);
    fs::create_dir_all(&stage_dir).map_err(|e| io_error("create", &stage_dir, e))?;

    let structure_path = stage_dir.join(STRUCTURE_MEMBER);
    fs::write(&structure_path, container.structure_json_bytes()?)
        .map_err(|e| io_error("write", &structure_path, e))?;
    let world_data_path = stage_dir.join(WORLD_DATA_MEMBER);
    fs::write(&world_data_path, &container.world_data)
        .map_err(|e| io_error("write", &world_data_path, e))?;
    Ok(())
}

fn log_missed(file_name: &str, operation: &Operation) {
    match operation.target() {
        Some(component) => warn!(file = file_name, component, "did not find maze component"),
        None => warn!(file = file_name, "did not find numbers"),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> CoreError {
    CoreError::new(
        CoreErrorCode::Io,
        format!("failed to {action} {}: {e}", path.display()),
    )
}
