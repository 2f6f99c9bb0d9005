//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project marker directory
pub const PROJECT_DIR: &str = ".fonds";

/// Database file inside the project directory
const DATABASE_FILE: &str = "archive.db";

/// Represents a fonds project: a directory holding `.fonds/`
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .fonds/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use `--project` when given, otherwise discover from the working directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ProjectError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }

        Self::create_layout(&root)?;
        Ok(Self { root })
    }

    /// Reinitialize even if .fonds/ exists; the database file is removed
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        for suffix in ["", "-wal", "-shm"] {
            let file = root.join(PROJECT_DIR).join(format!("{}{}", DATABASE_FILE, suffix));
            if file.exists() {
                std::fs::remove_file(&file).map_err(|e| ProjectError::IoError(e.to_string()))?;
            }
        }

        Self::create_layout(&root)?;
        Ok(Self { root })
    }

    fn create_layout(root: &Path) -> Result<(), ProjectError> {
        let fonds_dir = root.join(PROJECT_DIR);
        std::fs::create_dir_all(fonds_dir.join("logs"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = fonds_dir.join("config.yaml");
        if !config_path.exists() {
            std::fs::write(&config_path, Self::default_config())
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# fonds project configuration

# Print a progress line every N rows (0 disables)
# rows_until_update: 100

# Append row errors to this file
# error_log: .fonds/logs/import-errors.log

# Mask for generated accession numbers (%Y = year, #iii = padded counter)
# accession_mask: "%Y-#iii"

# Source name recorded in the keymap (default: input file name)
# source_name: ""

# Default output format for list commands (table, json, csv)
# default_format: table
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .fonds configuration directory
    pub fn fonds_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Path of the SQLite archive database
    pub fn database_path(&self) -> PathBuf {
        self.fonds_dir().join(DATABASE_FILE)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a fonds project (searched from {searched_from:?}). Run 'fonds init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("fonds project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.fonds_dir().is_dir());
        assert!(project.fonds_dir().join("config.yaml").exists());
        assert!(project.fonds_dir().join("logs").is_dir());
    }

    #[test]
    fn test_project_init_twice_fails() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        assert!(matches!(
            Project::init(tmp.path()),
            Err(ProjectError::AlreadyExists(_))
        ));
        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_project_discover_from_subdirectory() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let nested = tmp.path().join("batches/2011");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Project::discover_from(&nested).unwrap();
        assert_eq!(found.root(), tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_project_discover_fails_outside_project() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            Project::discover_from(tmp.path()),
            Err(ProjectError::NotFound { .. })
        ));
    }
}
