//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::{ArchiveStore, Config, Project};

/// An opened project: its configuration and archive database
pub struct Workspace {
    pub project: Project,
    pub config: Config,
    pub store: ArchiveStore,
}

/// Locate the project (honouring `--project`), load config and open the store
pub fn open_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let project = Project::locate(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load(Some(&project));

    let mut store = ArchiveStore::open(&project).into_diagnostic()?;
    store.set_accession_mask(config.accession_mask());

    tracing::debug!(root = %project.root().display(), "opened project");
    Ok(Workspace {
        project,
        config,
        store,
    })
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First line of a multi-line field, for table cells
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Société d'histoire", 8), "Socié...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("Smith, John"), "\"Smith, John\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("Maps (count): 3\nDVDs (count): 1"), "Maps (count): 3");
        assert_eq!(first_line(""), "");
    }
}
