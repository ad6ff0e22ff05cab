//! Classification of recipe run results.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use enclave_core::error::Result;

use crate::wrappers::RunResult;

/// Run results grouped by what happened to each file.
#[derive(Debug, Clone)]
pub struct ResultsContainer {
    project_root: PathBuf,
    generated: Vec<RunResult>,
    deleted: Vec<RunResult>,
    moved: Vec<RunResult>,
    refactored_in_place: Vec<RunResult>,
}

impl ResultsContainer {
    /// Classify `results`.
    ///
    /// A result with neither a before nor an after state is dropped, as is an
    /// in-place result whose diff is empty.
    pub fn new(project_root: impl Into<PathBuf>, results: Vec<RunResult>) -> Result<Self> {
        let mut container = Self {
            project_root: project_root.into(),
            generated: Vec::new(),
            deleted: Vec::new(),
            moved: Vec::new(),
            refactored_in_place: Vec::new(),
        };

        for result in results {
            match (result.before()?, result.after()?) {
                (None, None) => warn!("Dropping run result with no before or after state"),
                (None, Some(_)) => container.generated.push(result),
                (Some(_), None) => container.deleted.push(result),
                (Some(before), Some(after)) => {
                    if before.source_path()? != after.source_path()? {
                        container.moved.push(result);
                    } else if !result.diff()?.is_empty() {
                        container.refactored_in_place.push(result);
                    }
                }
            }
        }
        Ok(container)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn generated(&self) -> &[RunResult] {
        &self.generated
    }

    pub fn deleted(&self) -> &[RunResult] {
        &self.deleted
    }

    pub fn moved(&self) -> &[RunResult] {
        &self.moved
    }

    pub fn refactored_in_place(&self) -> &[RunResult] {
        &self.refactored_in_place
    }

    /// Whether any file changed.
    pub fn is_not_empty(&self) -> bool {
        !(self.generated.is_empty()
            && self.deleted.is_empty()
            && self.moved.is_empty()
            && self.refactored_in_place.is_empty())
    }

    /// The first recipe error, looking at generated, deleted, moved and
    /// in-place results in that order.
    pub fn first_error(&self) -> Result<Option<String>> {
        for result in self
            .generated
            .iter()
            .chain(&self.deleted)
            .chain(&self.moved)
            .chain(&self.refactored_in_place)
        {
            if let Some(error) = result.recipe_errors()?.into_iter().next() {
                return Ok(Some(error));
            }
        }
        Ok(None)
    }

    /// Read the affected paths out of the engine.
    pub fn summary(&self) -> Result<ResultsSummary> {
        let after_path = |r: &RunResult| -> Result<Option<PathBuf>> {
            r.after()?.map(|s| s.source_path()).transpose()
        };
        let before_path = |r: &RunResult| -> Result<Option<PathBuf>> {
            r.before()?.map(|s| s.source_path()).transpose()
        };

        let mut summary = ResultsSummary {
            project_root: self.project_root.clone(),
            ..ResultsSummary::default()
        };
        for r in &self.generated {
            summary.generated.extend(after_path(r)?);
        }
        for r in &self.deleted {
            summary.deleted.extend(before_path(r)?);
        }
        for r in &self.moved {
            if let (Some(from), Some(to)) = (before_path(r)?, after_path(r)?) {
                summary.moved.push(MovedPath { from, to });
            }
        }
        for r in &self.refactored_in_place {
            summary.refactored_in_place.extend(after_path(r)?);
        }
        Ok(summary)
    }
}

/// A moved file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedPath {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// The paths affected by a run, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultsSummary {
    pub project_root: PathBuf,
    pub generated: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub moved: Vec<MovedPath>,
    pub refactored_in_place: Vec<PathBuf>,
}

impl ResultsSummary {
    /// Total number of affected files.
    pub fn len(&self) -> usize {
        self.generated.len() + self.deleted.len() + self.moved.len() + self.refactored_in_place.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
