//! Execution contexts and run results.

use enclave_core::error::Result;

use crate::reflect::contract::{self, types};
use crate::wrappers::recipe::Recipe;
use crate::wrappers::source::SourceFile;

wrapper! {
    /// Collects errors raised while parsing and running recipes.
    ExecutionContext => types::EXECUTION_CONTEXT
}

impl ExecutionContext {
    /// Messages of every error recorded so far.
    pub fn errors(&self) -> Result<Vec<String>> {
        self.remote.call_as(&contract::EXECUTION_CONTEXT_ERRORS, vec![])
    }
}

wrapper! {
    /// The effect of a recipe run on one source file.
    RunResult => types::RESULT
}

impl RunResult {
    /// The file before the run; `None` if the run generated it.
    pub fn before(&self) -> Result<Option<SourceFile>> {
        self.remote.call_as(&contract::RESULT_GET_BEFORE, vec![])
    }

    /// The file after the run; `None` if the run deleted it.
    pub fn after(&self) -> Result<Option<SourceFile>> {
        self.remote.call_as(&contract::RESULT_GET_AFTER, vec![])
    }

    pub fn recipes_that_made_changes(&self) -> Result<Vec<Recipe>> {
        self.remote
            .call_as(&contract::RESULT_RECIPES_THAT_MADE_CHANGES, vec![])
    }

    /// Messages of the errors recipes raised on this file.
    pub fn recipe_errors(&self) -> Result<Vec<String>> {
        self.remote.call_as(&contract::RESULT_GET_RECIPE_ERRORS, vec![])
    }

    /// A unified diff of the change.
    pub fn diff(&self) -> Result<String> {
        self.remote.call_as(&contract::RESULT_DIFF, vec![])
    }
}
