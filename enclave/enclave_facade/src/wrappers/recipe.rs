//! Recipes, their descriptors and validation results.

use serde::Serialize;

use enclave_core::error::Result;
use enclave_core::TypeName;

use crate::boundary::{list, IntoValue, Wrapper};
use crate::reflect::contract::{self, types};
use crate::wrappers::execution::{ExecutionContext, RunResult};
use crate::wrappers::source::SourceFile;

wrapper! {
    /// A transformation over source files.
    Recipe => types::RECIPE
}

impl Recipe {
    /// The fully qualified recipe name.
    pub fn name(&self) -> Result<String> {
        self.remote.call_as(&contract::RECIPE_GET_NAME, vec![])
    }

    /// Run over `sources` with a fresh engine-side context.
    pub fn run(&self, sources: &[SourceFile]) -> Result<Vec<RunResult>> {
        self.remote
            .call_as(&contract::RECIPE_RUN, vec![list(sources)])
    }

    /// Run over `sources` recording errors in `ctx`.
    pub fn run_with_context(
        &self,
        sources: &[SourceFile],
        ctx: &ExecutionContext,
    ) -> Result<Vec<RunResult>> {
        self.remote.call_as(
            &contract::RECIPE_RUN_WITH_CONTEXT,
            vec![list(sources), ctx.into_value()],
        )
    }

    /// Validate the recipe and everything it composes.
    pub fn validate_all(&self) -> Result<Vec<Validated>> {
        self.remote.call_as(&contract::RECIPE_VALIDATE_ALL, vec![])
    }
}

wrapper! {
    /// Metadata about an available recipe.
    RecipeDescriptor => types::RECIPE_DESCRIPTOR
}

impl RecipeDescriptor {
    pub fn name(&self) -> Result<String> {
        self.remote.call_as(&contract::DESCRIPTOR_GET_NAME, vec![])
    }

    pub fn display_name(&self) -> Result<String> {
        self.remote
            .call_as(&contract::DESCRIPTOR_GET_DISPLAY_NAME, vec![])
    }

    pub fn description(&self) -> Result<String> {
        self.remote
            .call_as(&contract::DESCRIPTOR_GET_DESCRIPTION, vec![])
    }

    pub fn options(&self) -> Result<Vec<OptionDescriptor>> {
        self.remote.call_as(&contract::DESCRIPTOR_GET_OPTIONS, vec![])
    }

    /// Read everything into a plain summary.
    pub fn summary(&self) -> Result<RecipeSummary> {
        Ok(RecipeSummary {
            name: self.name()?,
            display_name: self.display_name()?,
            description: self.description()?,
            options: self
                .options()?
                .iter()
                .map(OptionDescriptor::summary)
                .collect::<Result<_>>()?,
        })
    }
}

/// A recipe descriptor read out of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub options: Vec<OptionSummary>,
}

wrapper! {
    /// Metadata about one recipe option.
    OptionDescriptor => types::OPTION_DESCRIPTOR
}

impl OptionDescriptor {
    pub fn name(&self) -> Result<String> {
        self.remote.call_as(&contract::OPTION_GET_NAME, vec![])
    }

    pub fn display_name(&self) -> Result<String> {
        self.remote.call_as(&contract::OPTION_GET_DISPLAY_NAME, vec![])
    }

    pub fn description(&self) -> Result<String> {
        self.remote.call_as(&contract::OPTION_GET_DESCRIPTION, vec![])
    }

    /// The declared option type, as the engine spells it.
    pub fn option_type(&self) -> Result<String> {
        self.remote.call_as(&contract::OPTION_GET_TYPE, vec![])
    }

    pub fn example(&self) -> Result<Option<String>> {
        self.remote.call_as(&contract::OPTION_GET_EXAMPLE, vec![])
    }

    pub fn is_required(&self) -> Result<bool> {
        self.remote.call_as(&contract::OPTION_IS_REQUIRED, vec![])
    }

    fn summary(&self) -> Result<OptionSummary> {
        Ok(OptionSummary {
            name: self.name()?,
            display_name: self.display_name()?,
            description: self.description()?,
            option_type: self.option_type()?,
            example: self.example()?,
            required: self.is_required()?,
        })
    }
}

/// An option descriptor read out of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct OptionSummary {
    pub name: String,
    pub display_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub option_type: String,
    pub example: Option<String>,
    pub required: bool,
}

/// Which variant of a validation result the engine returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedKind {
    Valid,
    Invalid,
    Both,
}

wrapper! {
    /// The result of validating a recipe.
    Validated => types::VALIDATED
}

impl Validated {
    /// The variant, judged by the runtime type.
    pub fn kind(&self) -> ValidatedKind {
        let unit = self.handle().unit();
        let is = |name: &str| TypeName::new(name).map(|n| unit.is_a(&n)).unwrap_or(false);
        if is(types::VALIDATED_BOTH) {
            ValidatedKind::Both
        } else if is(types::VALIDATED_INVALID) {
            ValidatedKind::Invalid
        } else {
            ValidatedKind::Valid
        }
    }

    /// Whether there are no failures.
    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.failures()?.is_empty())
    }

    /// Every failure, flattened.
    pub fn failures(&self) -> Result<Vec<Invalid>> {
        self.remote.call_as(&contract::VALIDATED_FAILURES, vec![])
    }
}

wrapper! {
    /// One validation failure.
    Invalid => types::VALIDATED_INVALID
}

impl Invalid {
    /// The option or property that failed.
    pub fn property(&self) -> Result<String> {
        self.remote.call_as(&contract::INVALID_GET_PROPERTY, vec![])
    }

    pub fn message(&self) -> Result<String> {
        self.remote.call_as(&contract::INVALID_GET_MESSAGE, vec![])
    }

    /// The engine-side exception text, if one was recorded.
    pub fn exception(&self) -> Result<Option<String>> {
        self.remote.call_as(&contract::INVALID_GET_EXCEPTION, vec![])
    }
}

wrapper! {
    /// A named set of formatting styles.
    NamedStyles => types::NAMED_STYLES
}

impl NamedStyles {
    pub fn name(&self) -> Result<String> {
        self.remote.call_as(&contract::STYLES_GET_NAME, vec![])
    }
}
