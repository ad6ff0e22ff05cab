//! Recipe environments.

use std::path::Path;

use enclave_core::error::Result;

use crate::boundary::{strings, IntoValue};
use crate::reflect::contract::{self, types};
use crate::wrappers::recipe::{NamedStyles, Recipe, RecipeDescriptor};

wrapper! {
    /// Collects recipe and style sources before building an [`Environment`].
    ///
    /// Every configuration step hands back a builder, which may or may not be
    /// the same engine object.
    EnvironmentBuilder => types::ENVIRONMENT_BUILDER
}

impl EnvironmentBuilder {
    /// Scan the engine runtime for recipes in the given packages.
    pub fn scan_runtime<S: AsRef<str>>(self, accept_packages: &[S]) -> Result<Self> {
        self.remote
            .call_as(&contract::SCAN_RUNTIME, vec![strings(accept_packages)])
    }

    /// Scan a single archive for recipes.
    pub fn scan_archive(self, archive: &Path) -> Result<Self> {
        self.remote
            .call_as(&contract::SCAN_ARCHIVE, vec![archive.into_value()])
    }

    /// Scan the user's home directory for recipe declarations.
    pub fn scan_user_home(self) -> Result<Self> {
        self.remote.call_as(&contract::SCAN_USER_HOME, vec![])
    }

    /// Add a resource loader.
    pub fn load(self, loader: &ResourceLoader) -> Result<Self> {
        self.remote.call_as(&contract::LOAD, vec![loader.into_value()])
    }

    /// Build the environment.
    pub fn build(&self) -> Result<Environment> {
        self.remote.call_as(&contract::BUILD_ENVIRONMENT, vec![])
    }
}

wrapper! {
    /// A set of available recipes and styles.
    Environment => types::ENVIRONMENT
}

impl Environment {
    /// Activate recipes by name, composed into one recipe.
    pub fn activate_recipes<S: AsRef<str>>(&self, names: &[S]) -> Result<Recipe> {
        self.remote
            .call_as(&contract::ACTIVATE_RECIPES, vec![strings(names)])
    }

    /// Activate styles by name.
    pub fn activate_styles<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<NamedStyles>> {
        self.remote
            .call_as(&contract::ACTIVATE_STYLES, vec![strings(names)])
    }

    /// Describe every recipe the environment knows.
    pub fn list_recipe_descriptors(&self) -> Result<Vec<RecipeDescriptor>> {
        self.remote.call_as(&contract::LIST_RECIPE_DESCRIPTORS, vec![])
    }

    /// Every style the environment knows.
    pub fn list_styles(&self) -> Result<Vec<NamedStyles>> {
        self.remote.call_as(&contract::LIST_STYLES, vec![])
    }
}

wrapper! {
    /// A source of recipe and style declarations.
    ResourceLoader => types::RESOURCE_LOADER
}
