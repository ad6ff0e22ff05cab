//! Project provenance markers.

use enclave_core::error::Result;
use enclave_core::Value;

use crate::boundary::IntoValue;
use crate::facade::EngineFacade;
use crate::reflect::contract;
use crate::wrappers::source::Marker;

/// Build tool recorded when none is set.
pub const DEFAULT_BUILD_TOOL: &str = "Gradle";

/// Collects what is known about the project being processed and turns it
/// into the build tool, language version and project markers the engine
/// attaches to every parsed tree.
///
/// Unset fields cross the boundary as null.
#[derive(Debug, Clone)]
pub struct ProjectProvenanceBuilder<'a> {
    facade: &'a EngineFacade,
    project_name: Option<String>,
    build_tool: String,
    build_tool_version: Option<String>,
    vm_runtime_version: Option<String>,
    vm_vendor: Option<String>,
    source_compatibility: Option<String>,
    target_compatibility: Option<String>,
    publication_group_id: Option<String>,
    publication_artifact_id: Option<String>,
    publication_version: Option<String>,
}

impl<'a> ProjectProvenanceBuilder<'a> {
    pub(crate) fn new(facade: &'a EngineFacade) -> Self {
        Self {
            facade,
            project_name: None,
            build_tool: DEFAULT_BUILD_TOOL.to_string(),
            build_tool_version: None,
            vm_runtime_version: None,
            vm_vendor: None,
            source_compatibility: None,
            target_compatibility: None,
            publication_group_id: None,
            publication_artifact_id: None,
            publication_version: None,
        }
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn build_tool(mut self, tool: impl Into<String>) -> Self {
        self.build_tool = tool.into();
        self
    }

    pub fn build_tool_version(mut self, version: impl Into<String>) -> Self {
        self.build_tool_version = Some(version.into());
        self
    }

    pub fn vm_runtime_version(mut self, version: impl Into<String>) -> Self {
        self.vm_runtime_version = Some(version.into());
        self
    }

    pub fn vm_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vm_vendor = Some(vendor.into());
        self
    }

    pub fn source_compatibility(mut self, version: impl Into<String>) -> Self {
        self.source_compatibility = Some(version.into());
        self
    }

    pub fn target_compatibility(mut self, version: impl Into<String>) -> Self {
        self.target_compatibility = Some(version.into());
        self
    }

    pub fn publication_group_id(mut self, group: impl Into<String>) -> Self {
        self.publication_group_id = Some(group.into());
        self
    }

    pub fn publication_artifact_id(mut self, artifact: impl Into<String>) -> Self {
        self.publication_artifact_id = Some(artifact.into());
        self
    }

    pub fn publication_version(mut self, version: impl Into<String>) -> Self {
        self.publication_version = Some(version.into());
        self
    }

    /// Create the markers, in the order build tool, language version,
    /// project.
    pub fn build(&self) -> Result<Vec<Marker>> {
        let build_tool: Marker = self.facade.construct(
            &contract::BUILD_TOOL_NEW,
            vec![
                self.build_tool.as_str().into_value(),
                self.build_tool_version.clone().into_value(),
            ],
        )?;

        let version: Marker = self.facade.construct(
            &contract::JAVA_VERSION_NEW,
            vec![
                self.vm_runtime_version.clone().into_value(),
                self.vm_vendor.clone().into_value(),
                self.source_compatibility.clone().into_value(),
                self.target_compatibility.clone().into_value(),
            ],
        )?;

        let publication = self.facade.construct_object(
            &contract::JAVA_PROJECT_PUBLICATION_NEW,
            vec![
                self.publication_group_id.clone().into_value(),
                self.publication_artifact_id.clone().into_value(),
                self.publication_version.clone().into_value(),
            ],
        )?;
        let project: Marker = self.facade.construct(
            &contract::JAVA_PROJECT_NEW,
            vec![self.project_name.clone().into_value(), Value::Object(publication)],
        )?;

        Ok(vec![build_tool, version, project])
    }
}
