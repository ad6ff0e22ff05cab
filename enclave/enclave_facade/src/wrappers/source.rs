//! Source trees, their markers, and tree serialization.

use std::path::PathBuf;

use enclave_core::error::Result;

use crate::boundary::{expect_bytes, list, IntoValue};
use crate::reflect::contract::{self, types};

wrapper! {
    /// A parsed source tree.
    SourceFile => types::SOURCE_FILE
}

impl SourceFile {
    /// The path relative to the parse base directory.
    pub fn source_path(&self) -> Result<PathBuf> {
        self.remote.call_as(&contract::SOURCE_GET_SOURCE_PATH, vec![])
    }

    /// Print the tree back to source text.
    pub fn print_all(&self) -> Result<String> {
        self.remote.call_as(&contract::SOURCE_PRINT_ALL, vec![])
    }

    pub fn markers(&self) -> Result<Markers> {
        self.remote.call_as(&contract::SOURCE_GET_MARKERS, vec![])
    }

    /// A copy of this tree carrying `markers`.
    pub fn with_markers(&self, markers: &Markers) -> Result<SourceFile> {
        self.remote
            .call_as(&contract::SOURCE_WITH_MARKERS, vec![markers.into_value()])
    }
}

wrapper! {
    /// An immutable set of markers attached to a tree.
    Markers => types::MARKERS
}

impl Markers {
    /// Add each marker that is not already present.
    ///
    /// Returns the same engine object when nothing was added.
    pub fn add_all(&self, markers: &[Marker]) -> Result<Markers> {
        let mut current = self.clone();
        for marker in markers {
            current = current
                .remote
                .call_as(&contract::MARKERS_ADD_IF_ABSENT, vec![marker.into_value()])?;
        }
        Ok(current)
    }

    pub fn entries(&self) -> Result<Vec<Marker>> {
        self.remote.call_as(&contract::MARKERS_ENTRIES, vec![])
    }
}

wrapper! {
    /// Metadata attached to a tree. Only its runtime type is visible.
    Marker => types::MARKER
}

wrapper! {
    /// Converts source trees to and from bytes.
    TreeSerializer => types::TREE_SERIALIZER
}

impl TreeSerializer {
    pub fn write(&self, sources: &[SourceFile]) -> Result<Vec<u8>> {
        let value = self
            .remote
            .call(&contract::TREE_SERIALIZER_WRITE, vec![list(sources)])?;
        expect_bytes(value)
    }

    pub fn read_list(&self, bytes: Vec<u8>) -> Result<Vec<SourceFile>> {
        self.remote
            .call_as(&contract::TREE_SERIALIZER_READ_LIST, vec![bytes.into()])
    }
}
