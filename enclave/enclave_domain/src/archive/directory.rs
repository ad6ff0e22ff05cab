//! Exploded directory archives.

use std::path::{Component, Path, PathBuf};

use enclave_core::error::{ArchiveError, Result};
use enclave_core::{LoadedUnit, Resource, ResourceSource, Tier, TypeName};

use super::Archive;

/// A directory of resources.
///
/// Directories carry resources only (recipe descriptors, style files,
/// service manifests); they never define types.
pub struct DirectoryArchive {
    root: PathBuf,
    location: String,
}

impl DirectoryArchive {
    /// Open a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ArchiveError::Open {
                location: root,
                reason: "not a directory".to_string(),
            }
            .into());
        }
        let location = root.display().to_string();
        Ok(Self { root, location })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }
}

impl Archive for DirectoryArchive {
    fn location(&self) -> &str {
        &self.location
    }

    fn define(&self, _name: &TypeName) -> Option<LoadedUnit> {
        None
    }

    fn find_resource(&self, name: &str) -> Option<Resource> {
        self.resolve(name).map(|path| {
            Resource::new(
                name,
                Tier::Isolated,
                self.location.clone(),
                ResourceSource::File(path),
            )
        })
    }

    fn unit_names(&self) -> Vec<TypeName> {
        Vec::new()
    }

    fn resource_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect(&self.root, &self.root, &mut names);
        names.sort();
        names
    }
}

fn collect(root: &Path, dir: &Path, names: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, names);
        } else if let Ok(relative) = path.strip_prefix(root) {
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            names.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("META-INF/rewrite")).unwrap();
        std::fs::write(dir.path().join("META-INF/rewrite/style.yml"), "s").unwrap();
        std::fs::write(dir.path().join("top.txt"), "t").unwrap();

        let archive = DirectoryArchive::open(dir.path()).unwrap();
        let res = archive.find_resource("META-INF/rewrite/style.yml").unwrap();
        assert_eq!(res.read().unwrap(), b"s");
        assert_eq!(
            archive.resource_names(),
            vec!["META-INF/rewrite/style.yml", "top.txt"]
        );
        assert!(archive.unit_names().is_empty());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let archive = DirectoryArchive::open(dir.path()).unwrap();
        assert!(archive.find_resource("../etc/passwd").is_none());
        assert!(archive.find_resource("/etc/passwd").is_none());
    }

    #[test]
    fn test_open_missing() {
        assert!(DirectoryArchive::open("/nonexistent/enclave/dir").is_err());
    }
}
