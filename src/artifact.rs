use std::fmt::{self, Display};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Handle to a source file, as resolved by the artifact factory.
///
/// `root` is the source root the file lives under, `exec_path` is the path
/// relative to it. Two artifacts are the same file iff both parts match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceArtifact {
    root: Utf8PathBuf,
    exec_path: Utf8PathBuf,
}

impl SourceArtifact {
    pub fn new(root: impl Into<Utf8PathBuf>, exec_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            exec_path: exec_path.into(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn exec_path(&self) -> &Utf8Path {
        &self.exec_path
    }

    /// Full path of the file on disk.
    pub fn path(&self) -> Utf8PathBuf {
        self.root.join(&self.exec_path)
    }

    pub fn filename(&self) -> Option<&str> {
        self.exec_path.file_name()
    }
}

impl Display for SourceArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.exec_path, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_joins_root() {
        let artifact = SourceArtifact::new("/workspace", "pkg/file.txt");
        assert_eq!(artifact.path(), Utf8PathBuf::from("/workspace/pkg/file.txt"));
        assert_eq!(artifact.filename(), Some("file.txt"));
        assert_eq!(artifact.to_string(), "pkg/file.txt [/workspace]");
    }

    #[test]
    fn test_identity_includes_root() {
        let a = SourceArtifact::new("/a", "pkg/file.txt");
        let b = SourceArtifact::new("/b", "pkg/file.txt");
        assert_ne!(a, b);
        assert_eq!(a, SourceArtifact::new("/a", "pkg/file.txt"));
    }
}
