//! Analysis-time graph nodes and the inputs they are built from.
//!
//! Every node kind exposes its licenses through [`LicenseProvider`]. Leaf
//! nodes for source files ([`InputFileTarget`]) implement it trivially;
//! nodes higher in the graph combine the sets of their dependencies with
//! [`aggregate_licenses`], which wraps the dependency sets instead of
//! copying them.

mod input_file;

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use crate::target::input_file::InputFileTarget;

use crate::artifact::SourceArtifact;
use crate::collect::{Order, TransitiveSet, TransitiveSetBuilder};
use crate::core::ArcStr;
use crate::error::TransitiveSetError;
use crate::label::Label;
use crate::license::{License, TargetLicense};

/// Opaque identifier of a build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationKey(ArcStr);

impl ConfigurationKey {
    pub fn new(id: impl Into<ArcStr>) -> Self {
        Self(id.into())
    }
}

impl Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of the analysis that owns a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey {
    pub label: Label,
    pub configuration: Option<ConfigurationKey>,
}

impl OwnerKey {
    /// Owner for configuration-independent targets such as source files.
    pub fn unconfigured(label: Label) -> Self {
        Self {
            label,
            configuration: None,
        }
    }
}

impl Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.configuration {
            Some(configuration) => write!(f, "{} ({})", self.label, configuration),
            None => write!(f, "{} (null)", self.label),
        }
    }
}

/// Who may depend on a target. Resolved upstream, carried as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    #[default]
    Private,
    PackageGroups(Vec<Label>),
}

/// A source file as declared in package metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputFile {
    label: Label,
    license: License,
}

impl InputFile {
    pub fn new(label: Label, license: License) -> Self {
        Self { label, license }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// The declared license, [`License::no_license`] if none was declared.
    pub fn license(&self) -> &License {
        &self.license
    }
}

/// What the analysis engine hands to a node under construction.
#[derive(Debug, Clone)]
pub struct TargetContext<T = InputFile> {
    pub owner: OwnerKey,
    pub visibility: Visibility,
    pub target: Arc<T>,
}

impl<T> TargetContext<T> {
    pub fn new(owner: OwnerKey, visibility: Visibility, target: Arc<T>) -> Self {
        Self {
            owner,
            visibility,
            target,
        }
    }
}

/// License views shared by every node kind.
pub trait LicenseProvider {
    /// Licenses of this node and everything it depends on, in
    /// [`Order::Link`].
    fn transitive_licenses(&self) -> &TransitiveSet<TargetLicense>;

    /// License that applies to the node's build outputs, if it overrides the
    /// transitive ones.
    fn output_licenses(&self) -> Option<&TargetLicense>;

    fn has_output_licenses(&self) -> bool {
        self.output_licenses().is_some()
    }
}

/// Nodes that stand for a single file.
pub trait FileTarget {
    fn artifact(&self) -> &SourceArtifact;
}

/// Combines a node's own license with the sets of its dependencies.
///
/// Runs in time proportional to the number of dependencies. Unspecified
/// licenses are left out, dependency sets are linked, not copied.
pub fn aggregate_licenses<'a, P>(
    own: Option<TargetLicense>,
    deps: impl IntoIterator<Item = &'a P>,
) -> Result<TransitiveSet<TargetLicense>, TransitiveSetError>
where
    P: LicenseProvider + ?Sized + 'a,
{
    let mut builder = TransitiveSetBuilder::new(Order::Link);

    if let Some(own) = own.filter(|own| own.license.is_specified()) {
        builder = builder.add(own);
    }

    for dep in deps {
        builder = builder.add_transitive(dep.transitive_licenses().clone())?;
    }

    Ok(builder.build())
}
