use std::fmt::{self, Display};
use std::sync::Arc;

use crate::artifact::SourceArtifact;
use crate::collect::{Order, TransitiveSet};
use crate::error::TargetError;
use crate::label::Label;
use crate::license::{License, TargetLicense};
use crate::target::{
    ConfigurationKey, FileTarget, InputFile, LicenseProvider, OwnerKey, TargetContext, Visibility,
};

/// Analyzed node for a source file.
///
/// All analyses of the same source file are equivalent, so the node never
/// carries a configuration. Its license set holds at most the file's own
/// declared license and is never built from dependencies, since a source
/// file has none.
#[derive(Debug, Clone)]
pub struct InputFileTarget {
    label: Label,
    owner: OwnerKey,
    visibility: Visibility,
    artifact: SourceArtifact,
    licenses: TransitiveSet<TargetLicense>,
}

impl InputFileTarget {
    /// Fails with [`TargetError::PreconditionViolation`] if the owner carries
    /// a configuration or if `input_file` is not the very target `context`
    /// was created for.
    pub fn new(
        context: &TargetContext<InputFile>,
        input_file: &Arc<InputFile>,
        artifact: SourceArtifact,
    ) -> Result<Self, TargetError> {
        let label = input_file.label().clone();

        if context.owner.configuration.is_some() {
            return Err(violation(label, "source files must not be configured"));
        }
        if !Arc::ptr_eq(&context.target, input_file) {
            return Err(violation(label, "context was created for a different target"));
        }

        tracing::debug!(label = %label, artifact = %artifact, "analyzed input file target");

        Ok(Self {
            licenses: make_licenses(input_file),
            label,
            owner: context.owner.clone(),
            visibility: context.visibility.clone(),
            artifact,
        })
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Always `None`.
    pub fn configuration_key(&self) -> Option<&ConfigurationKey> {
        None
    }

    pub fn source_artifact(&self) -> &SourceArtifact {
        &self.artifact
    }

    /// Representation shown to build-file code.
    pub fn repr(&self) -> String {
        format!("<input file target {}>", self.label)
    }
}

fn violation(label: Label, reason: &'static str) -> TargetError {
    tracing::debug!(label = %label, reason, "rejected input file target");
    TargetError::PreconditionViolation { label, reason }
}

fn make_licenses(input_file: &InputFile) -> TransitiveSet<TargetLicense> {
    let license = input_file.license();

    if *license == License::no_license() {
        return TransitiveSet::empty(Order::Link);
    }

    TransitiveSet::of(
        Order::Link,
        [TargetLicense::new(input_file.label().clone(), license.clone())],
    )
}

impl LicenseProvider for InputFileTarget {
    fn transitive_licenses(&self) -> &TransitiveSet<TargetLicense> {
        &self.licenses
    }

    fn output_licenses(&self) -> Option<&TargetLicense> {
        None
    }

    fn has_output_licenses(&self) -> bool {
        false
    }
}

impl FileTarget for InputFileTarget {
    fn artifact(&self) -> &SourceArtifact {
        &self.artifact
    }
}

impl Display for InputFileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputFileTarget({})", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> Label {
        "//pkg:file".parse().unwrap()
    }

    fn artifact() -> SourceArtifact {
        SourceArtifact::new("/workspace", "pkg/file")
    }

    fn context_for(file: &Arc<InputFile>) -> TargetContext {
        TargetContext::new(
            OwnerKey::unconfigured(file.label().clone()),
            Visibility::Public,
            file.clone(),
        )
    }

    #[test]
    fn test_no_license() {
        let file = Arc::new(InputFile::new(label(), License::no_license()));
        let target = InputFileTarget::new(&context_for(&file), &file, artifact()).unwrap();

        assert!(target.transitive_licenses().is_empty());
        assert_eq!(target.transitive_licenses().order(), Order::Link);
        assert!(!target.has_output_licenses());
        assert!(target.output_licenses().is_none());
    }

    #[test]
    fn test_with_license() {
        let license = License::parse(["notice"]).unwrap();
        let file = Arc::new(InputFile::new(label(), license.clone()));
        let target = InputFileTarget::new(&context_for(&file), &file, artifact()).unwrap();

        assert_eq!(
            target.transitive_licenses().flatten(),
            &[TargetLicense::new(label(), license)]
        );
        assert!(target.transitive_licenses().is_singleton());
        assert!(!target.has_output_licenses());
        assert!(target.output_licenses().is_none());
    }

    #[test]
    fn test_accessors() {
        let file = Arc::new(InputFile::new(label(), License::no_license()));
        let context = TargetContext::new(
            OwnerKey::unconfigured(label()),
            Visibility::PackageGroups(vec!["//visibility:friends".parse().unwrap()]),
            file.clone(),
        );
        let target = InputFileTarget::new(&context, &file, artifact()).unwrap();

        assert_eq!(target.artifact(), &artifact());
        assert_eq!(target.source_artifact(), &artifact());
        assert_eq!(target.label(), &label());
        assert_eq!(target.owner(), &context.owner);
        assert_eq!(target.visibility(), &context.visibility);
        assert!(target.configuration_key().is_none());
        assert_eq!(target.to_string(), "InputFileTarget(//pkg:file)");
        assert_eq!(target.repr(), "<input file target //pkg:file>");
    }

    #[test]
    fn test_rejects_configuration() {
        let file = Arc::new(InputFile::new(label(), License::no_license()));
        let owner = OwnerKey {
            label: label(),
            configuration: Some(ConfigurationKey::new("k8-fastbuild")),
        };
        let context = TargetContext::new(owner, Visibility::Public, file.clone());

        let result = InputFileTarget::new(&context, &file, artifact());
        assert!(matches!(
            result,
            Err(TargetError::PreconditionViolation { ref label, .. }) if label.to_string() == "//pkg:file"
        ));
    }

    #[test]
    fn test_rejects_equal_but_distinct_target() {
        let file = Arc::new(InputFile::new(label(), License::no_license()));
        let twin = Arc::new(InputFile::new(label(), License::no_license()));
        assert_eq!(file, twin);

        let result = InputFileTarget::new(&context_for(&file), &twin, artifact());
        assert!(matches!(
            result,
            Err(TargetError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_rejects_other_target() {
        let file = Arc::new(InputFile::new(label(), License::no_license()));
        let other = Arc::new(InputFile::new(
            "//pkg:other".parse().unwrap(),
            License::no_license(),
        ));

        let result = InputFileTarget::new(&context_for(&file), &other, artifact());
        assert!(result.is_err());
    }

    #[test]
    fn test_license_set_can_be_shared_upward() {
        let license = License::parse(["restricted"]).unwrap();
        let file = Arc::new(InputFile::new(label(), license));
        let target = InputFileTarget::new(&context_for(&file), &file, artifact()).unwrap();

        let parent = TransitiveSet::merge(
            Order::Link,
            [],
            [target.transitive_licenses().clone()],
        )
        .unwrap();

        assert_eq!(&parent, target.transitive_licenses());
        assert!(parent.children()[0].ptr_eq(target.transitive_licenses()));
    }
}
