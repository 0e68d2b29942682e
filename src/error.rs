use thiserror::Error;

use crate::collect::Order;
use crate::label::Label;

#[derive(Debug, Error)]
pub enum KasaneError {
    #[error(transparent)]
    Set(#[from] TransitiveSetError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    License(#[from] LicenseError),
}

/// Raised while constructing a [`TransitiveSet`](crate::TransitiveSet).
/// Both variants indicate a bug in the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitiveSetError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot merge a set with order '{found}' into a set with order '{expected}'")]
    OrderMismatch { expected: Order, found: Order },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Precondition violated for '{label}': {reason}")]
    PreconditionViolation { label: Label, reason: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("Label '{0}' must start with '//'")]
    MissingRoot(String),

    #[error("Label '{0}' has an empty target name")]
    EmptyName(String),

    #[error("Label '{0}' contains an invalid character '{1}'")]
    InvalidChar(String, char),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LicenseError {
    #[error("Unknown license type '{0}'")]
    UnknownType(String),

    #[error("Invalid license exception:\n{0}")]
    Exception(#[from] LabelError),
}
