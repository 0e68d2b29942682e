#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod artifact;
pub mod collect;
mod core;
mod error;
mod label;
mod license;
#[cfg(feature = "logging")]
mod logging;
pub mod target;

pub use crate::artifact::SourceArtifact;
pub use crate::collect::{Order, TransitiveSet, TransitiveSetBuilder};
pub use crate::core::Hash32;
pub use crate::error::*;
pub use crate::label::Label;
pub use crate::license::{License, LicenseType, TargetLicense};
#[cfg(feature = "logging")]
pub use crate::logging::init_logging;
pub use crate::target::{
    ConfigurationKey, FileTarget, InputFile, InputFileTarget, LicenseProvider, OwnerKey,
    TargetContext, Visibility, aggregate_licenses,
};
