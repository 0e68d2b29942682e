//! Compliance metadata attached to targets.
//!
//! A [`License`] is what a package declares for its targets, a
//! [`TargetLicense`] pins it to the target it was declared on. Transitive
//! sets of `TargetLicense` are what flows upward through the graph.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LicenseError;
use crate::label::Label;

/// Restriction tag of a license. Variants are ordered strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    ByExceptionOnly,
    Restricted,
    Reciprocal,
    Notice,
    Permissive,
    Unencumbered,
    None,
}

impl LicenseType {
    pub fn as_str(self) -> &'static str {
        match self {
            LicenseType::ByExceptionOnly => "by_exception_only",
            LicenseType::Restricted => "restricted",
            LicenseType::Reciprocal => "reciprocal",
            LicenseType::Notice => "notice",
            LicenseType::Permissive => "permissive",
            LicenseType::Unencumbered => "unencumbered",
            LicenseType::None => "none",
        }
    }
}

impl FromStr for LicenseType {
    type Err = LicenseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "by_exception_only" => Ok(LicenseType::ByExceptionOnly),
            "restricted" => Ok(LicenseType::Restricted),
            "reciprocal" => Ok(LicenseType::Reciprocal),
            "notice" => Ok(LicenseType::Notice),
            "permissive" => Ok(LicenseType::Permissive),
            "unencumbered" => Ok(LicenseType::Unencumbered),
            "none" => Ok(LicenseType::None),
            _ => Err(LicenseError::UnknownType(text.to_string())),
        }
    }
}

impl Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restriction tags plus the labels exempted from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct License {
    restrictions: BTreeSet<LicenseType>,
    exceptions: BTreeSet<Label>,
}

impl License {
    pub fn new(
        restrictions: impl IntoIterator<Item = LicenseType>,
        exceptions: impl IntoIterator<Item = Label>,
    ) -> Self {
        let restrictions: BTreeSet<_> = restrictions.into_iter().collect();
        let exceptions: BTreeSet<_> = exceptions.into_iter().collect();

        if restrictions.is_empty() && exceptions.is_empty() {
            return Self::no_license();
        }

        Self {
            restrictions,
            exceptions,
        }
    }

    /// The "no license" sentinel.
    pub fn no_license() -> Self {
        Self {
            restrictions: BTreeSet::from([LicenseType::None]),
            exceptions: BTreeSet::new(),
        }
    }

    /// Parses the strings of a `licenses([...])` package declaration.
    ///
    /// Each entry is either a license type name or `exception=<label>`.
    pub fn parse<I, S>(entries: I) -> Result<Self, LicenseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut restrictions = BTreeSet::new();
        let mut exceptions = BTreeSet::new();

        for entry in entries {
            let entry = entry.as_ref().trim();
            match entry.strip_prefix("exception=") {
                Some(label) => {
                    exceptions.insert(label.parse::<Label>()?);
                }
                None => {
                    restrictions.insert(entry.parse::<LicenseType>()?);
                }
            }
        }

        Ok(Self::new(restrictions, exceptions))
    }

    pub fn restrictions(&self) -> &BTreeSet<LicenseType> {
        &self.restrictions
    }

    pub fn exceptions(&self) -> &BTreeSet<Label> {
        &self.exceptions
    }

    /// False only for [`License::no_license`].
    pub fn is_specified(&self) -> bool {
        *self != Self::no_license()
    }

    /// The strictest restriction tag carried by this license.
    pub fn strictest(&self) -> LicenseType {
        self.restrictions
            .first()
            .copied()
            .unwrap_or(LicenseType::None)
    }
}

impl Default for License {
    fn default() -> Self {
        Self::no_license()
    }
}

impl Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<_> = self.restrictions.iter().map(|t| t.as_str()).collect();
        write!(f, "[{}]", types.join(", "))?;

        if !self.exceptions.is_empty() {
            let labels: Vec<_> = self.exceptions.iter().map(ToString::to_string).collect();
            write!(f, " with exceptions [{}]", labels.join(", "))?;
        }

        Ok(())
    }
}

/// A license together with the target that declared it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetLicense {
    pub label: Label,
    pub license: License,
}

impl TargetLicense {
    pub fn new(label: Label, license: License) -> Self {
        Self { label, license }
    }
}

impl Display for TargetLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.license)
    }
}
