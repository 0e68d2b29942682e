use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ArcStr;
use crate::error::LabelError;

/// Identifier of a target in the build graph, written as `//package:name`.
///
/// The core never looks inside a label beyond equality and hashing, the
/// parser only exists so that callers and tests can write labels as text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    package: ArcStr,
    name: ArcStr,
}

impl Label {
    pub fn new(package: &str, name: &str) -> Result<Self, LabelError> {
        Self::from_str(&format!("//{package}:{name}"))
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rest = text
            .strip_prefix("//")
            .ok_or_else(|| LabelError::MissingRoot(text.to_string()))?;

        if let Some(c) = rest.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(LabelError::InvalidChar(text.to_string(), c));
        }

        let (package, name) = match rest.split_once(':') {
            Some((package, name)) => (package, name),
            // `//foo/bar` is shorthand for `//foo/bar:bar`
            None => (rest, rest.rsplit('/').next().unwrap_or_default()),
        };

        if name.is_empty() {
            return Err(LabelError::EmptyName(text.to_string()));
        }
        if name.contains(':') {
            return Err(LabelError::InvalidChar(text.to_string(), ':'));
        }

        Ok(Self {
            package: package.into(),
            name: name.into(),
        })
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(value: Label) -> Self {
        value.to_string()
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}:{}", self.package, self.name)
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label({self})")
    }
}
