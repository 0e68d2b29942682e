//! Shared, immutable aggregation of values across the build graph.
//!
//! A [`TransitiveSet`] is a DAG of reference-counted nodes. Each node holds
//! the elements contributed directly at that point of the graph and pointers
//! to the sets of its dependencies. Combining sets is therefore a matter of
//! wrapping pointers: a target with ten thousand transitive dependencies
//! builds its own set in time proportional to its *direct* dependencies.
//!
//! The cost is deferred to [`TransitiveSet::flatten`], which walks the DAG
//! once per instance and memoizes the result. The walk is governed by an
//! [`Order`], which decides where an element lands in the flat sequence and
//! whether duplicates are dropped.
//!
//! ```
//! use kasane::{Order, TransitiveSet};
//!
//! let dep_a = TransitiveSet::of(Order::Link, ["a", "shared"]);
//! let dep_b = TransitiveSet::of(Order::Link, ["b", "shared"]);
//! let top = TransitiveSet::merge(Order::Link, ["top"], [dep_a, dep_b]).unwrap();
//!
//! assert_eq!(top.flatten(), &["top", "a", "shared", "b"]);
//! ```

mod builder;
mod set;
mod walk;

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use crate::collect::builder::TransitiveSetBuilder;
pub use crate::collect::set::TransitiveSet;
use crate::error::TransitiveSetError;

/// Flattening discipline of a [`TransitiveSet`].
///
/// | Order       | Walk                                    | Duplicates |
/// |-------------|-----------------------------------------|------------|
/// | `Stable`    | own elements, then children             | removed    |
/// | `Compile`   | children left to right, then own        | removed    |
/// | `Link`      | own elements, then children             | removed    |
/// | `NaiveLink` | own elements, then children             | kept       |
///
/// When duplicates are removed, the first occurrence in the walk wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Any deterministic order. Callers must not rely on the exact sequence.
    #[serde(rename = "default")]
    Stable,
    /// Dependencies precede their dependents.
    #[serde(rename = "postorder")]
    Compile,
    /// A target's own contribution precedes the transitive one.
    #[serde(rename = "topological")]
    Link,
    /// Like `Link`, without removing duplicates.
    #[serde(rename = "preorder")]
    NaiveLink,
}

impl Order {
    pub const ALL: [Order; 4] = [Order::Stable, Order::Compile, Order::Link, Order::NaiveLink];

    /// Name used by build files and serialized output.
    pub fn name(self) -> &'static str {
        match self {
            Order::Stable => "default",
            Order::Compile => "postorder",
            Order::Link => "topological",
            Order::NaiveLink => "preorder",
        }
    }

    /// Whether flattening keeps only the first occurrence of each element.
    pub fn dedups(self) -> bool {
        !matches!(self, Order::NaiveLink)
    }
}

impl FromStr for Order {
    type Err = TransitiveSetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "default" | "stable" => Ok(Order::Stable),
            "postorder" | "compile" => Ok(Order::Compile),
            "topological" | "link" => Ok(Order::Link),
            "preorder" | "naive_link" => Ok(Order::NaiveLink),
            "" => Err(TransitiveSetError::InvalidArgument(
                "order must be specified".into(),
            )),
            other => Err(TransitiveSetError::InvalidArgument(format!(
                "unknown order '{other}'"
            ))),
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for order in Order::ALL {
            assert_eq!(order.name().parse::<Order>(), Ok(order));
        }
        assert_eq!("naive_link".parse::<Order>(), Ok(Order::NaiveLink));
    }

    #[test]
    fn test_parse_unspecified() {
        assert!(matches!(
            "".parse::<Order>(),
            Err(TransitiveSetError::InvalidArgument(_))
        ));
        assert!(matches!(
            "sideways".parse::<Order>(),
            Err(TransitiveSetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_only_naive_link_keeps_duplicates() {
        let keeping: Vec<_> = Order::ALL.into_iter().filter(|o| !o.dedups()).collect();
        assert_eq!(keeping, vec![Order::NaiveLink]);
    }
}
