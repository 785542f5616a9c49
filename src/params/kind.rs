//! # Resource kind: the tagged variant the controller dispatches over.
//!
//! One subscription site serves exactly one [`ResourceKind`]. Kinds differ
//! along two axes the controller cares about:
//!
//! - **Synchronicity** — whether initialization completes inline or suspends.
//!   This axis is carried by the handle itself (see
//!   [`Acquisition`](crate::resources::Acquisition)), since it is a property
//!   of the implementation, fixed per kind but invisible to the enum.
//! - **Data exposure** — whether the kind hands data to the caller directly
//!   ([`exposes_data`](ResourceKind::exposes_data)) or projects it through the
//!   shared store, whose own reactivity notifies readers.
//!
//! ## Quick reference
//! | Kind         | tag           | exposes data | query family |
//! |--------------|---------------|--------------|--------------|
//! | `Local`      | `local`       | no           | no           |
//! | `Doc`        | `doc`         | yes          | no           |
//! | `Query`      | `query`       | yes          | yes          |
//! | `QueryExtra` | `query_extra` | yes          | yes          |
//! | `Value`      | `value`       | no           | no           |
//! | `Api`        | `api`         | no           | no           |

use std::fmt;
use std::str::FromStr;

use crate::error::SubscribeError;

/// The six subscribable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Local scratch state, private to the site.
    Local,
    /// A single document in the backing store.
    Doc,
    /// A record collection selected by a query.
    Query,
    /// A query that also exposes extra result metadata.
    QueryExtra,
    /// A computed value derived from other state.
    Value,
    /// The result of a remote procedure call.
    Api,
}

impl ResourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Local,
        ResourceKind::Doc,
        ResourceKind::Query,
        ResourceKind::QueryExtra,
        ResourceKind::Value,
        ResourceKind::Api,
    ];

    /// Returns the stable snake_case tag for this kind.
    #[inline]
    pub fn tag(self) -> &'static str {
        match self {
            ResourceKind::Local => "local",
            ResourceKind::Doc => "doc",
            ResourceKind::Query => "query",
            ResourceKind::QueryExtra => "query_extra",
            ResourceKind::Value => "value",
            ResourceKind::Api => "api",
        }
    }

    /// Parses a kind from its tag.
    ///
    /// An unknown tag is a configuration error: fail fast, nothing is
    /// constructed.
    ///
    /// # Example
    /// ```
    /// use subvisor::{ResourceKind, SubscribeError};
    ///
    /// assert_eq!(ResourceKind::from_tag("query"), Ok(ResourceKind::Query));
    /// assert_eq!(
    ///     ResourceKind::from_tag("spreadsheet"),
    ///     Err(SubscribeError::UnknownKind("spreadsheet".into())),
    /// );
    /// ```
    pub fn from_tag(tag: &str) -> Result<Self, SubscribeError> {
        match tag {
            "local" => Ok(ResourceKind::Local),
            "doc" => Ok(ResourceKind::Doc),
            "query" => Ok(ResourceKind::Query),
            "query_extra" => Ok(ResourceKind::QueryExtra),
            "value" => Ok(ResourceKind::Value),
            "api" => Ok(ResourceKind::Api),
            other => Err(SubscribeError::UnknownKind(other.to_string())),
        }
    }

    /// True if the kind hands data to the caller directly from the active
    /// handle. These kinds need an explicit re-render trigger on promotion.
    ///
    /// Store-observed kinds (`Local`, `Value`, `Api`) are read through the
    /// store's access primitive instead, and the store's own reactivity
    /// notifies readers.
    #[inline]
    pub fn exposes_data(self) -> bool {
        matches!(
            self,
            ResourceKind::Doc | ResourceKind::Query | ResourceKind::QueryExtra
        )
    }

    /// True for the query family, whose caller handle is scoped to the
    /// collection path derived from the parameters (so callers can mutate
    /// sibling records).
    #[inline]
    pub fn is_query_family(self) -> bool {
        matches!(self, ResourceKind::Query | ResourceKind::QueryExtra)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ResourceKind {
    type Err = SubscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::from_tag(s)
    }
}
