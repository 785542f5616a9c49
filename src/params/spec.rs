//! # Canonical parameter descriptor.
//!
//! Defines [`ParamSpec`], the immutable bundle the controller compares to
//! detect parameter changes. Equality is **structural**: two descriptors with
//! the same kind and value-equal argument lists are the same subscription,
//! regardless of where their values came from.
//!
//! ## Rules
//! - Arguments are opaque [`serde_json::Value`]s in caller order.
//! - The descriptor never changes after construction; a changed argument list
//!   means a *new* descriptor.
//! - For query-family kinds, [`collection_path`](ParamSpec::collection_path)
//!   reinterprets the first argument as the store collection path. It returns
//!   `None` when the first argument is not a string — validating the shape of
//!   constructor arguments is the resource handle's job, not ours.

use serde_json::Value;

use crate::params::ResourceKind;

/// Canonical subscription parameters: resource kind + constructor arguments.
///
/// ## Example
/// ```
/// use serde_json::json;
/// use subvisor::{ParamSpec, ResourceKind};
///
/// let a = ParamSpec::new(ResourceKind::Query, vec![json!("threads"), json!({"status": "open"})]);
/// let b = ParamSpec::new(ResourceKind::Query, vec![json!("threads"), json!({"status": "open"})]);
/// let c = ParamSpec::new(ResourceKind::Query, vec![json!("threads"), json!({"status": "closed"})]);
///
/// assert_eq!(a, b); // structural equality, not identity
/// assert_ne!(a, c);
/// assert_eq!(a.collection_path(), Some("threads"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    kind: ResourceKind,
    args: Vec<Value>,
}

impl ParamSpec {
    /// Normalizes a kind and raw argument list into a descriptor.
    pub fn new(kind: ResourceKind, args: Vec<Value>) -> Self {
        Self { kind, args }
    }

    /// Returns the resource kind.
    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the constructor arguments in caller order.
    #[inline]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Reinterprets the first argument as a store collection path.
    ///
    /// Only meaningful for query-family kinds; returns `None` when the first
    /// argument is absent or not a string.
    pub fn collection_path(&self) -> Option<&str> {
        self.args.first().and_then(Value::as_str)
    }
}
