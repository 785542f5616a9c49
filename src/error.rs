//! Error types used by the subscription controller and resource handles.
//!
//! This module defines two main error enums:
//!
//! - [`SubscribeError`] — errors raised at the subscription boundary itself.
//! - [`AcquireError`] — errors raised by individual resource acquisitions.
//!
//! Both types provide an `as_label` helper returning a short stable
//! (snake_case) tag for logs and metrics.
//!
//! ## Propagation policy
//! - [`SubscribeError`] is the only error a caller ever sees; its variants are
//!   programming errors (unsupported kind) or misuse (subscribing after
//!   teardown). Fail fast, do not retry.
//! - [`AcquireError`] never crosses the controller boundary. Failed
//!   acquisitions are absorbed and surfaced as events only; the sole
//!   caller-visible signal is that `ready` never becomes `true`.

use thiserror::Error;

use crate::params::ResourceKind;

/// # Errors raised at the subscription boundary.
///
/// These represent misconfiguration or misuse of a subscription site, not
/// runtime conditions. None of them are recoverable by retrying.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscribeError {
    /// The resource kind tag did not parse to a known [`ResourceKind`].
    #[error("unknown resource kind tag: {0:?}")]
    UnknownKind(String),

    /// The kind is known but no constructor was registered for it.
    #[error("no constructor registered for resource kind: {0}")]
    UnregisteredKind(ResourceKind),

    /// The site has already been torn down and accepts no new parameters.
    #[error("subscription site already torn down")]
    TornDown,
}

impl SubscribeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use subvisor::SubscribeError;
    ///
    /// let err = SubscribeError::UnknownKind("docx".into());
    /// assert_eq!(err.as_label(), "unknown_kind");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscribeError::UnknownKind(_) => "unknown_kind",
            SubscribeError::UnregisteredKind(_) => "unregistered_kind",
            SubscribeError::TornDown => "torn_down",
        }
    }
}

/// # Errors produced by resource acquisition.
///
/// Returned by the future of an asynchronous
/// [`Resource::begin`](crate::resources::Resource::begin). The controller
/// absorbs these: a failure from a superseded initialization is usually a
/// symptom of rapid resubscription, not a real fault, so nothing propagates
/// to the caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The acquisition observed its own cancellation signal and bailed out.
    #[error("acquisition cancelled")]
    Cancelled,

    /// The acquisition failed for a reason of its own (I/O, permissions, ...).
    #[error("acquisition failed: {0}")]
    Failed(String),
}

impl AcquireError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AcquireError::Cancelled => "acquire_cancelled",
            AcquireError::Failed(_) => "acquire_failed",
        }
    }

    /// True if this error is the expected by-product of supersession.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AcquireError::Cancelled)
    }
}
