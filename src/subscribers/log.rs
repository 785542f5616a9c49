//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [slot-allocated] slot=01J...
//! [started] slot=01J... kind=query
//! [ready] slot=01J... kind=query init=1
//! [superseded] slot=01J... kind=query
//! [abandoned] slot=01J... kind=query reason="connection reset"
//! [failed] slot=01J... kind=doc reason="permission denied"
//! [destroyed] slot=01J... kind=query
//! [torn-down] slot=01J...
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use — implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Default)]
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let slot = e.slot.as_deref().unwrap_or("?");
        let kind = e.resource.map(|k| k.tag()).unwrap_or("?");
        match e.kind {
            EventKind::SlotAllocated => {
                println!("[slot-allocated] slot={slot}");
            }
            EventKind::SlotReleased => {
                println!("[slot-released] slot={slot}");
            }
            EventKind::AcquireStarted => {
                println!("[started] slot={slot} kind={kind}");
            }
            EventKind::AcquireReady => {
                println!(
                    "[ready] slot={slot} kind={kind} init={}",
                    e.init_count.unwrap_or(0)
                );
            }
            EventKind::AcquireSuperseded => {
                println!("[superseded] slot={slot} kind={kind}");
            }
            EventKind::AcquireAbandoned => {
                println!(
                    "[abandoned] slot={slot} kind={kind} reason={:?}",
                    e.reason.as_deref().unwrap_or("superseded")
                );
            }
            EventKind::AcquireFailed => {
                println!(
                    "[failed] slot={slot} kind={kind} reason={:?}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::HandleDestroyed => {
                println!("[destroyed] slot={slot} kind={kind}");
            }
            EventKind::SiteTornDown => {
                println!("[torn-down] slot={slot}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
