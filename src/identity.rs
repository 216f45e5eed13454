//! Application reference generation.
//!
//! Injected into the dialog service rather than reached for as a
//! process-wide singleton, so tests can pin the reference.

use uuid::Uuid;

pub trait RefProvider: Send + Sync {
    fn next_ref(&self) -> String;
}

/// Random v4 UUIDs, the production provider.
pub struct UuidRef;

impl RefProvider for UuidRef {
    fn next_ref(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
