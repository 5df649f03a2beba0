//! Single-flight job dispatch.
//!
//! Contains the queue worker that drains submissions one at a time,
//! invoking the engine client and updating job records, plus the
//! cloneable handle the submission handler enqueues through.

pub mod processor;

pub use processor::{QueueHandle, QueueProcessor};
