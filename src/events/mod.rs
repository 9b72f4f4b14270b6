//! Event system for the ad runtime
//!
//! The event system provides:
//! - The closed set of recognized event names
//! - Typed event payloads broadcast to creative listeners
//! - A registry with ordered, identity-deduplicated listener sets and
//!   per-listener fault isolation

pub mod event;
pub mod registry;

pub use event::{AdEvent, EventName};
pub use registry::{EventRegistry, Listener, ListenerCallback};
