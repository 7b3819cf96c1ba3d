//! Adapter implementations of the port traits.
//!
//! `live` talks to the real world (system clock, UUIDs, the generative
//! API, the filesystem). `fixed` and `memory` are deterministic
//! substitutes used by tests and offline flows.

pub mod fixed;
pub mod live;
pub mod memory;
