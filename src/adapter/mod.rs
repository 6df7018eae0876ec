//! Adapters between external data and the domain.

pub mod inbound;
pub mod snapshot;
