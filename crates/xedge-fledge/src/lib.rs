//! XEdge Fledge
//!
//! Import path for workflows held by a Fledge pipeline host. Fledge does not
//! answer in one canonical shape, so a response body is run through an
//! [`AdapterChain`] of [`ShapeAdapter`]s, each of which either produces a
//! canonical [`Graph`](xedge_workflow::Graph) or declines.
//!
//! The adapters are lossy and kept apart from `xedge_workflow::codec`, which
//! is the only conversion that has to round-trip.

mod adapter;
mod client;
mod error;

pub use adapter::{AdapterChain, ArrayShape, ElementsShape, KeyMapShape, NodesEdgesShape, ShapeAdapter};
pub use client::{DEFAULT_PATHS, DEFAULT_TIMEOUT, FledgeClient, FledgeConfig};
pub use error::FledgeError;
