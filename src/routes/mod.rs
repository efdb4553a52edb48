//! Route tables: registry endpoints and operational probes.

mod common;
mod registry;

pub use common::common_routes_with_ready;
pub use registry::registry_routes;
