//! Request extractors that reject with the service's JSON error body.

mod body;
mod id;

pub use body::JsonBody;
pub use id::{EntityId, INVALID_ID};
