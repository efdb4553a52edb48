//! RegistryService: student and course operations over a gateway session.

mod registry;
pub use registry::RegistryService;
