//! Metadata persistence for documents and sessions

pub mod registry;

pub use registry::{DocumentRegistry, SessionRegistry};
