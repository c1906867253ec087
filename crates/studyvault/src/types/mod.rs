//! Core types for documents, sessions, and API payloads

pub mod document;
pub mod query;
pub mod response;
pub mod session;

pub use document::{Document, FileType};
pub use session::{Message, Role, Session};
