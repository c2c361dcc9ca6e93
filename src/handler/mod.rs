//! Request handler module
//!
//! Maps requests onto files below the document root and serves them through
//! the resource sender.

mod response;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
