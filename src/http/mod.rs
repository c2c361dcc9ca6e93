//! HTTP protocol layer module
//!
//! Header-level building blocks of the sender, decoupled from any transport.

pub mod accept;
pub mod conditional;
pub mod date;
pub mod etag;
pub mod sink;

pub use conditional::RequestHeaders;
pub use sink::{BufferedResponse, ResponseSink};
