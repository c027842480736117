/// Transport module
///
/// Reads queries from a line stream and writes results back,
/// either as JSON objects or as plain text for humans.

pub mod protocol;
pub mod server;

pub use protocol::{ErrorResponse, Request, Response};
pub use server::Server;
