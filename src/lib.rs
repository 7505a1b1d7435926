//! A small HTTP/1.1 server speaking directly over TCP
//!
//! The crate has two halves: an incremental request parser that tolerates
//! any fragmentation of the inbound byte stream, and a response writer that
//! enforces the status -> headers -> body ordering of the wire format.
//! Connections serve one request each and are closed afterwards
//! (`Connection: close` is assumed throughout).
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate log;
extern crate netbuf;
#[cfg(feature="date_header")] extern crate httpdate;

pub mod headers;
pub mod request;
pub mod response;
pub mod server;
mod enums;
mod error;

pub use enums::{Version, Status};
pub use error::{ParseError, WriteError};
pub use headers::Headers;
pub use request::Request;
pub use response::ResponseWriter;
pub use server::{Server, Config, Handler};
