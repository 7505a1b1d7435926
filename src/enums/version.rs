use std::fmt;

/// Enum representing the HTTP version of a request.
///
/// Only 1.1 is spoken here; requests carrying anything else are rejected
/// during parsing, so the enum has a single variant.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum Version {
    /// Version 1.1 of the HTTP protocol
    Http11,
}

impl Version {
    /// The dotted-version part, without the `HTTP/` prefix.
    pub fn number(&self) -> &'static str {
        match *self {
            Version::Http11 => "1.1",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Version::Http11 => f.write_str("HTTP/1.1"),
        }
    }
}
