//! Header field storage and the incremental field-line parser
//!
//! `Headers` backs both sides of a connection: the request parser fills one
//! from inbound field lines, and handlers build one to hand to the response
//! writer. Lookups are case-insensitive in both roles; the spelling used on
//! the wire is whatever was stored.
use std::collections::HashMap;
use std::collections::hash_map;
use std::str;

use error::ParseError;


/// A set of header fields with case-insensitive names.
#[derive(Debug, Clone)]
pub struct Headers {
    fields: HashMap<String, Field>,
}

#[derive(Debug, Clone)]
struct Field {
    /// Spelling emitted on the wire. Parsed fields store the lowercased
    /// name; fields built with `set` keep the caller's capitalization.
    name: String,
    value: String,
}

/// Iterator over `(name, value)` pairs of a `Headers`.
///
/// Order is not specified and must not be relied upon.
pub struct Iter<'a>(hash_map::Values<'a, String, Field>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);
    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        self.0.next().map(|f| (&f.name[..], &f.value[..]))
    }
}

fn is_token_char(c: u8) -> bool {
    match c {
        b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => true,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' |
        b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => true,
        _ => false,
    }
}

/// Strips leading and trailing ASCII space and horizontal tab.
fn trim_ows(mut bytes: &[u8]) -> &[u8] {
    while let Some(&c) = bytes.first() {
        if c == b' ' || c == b'\t' { bytes = &bytes[1..]; } else { break; }
    }
    while let Some(&c) = bytes.last() {
        let len = bytes.len();
        if c == b' ' || c == b'\t' { bytes = &bytes[..len-1]; } else { break; }
    }
    bytes
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|pair| pair == b"\r\n")
}

impl Headers {
    pub fn new() -> Headers {
        Headers {
            fields: HashMap::new(),
        }
    }

    /// Add a field, merging with any field of the same name.
    ///
    /// The name is matched case-insensitively; a repeated name appends the
    /// new value to the existing one with a `", "` separator, the way
    /// list-valued request headers combine.
    pub fn add(&mut self, name: &str, value: &str) {
        match self.fields.entry(name.to_ascii_lowercase()) {
            hash_map::Entry::Occupied(mut entry) => {
                let field = entry.get_mut();
                field.value.push_str(", ");
                field.value.push_str(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(Field {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    /// Set a field, replacing any previous value regardless of case.
    ///
    /// The given spelling of the name is kept and later emitted verbatim.
    pub fn set(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_ascii_lowercase(), Field {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase())
            .map(|f| &f.value[..])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> Iter {
        Iter(self.fields.values())
    }

    /// Set a `Date` field with the current time in IMF-fixdate format.
    #[cfg(feature="date_header")]
    pub fn set_date(&mut self) {
        use std::time::SystemTime;
        self.set("Date", &::httpdate::fmt_http_date(SystemTime::now()));
    }

    /// Consume at most one field line from `data`.
    ///
    /// Returns `(bytes_consumed, done)`. Zero bytes consumed means a full
    /// line has not arrived yet and the caller should read more; `done`
    /// is only ever true when `data` starts with the block-terminating
    /// CRLF, which is then the two bytes consumed.
    ///
    /// The field name must not have whitespace before the colon, and after
    /// trimming may contain only token characters. Name and value are
    /// trimmed of surrounding spaces and tabs; the name is lowercased
    /// before insertion.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let end = match find_crlf(data) {
            Some(end) => end,
            None => return Ok((0, false)),
        };
        if end == 0 {
            return Ok((2, true));
        }
        let line = &data[..end];
        let colon = match line.iter().position(|&c| c == b':') {
            Some(colon) => colon,
            None => return Err(ParseError::MalformedHeader),
        };
        let raw_name = &line[..colon];
        if raw_name.ends_with(b" ") {
            return Err(ParseError::MalformedHeader);
        }
        let name = trim_ows(raw_name);
        if !name.iter().all(|&c| is_token_char(c)) {
            return Err(ParseError::InvalidNameCharacter);
        }
        let name = str::from_utf8(name)
            .map_err(|_| ParseError::InvalidNameCharacter)?;
        let value = str::from_utf8(trim_ows(&line[colon+1..]))
            .map_err(|_| ParseError::MalformedHeader)?;
        self.add(&name.to_ascii_lowercase(), value);
        Ok((line.len() + 2, false))
    }
}

#[cfg(test)]
mod test {
    use super::Headers;
    use error::ParseError;

    #[test]
    fn valid_single_field() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"Host: localhost:42069\r\n\r\n")
            .unwrap();
        assert_eq!(n, 23);
        assert!(!done);
        assert_eq!(headers.get("host"), Some("localhost:42069"));
    }

    #[test]
    fn space_before_colon_is_rejected() {
        let mut headers = Headers::new();
        let err = headers.parse(b"       Host : localhost:42069       \r\n\r\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let mut headers = Headers::new();
        let (n, done) = headers
            .parse(b"       Host: localhost:42069       \r\n\r\n")
            .unwrap();
        assert_eq!(n, 37);
        assert!(!done);
        assert_eq!(headers.get("host"), Some("localhost:42069"));
    }

    #[test]
    fn fields_accumulate_across_calls() {
        let mut headers = Headers::new();
        headers.parse(b"Host: localhost:42069\r\n").unwrap();
        let (_, done) = headers.parse(b"Accept: */*\r\n\r\n").unwrap();
        assert!(!done);
        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(headers.get("accept"), Some("*/*"));
    }

    #[test]
    fn leading_crlf_terminates_the_block() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"\r\nGET / HTTP/1.1\r\n").unwrap();
        assert_eq!(n, 2);
        assert!(done);
        assert!(headers.is_empty());
    }

    #[test]
    fn partial_line_consumes_nothing() {
        let mut headers = Headers::new();
        let (n, done) = headers.parse(b"Host: localhost").unwrap();
        assert_eq!(n, 0);
        assert!(!done);
        assert!(headers.is_empty());
    }

    #[test]
    fn missing_colon_is_rejected() {
        let mut headers = Headers::new();
        let err = headers.parse(b"Host localhost:42069\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedHeader));
    }

    #[test]
    fn invalid_name_character_is_rejected() {
        let mut headers = Headers::new();
        let err = headers.parse(b"H@st: localhost:42069\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNameCharacter));
    }

    #[test]
    fn names_are_lowercased_on_insert() {
        let mut headers = Headers::new();
        headers.parse(b"HOST: localhost:42069\r\n").unwrap();
        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(headers.get("Host"), Some("localhost:42069"));
        assert_eq!(headers.get("HOST"), Some("localhost:42069"));
    }

    #[test]
    fn duplicate_names_merge_with_comma_space() {
        let mut headers = Headers::new();
        headers.parse(b"Set-Person: lane-loves-go\r\n").unwrap();
        headers.parse(b"Set-Person: prime-loves-zig\r\n").unwrap();
        headers.parse(b"SET-PERSON: tj-loves-ocaml\r\n").unwrap();
        assert_eq!(headers.get("set-person"),
            Some("lane-loves-go, prime-loves-zig, tj-loves-ocaml"));
    }

    #[test]
    fn empty_value_is_kept() {
        let mut headers = Headers::new();
        headers.parse(b"X-Empty:\r\n").unwrap();
        assert_eq!(headers.get("x-empty"), Some(""));
    }

    #[test]
    fn inner_whitespace_is_preserved() {
        let mut headers = Headers::new();
        headers.parse(b"User-Agent:   curl  7.81   final  \r\n").unwrap();
        assert_eq!(headers.get("user-agent"), Some("curl  7.81   final"));
    }

    #[test]
    fn every_token_special_is_allowed() {
        let mut headers = Headers::new();
        headers.parse(b"x!#$%&'*+-.^_`|~9: ok\r\n").unwrap();
        assert_eq!(headers.get("x!#$%&'*+-.^_`|~9"), Some("ok"));
    }

    #[test]
    fn set_overwrites_regardless_of_case() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");
        headers.set("content-type", "text/html");
        assert_eq!(headers.get("Content-Type"), Some("text/html"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn set_keeps_wire_spelling() {
        let mut headers = Headers::new();
        headers.set("Content-Length", "13");
        let fields: Vec<_> = headers.iter().collect();
        assert_eq!(fields, vec![("Content-Length", "13")]);
    }
}
