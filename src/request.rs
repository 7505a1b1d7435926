//! Incremental request parsing
//!
//! The parser consumes the inbound byte stream in whatever pieces the
//! transport delivers and materializes a `Request` once the request line,
//! header block and declared body have all arrived. It never looks ahead of
//! what it needs: bytes after a complete request are left unread.
use std::io::Read;
use std::str;

use netbuf::Buf;

use enums::Version;
use error::ParseError;
use headers::Headers;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for the request line and its CRLF.
    RequestLine,
    /// Consuming header field lines up to the terminating CRLF.
    Headers,
    /// Accumulating exactly `Content-Length` body bytes.
    Body,
    /// Fully parsed; no further bytes are consumed.
    Done,
}

/// A parsed HTTP/1.1 request.
#[derive(Debug)]
pub struct Request {
    method: String,
    target: String,
    version: Version,
    headers: Headers,
    body: Vec<u8>,
    content_length: Option<usize>,
    state: State,
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|pair| pair == b"\r\n")
}

impl Request {
    /// Creates an empty request ready to consume bytes.
    pub fn new() -> Request {
        Request {
            method: String::new(),
            target: String::new(),
            version: Version::Http11,
            headers: Headers::new(),
            body: Vec::new(),
            content_length: None,
            state: State::RequestLine,
        }
    }

    /// Reads one full request from `stream`.
    ///
    /// The stream may deliver data in arbitrarily small pieces; the parsed
    /// request is identical under every fragmentation, down to one byte per
    /// read. EOF before the request is complete is an error: `ShortBody`
    /// when a declared body was cut off, `IncompleteRequest` otherwise.
    pub fn from_reader<R: Read>(stream: &mut R) -> Result<Request, ParseError> {
        let mut buf = Buf::new();
        let mut request = Request::new();
        loop {
            let bytes = buf.read_from(stream)?;
            let consumed = request.parse(&buf[..])?;
            buf.consume(consumed);
            if request.state == State::Done {
                return Ok(request);
            }
            if bytes == 0 {
                return Err(match request.state {
                    State::Body => ParseError::ShortBody,
                    _ => ParseError::IncompleteRequest,
                });
            }
        }
    }

    /// Consume as much of `data` as the current state allows.
    ///
    /// Returns the number of bytes consumed, which may be zero when more
    /// data is needed. The method is re-entrant: callers keep the
    /// unconsumed tail and pass it back in, extended, on the next call.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.state == State::Done {
            if data.is_empty() {
                return Ok(0);
            }
            return Err(ParseError::DoneReceivedData);
        }
        let mut consumed = 0;
        loop {
            let n = match self.state {
                State::RequestLine => {
                    self.parse_request_line(&data[consumed..])?
                }
                State::Headers => self.parse_header_line(&data[consumed..])?,
                State::Body => self.parse_body(&data[consumed..])?,
                State::Done => break,
            };
            consumed += n;
            if n == 0 {
                break;
            }
        }
        Ok(consumed)
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target exactly as it appeared on the wire.
    ///
    /// No percent-decoding or path normalization is applied.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn parse_request_line(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let end = match find_crlf(data) {
            Some(end) => end,
            None => return Ok(0),
        };
        let line = str::from_utf8(&data[..end])
            .map_err(|_| ParseError::MalformedRequestLine)?;
        let tokens: Vec<&str> = line.split(' ').collect();
        if tokens.len() != 3 {
            return Err(ParseError::MalformedRequestLine);
        }
        let method = tokens[0];
        if method.is_empty()
            || !method.bytes().all(|c| c >= b'A' && c <= b'Z')
        {
            return Err(ParseError::NonUppercaseMethod);
        }
        let mut proto = tokens[2].split('/');
        match (proto.next(), proto.next(), proto.next()) {
            (Some("HTTP"), Some("1.1"), None) => {}
            _ => return Err(ParseError::UnsupportedHttpVersion),
        }
        self.method = method.to_string();
        self.target = tokens[1].to_string();
        self.version = Version::Http11;
        self.state = State::Headers;
        Ok(end + 2)
    }

    fn parse_header_line(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let (n, end_of_block) = self.headers.parse(data)?;
        if end_of_block {
            self.state = State::Body;
            self.begin_body()?;
        }
        Ok(n)
    }

    /// Runs at the headers/body boundary: resolves `Content-Length` and
    /// short-circuits to `Done` when no body bytes are expected.
    fn begin_body(&mut self) -> Result<(), ParseError> {
        self.content_length = match self.headers.get("content-length") {
            Some(value) => {
                let n = value.parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength)?;
                Some(n)
            }
            None => None,
        };
        match self.content_length {
            None | Some(0) => self.state = State::Done,
            Some(_) => {}
        }
        Ok(())
    }

    fn parse_body(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if data.is_empty() {
            return Ok(0);
        }
        let total = self.content_length
            .expect("body state implies a declared content-length");
        let need = total - self.body.len();
        if data.len() > need {
            return Err(ParseError::OverLengthBody);
        }
        self.body.extend_from_slice(data);
        if self.body.len() == total {
            self.state = State::Done;
        }
        Ok(data.len())
    }
}

#[cfg(test)]
mod test {
    use super::Request;
    use error::ParseError;

    // Feeding one byte at a time exercises every partial-line resume path.
    fn parse_byte_by_byte(data: &[u8]) -> Result<Request, ParseError> {
        let mut request = Request::new();
        let mut pending: Vec<u8> = Vec::new();
        for &byte in data {
            pending.push(byte);
            let consumed = request.parse(&pending)?;
            pending.drain(..consumed);
        }
        let consumed = request.parse(&pending)?;
        pending.drain(..consumed);
        Ok(request)
    }

    #[test]
    fn single_byte_chunks_yield_the_same_request() {
        let request = parse_byte_by_byte(
            b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\n\
              Content-Length: 13\r\n\r\nhello world!\n").unwrap();
        assert!(request.is_done());
        assert_eq!(request.method(), "POST");
        assert_eq!(request.target(), "/submit");
        assert_eq!(request.body(), b"hello world!\n");
    }

    #[test]
    fn data_after_done_is_an_error() {
        let mut request = Request::new();
        request.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(request.is_done());
        assert_eq!(request.parse(b"").unwrap(), 0);
        let err = request.parse(b"GET").unwrap_err();
        assert!(matches!(err, ParseError::DoneReceivedData));
    }

    #[test]
    fn body_bytes_past_the_declared_length_are_an_error() {
        let mut request = Request::new();
        request.parse(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n")
            .unwrap();
        let err = request.parse(b"0123456789").unwrap_err();
        assert!(matches!(err, ParseError::OverLengthBody));
    }

    #[test]
    fn double_space_in_request_line_is_malformed() {
        let mut request = Request::new();
        let err = request.parse(b"GET  / HTTP/1.1\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequestLine));
    }

    #[test]
    fn version_must_carry_the_http_prefix() {
        let mut request = Request::new();
        let err = request.parse(b"GET / TTMP/1.1\r\n").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedHttpVersion));
    }

    #[test]
    fn content_length_must_be_numeric() {
        let mut request = Request::new();
        let err = request
            .parse(b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength));
    }
}
