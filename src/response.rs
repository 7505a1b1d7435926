//! Response serialization: status line, headers, identity and chunked bodies
//!
//! The writer owns the outbound half of one connection and walks a strict
//! phase order: status line, then headers, then body. Methods called out of
//! phase return a `WriteError` instead of corrupting the wire. Everything
//! is serialized into an output buffer and flushed to the sink within the
//! same call, so a returned `Ok` means the bytes reached the socket layer.
use std::io::Write;

use netbuf::Buf;

use enums::Status;
use error::WriteError;
use headers::Headers;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    ReadyForStatus,
    ReadyForHeaders,
    ReadyForBody,
}

/// Writes one HTTP/1.1 response to `sink`.
pub struct ResponseWriter<W> {
    sink: W,
    out_buf: Buf,
    phase: Phase,
    chunked: bool,
    /// Trailer names announced in a `Trailer` header, in announced order.
    trailer_names: Vec<String>,
}

/// The fields every response wants unless the handler says otherwise:
/// `Content-Length`, `Connection: close` and a plain-text content type.
///
/// Handlers replace individual fields with `Headers::set`.
pub fn default_headers(content_len: usize) -> Headers {
    let mut headers = Headers::new();
    headers.set("Content-Length", &content_len.to_string());
    headers.set("Connection", "close");
    headers.set("Content-Type", "text/plain");
    headers
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> ResponseWriter<W> {
        ResponseWriter {
            sink: sink,
            out_buf: Buf::new(),
            phase: Phase::ReadyForStatus,
            chunked: false,
            trailer_names: Vec::new(),
        }
    }

    /// Emits `HTTP/1.1 <code> <reason>\r\n`.
    ///
    /// Codes without a canonical reason phrase are emitted with an empty
    /// one; the separating space stays either way.
    pub fn write_status_line(&mut self, status: Status)
        -> Result<(), WriteError>
    {
        if self.phase != Phase::ReadyForStatus {
            return Err(WriteError::StatusAlreadySent);
        }
        write!(self.out_buf, "HTTP/1.1 {} {}\r\n",
            status.code(), status.reason()).unwrap();
        self.phase = Phase::ReadyForHeaders;
        self.flush_buf()
    }

    /// Emits every field as `<name>: <value>\r\n` plus the blank line.
    ///
    /// Emission order is unspecified. A case-insensitive
    /// `Transfer-Encoding: chunked` switches the writer into chunked mode;
    /// a `Trailer` field records which trailers may be sent after the final
    /// chunk.
    pub fn write_headers(&mut self, headers: &Headers)
        -> Result<(), WriteError>
    {
        if self.phase != Phase::ReadyForHeaders {
            return Err(WriteError::HeadersAlreadySent);
        }
        for (name, value) in headers.iter() {
            write!(self.out_buf, "{}: {}\r\n", name, value).unwrap();
            if name.eq_ignore_ascii_case("transfer-encoding")
                && value.trim().eq_ignore_ascii_case("chunked")
            {
                self.chunked = true;
            }
            if name.eq_ignore_ascii_case("trailer") {
                self.trailer_names = value.split(',')
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect();
            }
        }
        self.out_buf.extend(b"\r\n");
        self.phase = Phase::ReadyForBody;
        self.flush_buf()
    }

    /// Writes body bytes verbatim.
    ///
    /// In identity mode the writer cycles back to the start phase
    /// afterwards; in chunked mode it stays in the body phase so further
    /// chunks can follow.
    pub fn write_body(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if self.phase != Phase::ReadyForBody {
            return Err(WriteError::BodyAlreadySent);
        }
        self.out_buf.extend(data);
        if !self.chunked {
            self.phase = Phase::ReadyForStatus;
        }
        self.flush_buf()?;
        Ok(data.len())
    }

    /// Writes one chunk as `<size-in-uppercase-hex>\r\n<data>\r\n`.
    ///
    /// Empty chunks are ignored: a zero-size chunk is the body terminator
    /// and only `write_chunked_body_done` may emit it.
    pub fn write_chunked_body(&mut self, data: &[u8])
        -> Result<usize, WriteError>
    {
        if self.phase != Phase::ReadyForBody {
            return Err(WriteError::BodyAlreadySent);
        }
        if !self.chunked {
            return Err(WriteError::NotChunked);
        }
        if data.is_empty() {
            return Ok(0);
        }
        write!(self.out_buf, "{:X}\r\n", data.len()).unwrap();
        self.out_buf.extend(data);
        self.out_buf.extend(b"\r\n");
        self.flush_buf()?;
        Ok(data.len())
    }

    /// Terminates a chunked body with `0\r\n`, optional trailers and the
    /// final blank line, then leaves chunked mode.
    ///
    /// Only trailers that were announced in the `Trailer` header are
    /// emitted, in the announced order and under the announced names.
    pub fn write_chunked_body_done(&mut self, trailers: Option<&Headers>)
        -> Result<(), WriteError>
    {
        if self.phase != Phase::ReadyForBody {
            return Err(WriteError::BodyAlreadySent);
        }
        if !self.chunked {
            return Err(WriteError::NotChunked);
        }
        self.out_buf.extend(b"0\r\n");
        if let Some(supplied) = trailers {
            for name in &self.trailer_names {
                if let Some(value) = supplied.get(name) {
                    write!(self.out_buf, "{}: {}\r\n", name, value).unwrap();
                }
            }
        }
        self.out_buf.extend(b"\r\n");
        self.chunked = false;
        self.flush_buf()
    }

    /// Reference to the underlying sink, mainly useful in tests.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Unwraps the writer, dropping anything not yet flushed.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn flush_buf(&mut self) -> Result<(), WriteError> {
        if self.out_buf.len() == 0 {
            return Ok(());
        }
        self.sink.write_all(&self.out_buf[..])?;
        let len = self.out_buf.len();
        self.out_buf.consume(len);
        Ok(())
    }
}
