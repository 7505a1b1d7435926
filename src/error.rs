use std::io;


quick_error! {
    /// Everything the request parser can fail with.
    ///
    /// Any of these terminates the connection; the parser is one-shot and
    /// makes no attempt to resynchronize with the peer.
    #[derive(Debug)]
    pub enum ParseError {
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        MalformedRequestLine {
            description("malformed request line")
            display("malformed request line")
        }
        NonUppercaseMethod {
            description("method is not uppercase")
            display("method is not uppercase")
        }
        UnsupportedHttpVersion {
            description("unsupported http version")
            display("unsupported http version")
        }
        MalformedHeader {
            description("malformed header line")
            display("malformed header line")
        }
        InvalidNameCharacter {
            description("invalid character in field name")
            display("invalid character in field name")
        }
        InvalidContentLength {
            description("invalid content-length header")
            display("invalid content-length header")
        }
        ShortBody {
            description("body shorter than declared content-length")
            display("body shorter than declared content-length")
        }
        OverLengthBody {
            description("body longer than declared content-length")
            display("body longer than declared content-length")
        }
        DoneReceivedData {
            description("data received after request was fully parsed")
            display("data received after request was fully parsed")
        }
        IncompleteRequest {
            description("connection closed before request was complete")
            display("connection closed before request was complete")
        }
    }
}

quick_error! {
    /// Errors surfaced by the response writer.
    ///
    /// The phase violations are programmer errors in handlers; they are
    /// returned rather than panicking so a handler's caller can decide
    /// what to do with the half-written response.
    #[derive(Debug)]
    pub enum WriteError {
        Io(err: io::Error) {
            description("I/O error")
            display("I/O error: {}", err)
            from()
        }
        StatusAlreadySent {
            description("status line already sent")
            display("status line already sent")
        }
        HeadersAlreadySent {
            description("headers already sent")
            display("headers already sent")
        }
        BodyAlreadySent {
            description("body already sent")
            display("body already sent")
        }
        NotChunked {
            description("transfer encoding is not chunked")
            display("transfer encoding is not chunked")
        }
    }
}
