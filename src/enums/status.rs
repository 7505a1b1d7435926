/// Enum with the HTTP status codes the server knows a reason phrase for.
///
/// Every other code is carried through `Status::Raw` and emitted with an
/// empty reason phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,                     // 200
    BadRequest,             // 400
    InternalServerError,    // 500
    /// Custom status code, emitted without a reason phrase.
    Raw(u16),
}

impl Status {
    /// Maps a numeric code onto the canonical variant where one exists.
    pub fn from_code(code: u16) -> Status {
        match code {
            200 => Status::Ok,
            400 => Status::BadRequest,
            500 => Status::InternalServerError,
            code => Status::Raw(code),
        }
    }

    pub fn code(&self) -> u16 {
        match *self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::InternalServerError => 500,
            Status::Raw(code) => code,
        }
    }

    pub fn reason(&self) -> &'static str {
        match *self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::InternalServerError => "Internal Server Error",
            Status::Raw(..) => "",
        }
    }
}

#[cfg(test)]
mod test {
    use super::Status;

    #[test]
    fn canonical_codes() {
        assert_eq!(Status::from_code(200), Status::Ok);
        assert_eq!(Status::from_code(400), Status::BadRequest);
        assert_eq!(Status::from_code(500), Status::InternalServerError);
        assert_eq!(Status::from_code(404), Status::Raw(404));
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::Raw(418).code(), 418);
    }

    #[test]
    fn reason_phrases() {
        assert_eq!(Status::Ok.reason(), "OK");
        assert_eq!(Status::BadRequest.reason(), "Bad Request");
        assert_eq!(Status::InternalServerError.reason(),
                   "Internal Server Error");
        assert_eq!(Status::Raw(404).reason(), "");
    }
}
