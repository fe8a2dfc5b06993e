use thiserror::Error;

/// Errors surfaced by the S3 communications core.
///
/// Every top-level operation (`parse_url`, `HeaderList::set`, `S3Reader::open`
/// / `read`) returns one of these; there is no retry policy baked into the
/// core, and errors propagate straight to the caller.
#[derive(Debug, Error)]
pub enum S3CommsError {
    #[error("argument invalid: {0}")]
    ArgumentInvalid(String),

    #[error("malformed url: {0}")]
    UrlMalformed(String),

    #[error("credentials triple is inconsistent: {0}")]
    CredentialsInconsistent(String),

    #[error("failed to build http client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    #[error("http request failed: {0}")]
    HttpRequestFailed(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    ResponseMalformed(String),

    #[error("read past end of object: offset {offset} + len {len} > filesize {filesize}")]
    ReadPastEnd {
        offset: u64,
        len: u64,
        filesize: u64,
    },

    #[error("header list misuse: {0}")]
    HeaderListMisuse(String),
}
