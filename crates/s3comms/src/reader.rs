//! The request engine: a reader handle exposing a remote S3 object as a
//! random-access, byte-range-readable source.
//!
//! `S3Reader` owns a blocking `reqwest` client. Every operation blocks the
//! calling thread until its HTTP round-trip completes; there is no retry,
//! no caching, and no cross-handle concurrency.

use std::time::Duration;

use s3comms_sigv4::{EMPTY_PAYLOAD_SHA256, SigningInput};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::S3CommsError;
use crate::headers::HeaderList;
use crate::request::HttpRequestSpec;
use crate::url::{ParsedUrl, parse_url};

/// Timeouts for the reader handle's HTTP client.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Authentication material for opening a handle in authenticated mode.
///
/// `signing_key` is the 32-byte AWS4 signing key, already derived (by
/// [`s3comms_sigv4::signing_key`]) from the secret access key, a date, and
/// this region — the handle never sees the raw secret access key, only the
/// derived key, which callers should cache and reuse for up to 7 days.
#[derive(Debug)]
pub struct OpenCredentials {
    pub region: String,
    pub access_key_id: String,
    pub signing_key: [u8; 32],
}

impl OpenCredentials {
    /// Validate a `(region, access_key_id, signing_key)` triple.
    ///
    /// All three present yields authenticated-mode credentials; all three
    /// absent yields `Ok(None)` (anonymous mode). Any other combination — a
    /// partial triple — is [`S3CommsError::CredentialsInconsistent`], per
    /// spec.md §4.4.1's "inconsistent credential triple" `open` failure mode.
    pub fn try_new(
        region: Option<&str>,
        access_key_id: Option<&str>,
        signing_key: Option<[u8; 32]>,
    ) -> Result<Option<Self>, S3CommsError> {
        match (region, access_key_id, signing_key) {
            (None, None, None) => Ok(None),
            (Some(region), Some(access_key_id), Some(signing_key)) => Ok(Some(Self {
                region: region.to_string(),
                access_key_id: access_key_id.to_string(),
                signing_key,
            })),
            _ => Err(S3CommsError::CredentialsInconsistent(
                "region, access_key_id, and signing_key must be all present or all absent"
                    .to_string(),
            )),
        }
    }
}

/// A remote-file handle: a parsed URL, a live HTTP client, the discovered
/// object size, and optional signing credentials.
///
/// Single-threaded per handle: no internal locking guards concurrent reads.
/// Dropping a handle releases the underlying client;
/// [`close`](S3Reader::close) is provided for callers that prefer an
/// explicit lifecycle call, but is just `drop(handle)`.
#[derive(Debug)]
pub struct S3Reader {
    client: reqwest::blocking::Client,
    url: ParsedUrl,
    filesize: u64,
    creds: Option<OpenCredentials>,
    clock: Box<dyn Clock>,
}

/// Open a handle to a remote object, performing a `HEAD` to discover its
/// size.
///
/// `region`, `access_key_id`, and `signing_key` must be all `Some` (SigV4-
/// authenticated access) or all `None` (anonymous access) — see
/// [`OpenCredentials::try_new`], which validates this.
pub fn open(
    url: &str,
    region: Option<&str>,
    access_key_id: Option<&str>,
    signing_key: Option<[u8; 32]>,
) -> Result<S3Reader, S3CommsError> {
    open_with(
        url,
        region,
        access_key_id,
        signing_key,
        ReaderConfig::default(),
        Box::new(SystemClock),
    )
}

/// Like [`open`], with an explicit [`ReaderConfig`] and [`Clock`] — the hook
/// tests use to pin the timestamp fed into signing.
pub fn open_with(
    url: &str,
    region: Option<&str>,
    access_key_id: Option<&str>,
    signing_key: Option<[u8; 32]>,
    config: ReaderConfig,
    clock: Box<dyn Clock>,
) -> Result<S3Reader, S3CommsError> {
    let parsed = parse_url(url)?;
    let creds = OpenCredentials::try_new(region, access_key_id, signing_key)?;

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .http1_only()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(S3CommsError::HttpClientInit)?;

    let mut reader = S3Reader {
        client,
        url: parsed,
        filesize: 0,
        creds,
        clock,
    };

    debug!(url, "opening s3 reader handle");
    reader.getsize()?;

    Ok(reader)
}

impl S3Reader {
    /// Object size in bytes, as discovered by the `HEAD` performed at open.
    pub fn size(&self) -> u64 {
        self.filesize
    }

    fn base_url(&self) -> String {
        let mut s = format!("{}://{}", self.url.scheme, self.url.host);
        if let Some(port) = &self.url.port {
            s.push(':');
            s.push_str(port);
        }
        s.push('/');
        if let Some(path) = &self.url.path {
            s.push_str(path);
        }
        if let Some(query) = &self.url.query {
            s.push('?');
            s.push_str(query);
        }
        s
    }

    fn resource_path(&self) -> String {
        match &self.url.path {
            Some(p) => format!("/{p}"),
            None => "/".to_string(),
        }
    }

    /// Build request headers for a signed request and return the
    /// `Authorization` header alongside them, or `None` in anonymous mode.
    fn build_headers(&self, verb: &str, range: Option<&str>) -> Result<HeaderList, S3CommsError> {
        let mut headers = HeaderList::new();
        let Some(creds) = &self.creds else {
            if let Some(r) = range {
                headers.set("Range", Some(r))?;
            }
            if let Some(range_value) = headers.get("range") {
                debug!(range = range_value, "anonymous ranged read");
            }
            return Ok(headers);
        };

        let (datetime, date) = s3comms_sigv4::format_datetime(self.clock.now_unix_secs());

        headers.set("Host", Some(&self.url.host))?;
        if let Some(r) = range {
            headers.set("Range", Some(r))?;
        }
        headers.set("x-amz-content-sha256", Some(EMPTY_PAYLOAD_SHA256))?;
        headers.set("x-amz-date", Some(&datetime))?;

        let mut signable = std::collections::BTreeMap::new();
        for (k, v) in headers.iter_sorted() {
            signable.insert(k.to_string(), v.to_string());
        }
        let canonical_uri = s3comms_sigv4::canonical_uri(&self.resource_path());
        let input = SigningInput {
            method: verb,
            canonical_uri: &canonical_uri,
            canonical_query: "",
            headers_to_sign: &signable,
            body_sha256: EMPTY_PAYLOAD_SHA256,
            datetime: &datetime,
            date: &date,
        };
        let authorization = s3comms_sigv4::sign_with_key(
            &input,
            &creds.signing_key,
            &creds.access_key_id,
            &creds.region,
        );
        headers.set("Authorization", Some(&authorization))?;

        if let Some(range_value) = headers.get("range") {
            debug!(range = range_value, "authenticated ranged read");
        }
        debug!(wire = ?headers.wire_lines(), "built request headers");
        Ok(headers)
    }

    fn execute(
        &self,
        verb: &str,
        range: Option<&str>,
    ) -> Result<reqwest::blocking::Response, S3CommsError> {
        let headers = self.build_headers(verb, range)?;
        let request_spec = HttpRequestSpec::new(verb, self.resource_path(), headers);

        let method = reqwest::Method::from_bytes(request_spec.verb.as_bytes())
            .map_err(|e| S3CommsError::ArgumentInvalid(e.to_string()))?;

        let mut req = self.client.request(method, self.base_url());
        for (key, value) in request_spec.headers.iter_sorted() {
            req = req.header(key, value);
        }

        debug!(
            verb = %request_spec.verb,
            path = %request_spec.path,
            version = %request_spec.version,
            signed_headers = %request_spec.headers.signed_headers(),
            "issuing http request"
        );

        let response = req.send().map_err(S3CommsError::HttpRequestFailed)?;
        let response = response
            .error_for_status()
            .map_err(S3CommsError::HttpRequestFailed)?;
        // request_spec's header list is dropped here with it, once the
        // round-trip that needed it has completed.
        Ok(response)
    }

    fn getsize(&mut self) -> Result<(), S3CommsError> {
        debug!("issuing HEAD to discover object size");
        let response = self.execute("HEAD", None)?;

        let content_length = response
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .ok_or_else(|| S3CommsError::ResponseMalformed("missing Content-Length".to_string()))?
            .to_str()
            .map_err(|_| {
                S3CommsError::ResponseMalformed("Content-Length is not ASCII".to_string())
            })?;

        let size: u64 = content_length.parse().map_err(|_| {
            S3CommsError::ResponseMalformed(format!(
                "Content-Length '{content_length}' is not a valid integer"
            ))
        })?;

        if size == 0 || size == u64::MAX {
            return Err(S3CommsError::ResponseMalformed(format!(
                "Content-Length '{size}' out of acceptable range"
            )));
        }

        self.filesize = size;
        Ok(())
    }

    /// Read `[offset, offset+len)` into `dest`, or the rest of the object
    /// from `offset` if `len == 0`, or the whole object if both are 0.
    ///
    /// Fails with [`S3CommsError::ReadPastEnd`] without issuing any HTTP
    /// request if the requested window runs past the discovered file size.
    pub fn read(&self, offset: u64, len: u64, dest: &mut Vec<u8>) -> Result<(), S3CommsError> {
        if offset > self.filesize || offset + len > self.filesize {
            return Err(S3CommsError::ReadPastEnd {
                offset,
                len,
                filesize: self.filesize,
            });
        }

        // NOTE: the upper bound is `offset + len`, not `offset + len - 1`.
        // This overruns the requested window by one byte per HTTP Range
        // semantics; kept deliberately for wire compatibility with existing
        // deployments that expect this exact range string.
        let range = if len > 0 {
            Some(format!("bytes={}-{}", offset, offset + len))
        } else if offset > 0 {
            Some(format!("bytes={offset}-"))
        } else {
            None
        };

        let response = self.execute("GET", range.as_deref())?;
        let bytes = response
            .bytes()
            .map_err(S3CommsError::HttpRequestFailed)?;
        dest.clear();
        dest.extend_from_slice(&bytes);
        Ok(())
    }

    /// Release the handle. Idempotent by construction — there is nothing
    /// left to do beyond ordinary drop, since the client, credentials, and
    /// parsed URL are all owned fields with no manual lifetime management.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for S3Reader {
    fn drop(&mut self) {
        debug!("closing s3 reader handle");
    }
}
