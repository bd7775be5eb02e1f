// Frame transfer client: a small blocking HTTP client that talks to the
// frame storage API. Each operation is a short fail-fast pipeline with no
// retries and no state carried across calls; one process invocation performs
// exactly one of upload, query, or download.

use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::envelope::{self, FrameInfo, QueryFilter};
use crate::error::{FrameError, Result};

/// Base URL used when `FRAME_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3005";

/// Largest frame the client will stage for upload, in bytes.
pub const MAX_FRAME_BYTES: usize = 921_654;

/// Bound on every HTTP exchange. A timed-out exchange is a transport
/// failure, not retried.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed-capacity staging buffer for raw image bytes.
///
/// The buffer owns its storage and is passed explicitly into the operation
/// that uses it. The capacity invariant is hard: a payload that does not fit
/// fails the operation, it is never truncated to fit.
#[derive(Debug)]
pub struct ImageBuffer {
    capacity: usize,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Buffer sized for the largest frame the API accepts.
    pub fn new() -> Self {
        Self::with_capacity(MAX_FRAME_BYTES)
    }

    /// Buffer with an explicit capacity; tests use small ones.
    pub fn with_capacity(capacity: usize) -> Self {
        ImageBuffer {
            capacity,
            data: Vec::with_capacity(capacity),
        }
    }

    /// Replace the buffer contents with `bytes`, bounds-checked.
    pub fn copy_from(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.capacity {
            return Err(FrameError::FrameTooLarge {
                size: bytes.len() as u64,
                capacity: self.capacity,
            });
        }
        self.data.clear();
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Load a file into the buffer. Fails if the file is unreadable, empty,
    /// or larger than the buffer capacity; the size is checked against the
    /// file metadata before any bytes are read.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let size = fs::metadata(path)
            .map_err(|source| FrameError::FileRead {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if size == 0 {
            return Err(FrameError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        if size > self.capacity as u64 {
            return Err(FrameError::FrameTooLarge {
                size,
                capacity: self.capacity,
            });
        }
        let bytes = fs::read(path).map_err(|source| FrameError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        // re-checked: the file may have grown between stat and read
        self.copy_from(&bytes)?;
        Ok(self.data.len())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ImageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking client for the frame storage API. Holds a reqwest client built
/// with the fixed request timeout and the service base URL.
#[derive(Clone)]
pub struct FrameClient {
    http: Client,
    base_url: String,
}

impl FrameClient {
    /// Create a client configured from the environment variable
    /// `FRAME_API_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("FRAME_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Create a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(FrameClient { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload the image at `path` for camera `camera`.
    ///
    /// Stages the file in `staging` (unreadable, empty, or over-capacity
    /// files fail here, before any network traffic), captures frame
    /// metadata from the current time, builds the base64 JSON body, and
    /// issues `POST /api/frames`. Success is transport success AND HTTP 200
    /// exactly; anything else keeps the raw status and body in the error.
    /// Returns the filename registered with the server.
    pub fn upload(&self, path: &Path, camera: &str, staging: &mut ImageBuffer) -> Result<String> {
        staging.load_file(path)?;
        let info = FrameInfo::from_now(camera)?;
        let (body, filename) = envelope::build_upload_request(&info, staging.as_slice())?;

        let url = format!("{}/api/frames", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FrameError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(filename)
    }

    /// Look up stored frames matching `filter` and resolve the first match
    /// to a downloadable filename.
    pub fn query(&self, filter: &QueryFilter) -> Result<String> {
        let url = format!(
            "{}/api/frames?{}",
            self.base_url,
            envelope::build_query_string(filter)
        );
        let response = self.http.get(&url).send()?;

        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::OK {
            return Err(FrameError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        envelope::parse_query_response(&body)
    }

    /// Download the stored file `filename`, streaming the body to `output`.
    ///
    /// The destination is opened before the request starts and is closed on
    /// every exit path when the handle leaves scope. On failure the
    /// partially written file is left in place; callers must treat it as
    /// untrustworthy until a later successful download replaces it.
    /// Returns the number of bytes written.
    pub fn download(&self, filename: &str, output: &Path) -> Result<u64> {
        let url = format!("{}/api/frame-file?filename={}", self.base_url, filename);
        let mut destination = File::create(output).map_err(|source| FrameError::FileWrite {
            path: output.to_path_buf(),
            source,
        })?;

        let mut response = self.http.get(&url).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FrameError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let written = response.copy_to(&mut destination)?;
        Ok(written)
    }
}
