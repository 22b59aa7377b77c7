//! Download responses produced by the export handlers.

use crate::error::Result;
use bytes::Bytes;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};

/// A file download produced by a non-HTML format handler.
#[derive(Debug, Clone)]
pub struct ExportResponse {
	/// HTTP status code
	pub status: StatusCode,
	/// Response headers
	pub headers: HeaderMap,
	/// File contents
	pub body: Bytes,
}

impl ExportResponse {
	/// Create an empty response with the given status code
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a `200 OK` attachment download
	///
	/// # Examples
	///
	/// ```
	/// use reusable_table::ExportResponse;
	///
	/// let response = ExportResponse::attachment("text/csv", "report.csv", "a,b\r\n").unwrap();
	/// assert_eq!(response.content_type(), Some("text/csv"));
	/// assert_eq!(
	///     response.content_disposition(),
	///     Some("attachment; filename=report.csv")
	/// );
	/// ```
	pub fn attachment(
		content_type: &'static str,
		filename: &str,
		body: impl Into<Bytes>,
	) -> Result<Self> {
		let disposition = HeaderValue::from_str(&format!("attachment; filename={}", filename))?;
		Ok(Self::new(StatusCode::OK)
			.with_header(CONTENT_TYPE, HeaderValue::from_static(content_type))
			.with_header(CONTENT_DISPOSITION, disposition)
			.with_body(body))
	}

	/// Set a header, replacing any existing value
	pub fn with_header(mut self, name: http::header::HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	/// Replace the body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// The `Content-Type` header, if set and valid UTF-8
	pub fn content_type(&self) -> Option<&str> {
		self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
	}

	/// The `Content-Disposition` header, if set and valid UTF-8
	pub fn content_disposition(&self) -> Option<&str> {
		self.headers
			.get(CONTENT_DISPOSITION)
			.and_then(|v| v.to_str().ok())
	}

	/// Convert into an `http::Response` ready to hand to a server
	pub fn into_http(self) -> http::Response<Bytes> {
		let mut response = http::Response::new(self.body);
		*response.status_mut() = self.status;
		*response.headers_mut() = self.headers;
		response
	}
}
