//! Output formats and their request parameter.

use crate::error::{Result, TableError};
use crate::request::TableRequest;
use crate::response::ExportResponse;
use std::fmt;
use std::str::FromStr;

/// Output format of a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	/// Paginated HTML table followed by pagination links
	Html,
	/// Unpaginated CSV download
	Csv,
	/// Unpaginated PDF download
	Pdf,
}

impl Format {
	/// The name used in `format_<key>` parameters
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Html => "html",
			Self::Csv => "csv",
			Self::Pdf => "pdf",
		}
	}

	/// Resolve the format requested for table `key`
	///
	/// A missing `format_<key>` parameter selects HTML.
	///
	/// # Examples
	///
	/// ```
	/// use reusable_table::{Format, TableRequest};
	///
	/// let request = TableRequest::from_query("format_2=csv");
	/// assert_eq!(Format::from_request(&request, "1").unwrap(), Format::Html);
	/// assert_eq!(Format::from_request(&request, "2").unwrap(), Format::Csv);
	/// ```
	pub fn from_request(request: &TableRequest, key: &str) -> Result<Self> {
		request
			.get(&format!("format_{}", key))
			.map(|value| value.parse::<Format>())
			.unwrap_or(Ok(Self::Html))
	}

	/// Whether this build can produce the format
	pub fn is_available(&self) -> bool {
		match self {
			Self::Html | Self::Csv => true,
			Self::Pdf => cfg!(feature = "pdf"),
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Format {
	type Err = TableError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"html" => Ok(Self::Html),
			"csv" => Ok(Self::Csv),
			"pdf" => Ok(Self::Pdf),
			other => Err(TableError::UnsupportedFormat(other.to_string())),
		}
	}
}

/// Export formats offered as download links under an HTML table
pub fn available_formats() -> Vec<Format> {
	[Format::Csv, Format::Pdf]
		.into_iter()
		.filter(Format::is_available)
		.collect()
}

/// Result of rendering one table.
#[derive(Debug, Clone)]
pub enum Rendered {
	/// HTML fragment to embed in a page
	Html(String),
	/// Download to return instead of a page
	Export(ExportResponse),
}

impl Rendered {
	/// Whether this is an HTML fragment
	pub fn is_html(&self) -> bool {
		matches!(self, Self::Html(_))
	}

	/// The HTML fragment, if this is one
	pub fn as_html(&self) -> Option<&str> {
		match self {
			Self::Html(html) => Some(html),
			Self::Export(_) => None,
		}
	}

	/// The download, if this is one
	pub fn as_export(&self) -> Option<&ExportResponse> {
		match self {
			Self::Html(_) => None,
			Self::Export(response) => Some(response),
		}
	}

	/// Consume into the download, if this is one
	pub fn into_export(self) -> Option<ExportResponse> {
		match self {
			Self::Html(_) => None,
			Self::Export(response) => Some(response),
		}
	}
}
