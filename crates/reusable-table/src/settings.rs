//! Table rendering settings.

use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rows per page when neither the table nor the call supplies a size.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Number of page links shown on each side of the current page.
pub const DEFAULT_WINDOW_SIDE: usize = 5;

/// Settings shared by every table rendered with them.
///
/// # Examples
///
/// ```
/// use reusable_table::TableSettings;
///
/// let settings = TableSettings::from_toml_str(r#"
/// default_page_size = 50
/// site_title = "Inventory"
/// "#).unwrap();
/// assert_eq!(settings.default_page_size, 50);
/// assert_eq!(settings.window_side, 5);
/// assert_eq!(settings.csv_filename, "report.csv");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Page size of tables built without one.
	pub default_page_size: usize,
	/// Half-width of the pagination window.
	pub window_side: usize,
	/// Site title printed above PDF exports.
	pub site_title: Option<String>,
	/// Attachment name of CSV exports.
	pub csv_filename: String,
	/// Attachment name of PDF exports.
	pub pdf_filename: String,
}

impl Default for TableSettings {
	fn default() -> Self {
		Self {
			default_page_size: DEFAULT_PAGE_SIZE,
			window_side: DEFAULT_WINDOW_SIDE,
			site_title: None,
			csv_filename: "report.csv".to_string(),
			pdf_filename: "report.pdf".to_string(),
		}
	}
}

impl TableSettings {
	/// Parse settings from a TOML document
	pub fn from_toml_str(contents: &str) -> Result<Self> {
		toml::from_str(contents)
			.map_err(|e| TableError::Settings(format!("TOML parse error: {}", e)))
	}

	/// Parse settings from a JSON document
	pub fn from_json_str(contents: &str) -> Result<Self> {
		serde_json::from_str(contents)
			.map_err(|e| TableError::Settings(format!("JSON parse error: {}", e)))
	}

	/// Load settings from a `.toml` or `.json` file
	pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let contents = std::fs::read_to_string(&path).map_err(|e| {
			TableError::Settings(format!("Failed to read {}: {}", path.display(), e))
		})?;

		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml_str(&contents),
			Some("json") => Self::from_json_str(&contents),
			_ => Err(TableError::Settings(
				"Supported formats: .toml, .json".to_string(),
			)),
		}
	}

	/// Set the site title printed on PDF exports
	pub fn with_site_title(mut self, title: impl Into<String>) -> Self {
		self.site_title = Some(title.into());
		self
	}

	/// Set the default page size
	pub fn with_default_page_size(mut self, size: usize) -> Self {
		self.default_page_size = size;
		self
	}

	/// Set the pagination window half-width
	pub fn with_window_side(mut self, side: usize) -> Self {
		self.window_side = side;
		self
	}
}
