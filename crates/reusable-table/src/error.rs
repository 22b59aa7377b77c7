//! Error types for table rendering.

use thiserror::Error;

/// Errors that can occur while building or rendering a table.
#[derive(Debug, Error)]
pub enum TableError {
	/// The requested output format has no handler.
	#[error("The format: {0} is not handled")]
	UnsupportedFormat(String),

	/// The format is known but the site was built without support for it.
	#[error("The site is not configured to handle {0}.")]
	FormatUnavailable(String),

	/// No table is registered under the given name.
	#[error("Table not registered: {0}")]
	UnknownTable(String),

	/// A field definition is unusable (empty header, bad bit).
	#[error("Invalid field {field}: {message}")]
	InvalidField {
		/// Header of the offending field.
		field: String,
		/// What is wrong with it.
		message: String,
	},

	/// Template compilation or rendering failed.
	#[error("Template error: {0}")]
	Template(#[from] tera::Error),

	/// Writing CSV output failed.
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	/// A row could not be serialized into the template context.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// A response header could not be built.
	#[error("Invalid header value: {0}")]
	InvalidHeader(#[from] http::header::InvalidHeaderValue),

	/// The object source could not produce rows.
	#[error("Query error: {0}")]
	Query(String),

	/// Settings could not be loaded.
	#[error("Settings error: {0}")]
	Settings(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
