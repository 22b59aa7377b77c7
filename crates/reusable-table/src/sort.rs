//! Sort direction and ordering expressions

use serde::Serialize;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
	/// Ascending order
	#[serde(rename = "asc")]
	Ascending,
	/// Descending order
	#[serde(rename = "desc")]
	Descending,
}

impl SortOrder {
	/// Returns the opposite direction
	pub fn toggle(&self) -> Self {
		match self {
			Self::Ascending => Self::Descending,
			Self::Descending => Self::Ascending,
		}
	}

	/// The value used in `sort_<key>_<column>` parameters
	pub fn as_param(&self) -> &'static str {
		match self {
			Self::Ascending => "asc",
			Self::Descending => "desc",
		}
	}

	/// Parses a `sort_<key>_<column>` parameter value
	///
	/// Anything other than `asc` or `desc` means the column is not sorted.
	pub fn from_param(value: &str) -> Option<Self> {
		match value {
			"asc" => Some(Self::Ascending),
			"desc" => Some(Self::Descending),
			_ => None,
		}
	}

	/// Parses an ordering expression
	///
	/// A leading `-` selects descending order (e.g., "name" -> Ascending,
	/// "-name" -> Descending)
	pub fn parse_ordering(s: &str) -> (Self, &str) {
		if let Some(field) = s.strip_prefix('-') {
			(Self::Descending, field)
		} else {
			(Self::Ascending, s)
		}
	}
}
