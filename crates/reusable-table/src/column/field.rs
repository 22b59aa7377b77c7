//! Field definitions and their per-render column state

use crate::sort::SortOrder;
use serde::Serialize;

/// One column of a table
///
/// A field consists of three parts:
/// - `name`: header text of the column
/// - `column`: field path the column orders by (`author__name` descends
///   into nested objects); empty when the column cannot be sorted
/// - `bit`: template fragment rendered for each row, referencing the row
///   as `{{ object }}`
///
/// # Example
///
/// ```rust
/// use reusable_table::column::Field;
///
/// let field = Field::new("User Name", "name", "{{ object.name }}");
/// assert!(field.sortable());
///
/// let actions = Field::from(("Actions", "", "<a href=\"edit/{{ object.id }}\">edit</a>"));
/// assert!(!actions.sortable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
	name: String,
	column: String,
	bit: String,
}

impl Field {
	/// Creates a new field
	pub fn new(name: impl Into<String>, column: impl Into<String>, bit: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			column: column.into(),
			bit: bit.into(),
		}
	}

	/// Returns the header text
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the field path used for ordering
	pub fn column(&self) -> &str {
		&self.column
	}

	/// Returns the cell template
	pub fn bit(&self) -> &str {
		&self.bit
	}

	/// Returns whether this column can be sorted
	pub fn sortable(&self) -> bool {
		!self.column.is_empty()
	}

	/// Request parameter that sorts table `key` by this column
	pub fn sort_param(&self, key: &str) -> String {
		format!("sort_{}_{}", key, self.column)
	}
}

impl<N, C, B> From<(N, C, B)> for Field
where
	N: Into<String>,
	C: Into<String>,
	B: Into<String>,
{
	fn from((name, column, bit): (N, C, B)) -> Self {
		Self::new(name, column, bit)
	}
}

/// Header state of a column for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnState {
	/// Translated header text
	pub name: String,
	/// Field path used for ordering
	pub column: String,
	/// Whether the header links to a sort
	pub sortable: bool,
	/// `false` only for the column currently sorted descending
	pub asc: bool,
	/// Direction the column is currently sorted in, if any
	pub sorted: Option<SortOrder>,
	/// Request parameter that sorts by this column
	pub sort_param: String,
	/// Direction the header link requests
	pub next_order: SortOrder,
}

impl ColumnState {
	/// Builds the header state of `field` given the active sort
	pub fn new(field: &Field, key: &str, header: String, sorted: Option<SortOrder>) -> Self {
		Self {
			name: header,
			column: field.column.clone(),
			sortable: field.sortable(),
			asc: sorted != Some(SortOrder::Descending),
			sorted,
			sort_param: field.sort_param(key),
			next_order: match sorted {
				Some(SortOrder::Ascending) => SortOrder::Descending,
				_ => SortOrder::Ascending,
			},
		}
	}
}
