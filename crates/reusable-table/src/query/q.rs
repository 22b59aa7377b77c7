//! Composable row filters
//!
//! A [`Q`] is evaluated against the serialized form of each row. Conditions
//! use Django-style field lookups and combine with `&`, `|` and `!`:
//!
//! ```
//! use reusable_table::query::Q;
//! use serde_json::json;
//!
//! let active_admins = Q::exact("active", true) & Q::lookup("role__in", json!(["admin", "owner"]));
//! let not_bob = !Q::lookup("name__iexact", "bob");
//! let filter = active_admins | not_bob;
//!
//! assert!(filter.matches(&json!({"active": true, "role": "owner", "name": "Bob"})));
//! assert!(!filter.matches(&json!({"active": false, "role": "owner", "name": "BOB"})));
//! ```

use super::value::{LOOKUP_SEP, partial_compare, resolve_path, value_text};
use serde_json::Value;
use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Not};

/// Comparison applied to a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
	/// Equal to the value
	Exact(Value),
	/// Case-insensitive text equality
	IExact(String),
	/// Text contains the substring
	Contains(String),
	/// Case-insensitive substring match
	IContains(String),
	/// Text starts with the prefix
	StartsWith(String),
	/// Text ends with the suffix
	EndsWith(String),
	/// Greater than the value
	Gt(Value),
	/// Greater than or equal to the value
	Gte(Value),
	/// Less than the value
	Lt(Value),
	/// Less than or equal to the value
	Lte(Value),
	/// Equal to one of the values
	In(Vec<Value>),
	/// Field is missing or null (`true`), or present and non-null (`false`)
	IsNull(bool),
}

impl Lookup {
	/// Builds the lookup named by a `__<name>` suffix
	///
	/// Returns `None` when `name` is not a known lookup.
	pub fn from_name(name: &str, value: Value) -> Option<Self> {
		let lookup = match name {
			"exact" => Self::Exact(value),
			"iexact" => Self::IExact(value_text(&value)),
			"contains" => Self::Contains(value_text(&value)),
			"icontains" => Self::IContains(value_text(&value)),
			"startswith" => Self::StartsWith(value_text(&value)),
			"endswith" => Self::EndsWith(value_text(&value)),
			"gt" => Self::Gt(value),
			"gte" => Self::Gte(value),
			"lt" => Self::Lt(value),
			"lte" => Self::Lte(value),
			"in" => Self::In(match value {
				Value::Array(items) => items,
				single => vec![single],
			}),
			"isnull" => Self::IsNull(match value {
				Value::Bool(b) => b,
				other => !value_text(&other).is_empty(),
			}),
			_ => return None,
		};
		Some(lookup)
	}

	/// Tests a field value (`None` when the field is missing)
	pub fn matches(&self, field: Option<&Value>) -> bool {
		let Some(field) = field else {
			return matches!(self, Self::IsNull(true));
		};
		match self {
			Self::Exact(value) => partial_compare(field, value) == Some(Ordering::Equal),
			Self::IExact(text) => value_text(field).to_lowercase() == text.to_lowercase(),
			Self::Contains(text) => value_text(field).contains(text.as_str()),
			Self::IContains(text) => value_text(field)
				.to_lowercase()
				.contains(&text.to_lowercase()),
			Self::StartsWith(text) => value_text(field).starts_with(text.as_str()),
			Self::EndsWith(text) => value_text(field).ends_with(text.as_str()),
			Self::Gt(value) => partial_compare(field, value) == Some(Ordering::Greater),
			Self::Gte(value) => matches!(
				partial_compare(field, value),
				Some(Ordering::Greater | Ordering::Equal)
			),
			Self::Lt(value) => partial_compare(field, value) == Some(Ordering::Less),
			Self::Lte(value) => matches!(
				partial_compare(field, value),
				Some(Ordering::Less | Ordering::Equal)
			),
			Self::In(values) => values
				.iter()
				.any(|value| partial_compare(field, value) == Some(Ordering::Equal)),
			Self::IsNull(expected) => field.is_null() == *expected,
		}
	}
}

/// Filter tree over serialized rows
#[derive(Debug, Clone, PartialEq)]
pub enum Q {
	/// Matches every row
	All,
	/// Single field condition
	Condition {
		/// Field path (`__`-separated)
		path: String,
		/// Comparison applied to the field
		lookup: Lookup,
	},
	/// Every child matches
	And(Vec<Q>),
	/// At least one child matches
	Or(Vec<Q>),
	/// The child does not match
	Not(Box<Q>),
}

impl Default for Q {
	fn default() -> Self {
		Self::All
	}
}

impl Q {
	/// Filter matching every row
	pub fn all() -> Self {
		Self::All
	}

	/// Condition on a field path
	pub fn new(path: impl Into<String>, lookup: Lookup) -> Self {
		Self::Condition {
			path: path.into(),
			lookup,
		}
	}

	/// Equality condition
	pub fn exact(path: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::new(path, Lookup::Exact(value.into()))
	}

	/// Condition written as `field__lookup`
	///
	/// A trailing segment that is not a known lookup is part of the field
	/// path, and the condition is an equality test.
	///
	/// ```
	/// use reusable_table::query::{Lookup, Q};
	///
	/// assert_eq!(
	///     Q::lookup("author__name__icontains", "ada"),
	///     Q::new("author__name", Lookup::IContains("ada".into()))
	/// );
	/// assert_eq!(Q::lookup("author__name", "Ada"), Q::exact("author__name", "Ada"));
	/// ```
	pub fn lookup(expr: &str, value: impl Into<Value>) -> Self {
		let value = value.into();
		if let Some((path, name)) = expr.rsplit_once(LOOKUP_SEP) {
			if let Some(lookup) = Lookup::from_name(name, value.clone()) {
				return Self::new(path, lookup);
			}
		}
		Self::exact(expr, value)
	}

	/// Whether the serialized row satisfies this filter
	pub fn matches(&self, row: &Value) -> bool {
		match self {
			Self::All => true,
			Self::Condition { path, lookup } => lookup.matches(resolve_path(row, path)),
			Self::And(children) => children.iter().all(|q| q.matches(row)),
			Self::Or(children) => children.iter().any(|q| q.matches(row)),
			Self::Not(child) => !child.matches(row),
		}
	}
}

impl BitAnd for Q {
	type Output = Q;

	fn bitand(self, rhs: Q) -> Q {
		match (self, rhs) {
			(Q::All, other) | (other, Q::All) => other,
			(Q::And(mut left), Q::And(right)) => {
				left.extend(right);
				Q::And(left)
			}
			(Q::And(mut left), other) => {
				left.push(other);
				Q::And(left)
			}
			(left, right) => Q::And(vec![left, right]),
		}
	}
}

impl BitOr for Q {
	type Output = Q;

	fn bitor(self, rhs: Q) -> Q {
		match (self, rhs) {
			(Q::All, _) | (_, Q::All) => Q::All,
			(Q::Or(mut left), Q::Or(right)) => {
				left.extend(right);
				Q::Or(left)
			}
			(Q::Or(mut left), other) => {
				left.push(other);
				Q::Or(left)
			}
			(left, right) => Q::Or(vec![left, right]),
		}
	}
}

impl Not for Q {
	type Output = Q;

	fn not(self) -> Q {
		match self {
			Q::Not(inner) => *inner,
			other => Q::Not(Box::new(other)),
		}
	}
}
