//! Field access and ordering over serialized rows

use serde_json::Value;
use std::cmp::Ordering;

/// Separator between nested field names in a path
pub const LOOKUP_SEP: &str = "__";

/// Resolves `path` against `value`
///
/// `author__name` reads `value["author"]["name"]`. Numeric segments index
/// into arrays.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	path.split(LOOKUP_SEP).try_fold(value, |current, segment| match current {
		Value::Object(map) => map.get(segment),
		Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	})
}

/// Renders a value the way it would appear in text output
///
/// Strings are unquoted and null is empty.
pub fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn type_rank(value: &Value) -> u8 {
	match value {
		Value::Null => 0,
		Value::Bool(_) => 1,
		Value::Number(_) => 2,
		Value::String(_) => 3,
		Value::Array(_) => 4,
		Value::Object(_) => 5,
	}
}

/// Compares two values of the same kind
///
/// Returns `None` when the kinds differ or the values are objects.
pub fn partial_compare(a: &Value, b: &Value) -> Option<Ordering> {
	match (a, b) {
		(Value::Null, Value::Null) => Some(Ordering::Equal),
		(Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
		(Value::Number(x), Value::Number(y)) => {
			match (x.as_i64(), y.as_i64()) {
				(Some(x), Some(y)) => Some(x.cmp(&y)),
				_ => x.as_f64()?.partial_cmp(&y.as_f64()?),
			}
		}
		(Value::String(x), Value::String(y)) => Some(x.cmp(y)),
		(Value::Array(x), Value::Array(y)) => {
			for (a, b) in x.iter().zip(y) {
				match partial_compare(a, b)? {
					Ordering::Equal => continue,
					other => return Some(other),
				}
			}
			Some(x.len().cmp(&y.len()))
		}
		_ => None,
	}
}

/// Total order used when sorting rows
///
/// Missing values sort as null, nulls sort first, and values of different
/// kinds order by kind. Arrays compare element by element under this same
/// order.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	let a = a.unwrap_or(&Value::Null);
	let b = b.unwrap_or(&Value::Null);
	if let (Value::Array(x), Value::Array(y)) = (a, b) {
		return x
			.iter()
			.zip(y)
			.map(|(a, b)| compare_values(Some(a), Some(b)))
			.find(|ordering| ordering.is_ne())
			.unwrap_or_else(|| x.len().cmp(&y.len()));
	}
	partial_compare(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
}
