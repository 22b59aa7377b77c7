//! In-memory query sets

use super::q::Q;
use super::value::{compare_values, resolve_path};
use super::{Model, Row};
use crate::error::Result;
use crate::sort::SortOrder;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Record<M> {
	object: M,
	value: Value,
}

/// An ordered collection of model objects that can be filtered, ordered
/// and de-duplicated
///
/// Each object is serialized once when the query set is built; filters and
/// orderings run against that serialized form.
///
/// # Examples
///
/// ```
/// use reusable_table::query::{QuerySet, Q};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Book {
///     title: String,
///     year: u32,
/// }
///
/// let books = QuerySet::from_objects(vec![
///     Book { title: "Dune".into(), year: 1965 },
///     Book { title: "Emma".into(), year: 1815 },
///     Book { title: "Ubik".into(), year: 1969 },
/// ])
/// .unwrap()
/// .filter(&Q::lookup("year__gt", 1900))
/// .order_by("-year");
///
/// let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
/// assert_eq!(titles, vec!["Ubik", "Dune"]);
/// ```
#[derive(Debug, Clone)]
pub struct QuerySet<M> {
	records: Vec<Record<M>>,
}

impl<M> Default for QuerySet<M> {
	fn default() -> Self {
		Self {
			records: Vec::new(),
		}
	}
}

impl<M: Serialize> QuerySet<M> {
	/// Builds a query set, serializing every object
	pub fn from_objects(objects: Vec<M>) -> Result<Self> {
		let records = objects
			.into_iter()
			.map(|object| {
				let value = serde_json::to_value(&object)?;
				Ok(Record { object, value })
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Self { records })
	}
}

impl<M> QuerySet<M> {
	/// Keeps the objects matching `q`
	pub fn filter(mut self, q: &Q) -> Self {
		self.records.retain(|record| q.matches(&record.value));
		self
	}

	/// Drops the objects matching `q`
	pub fn exclude(mut self, q: &Q) -> Self {
		self.records.retain(|record| !q.matches(&record.value));
		self
	}

	/// Drops objects whose serialized form equals an earlier object's
	pub fn distinct(mut self) -> Self {
		let mut seen = HashSet::new();
		self.records
			.retain(|record| seen.insert(record.value.to_string()));
		self
	}

	/// Orders by a field path; a leading `-` orders descending
	///
	/// The sort is stable, so objects with equal keys keep their relative
	/// order.
	pub fn order_by(mut self, ordering: &str) -> Self {
		let (order, path) = SortOrder::parse_ordering(ordering);
		sort_by_path(&mut self.records, |record| &record.value, path, order);
		self
	}

	/// Keeps at most `limit` objects starting at `offset`
	pub fn slice(mut self, offset: usize, limit: Option<usize>) -> Self {
		let start = offset.min(self.records.len());
		let end = limit
			.map(|limit| start.saturating_add(limit).min(self.records.len()))
			.unwrap_or(self.records.len());
		self.records.truncate(end);
		self.records.drain(..start);
		self
	}

	/// Number of objects
	pub fn count(&self) -> usize {
		self.records.len()
	}

	/// Whether the query set is empty
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Iterates over the objects
	pub fn iter(&self) -> impl Iterator<Item = &M> {
		self.records.iter().map(|record| &record.object)
	}

	/// Iterates over the serialized objects
	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.records.iter().map(|record| &record.value)
	}

	/// Consumes the query set into its objects
	pub fn into_objects(self) -> Vec<M> {
		self.records.into_iter().map(|record| record.object).collect()
	}
}

impl<M: Model> QuerySet<M> {
	/// Converts into the rows a table renders
	pub fn into_rows(self) -> Vec<Row> {
		self.records
			.into_iter()
			.map(|record| Row {
				url: record.object.absolute_url(),
				value: record.value,
			})
			.collect()
	}
}

/// Stable sort of `items` by the field at `path`
pub(crate) fn sort_by_path<T, F>(items: &mut [T], value_of: F, path: &str, order: SortOrder)
where
	F: Fn(&T) -> &Value,
{
	items.sort_by(|a, b| {
		let ordering = compare_values(
			resolve_path(value_of(a), path),
			resolve_path(value_of(b), path),
		);
		match order {
			SortOrder::Ascending => ordering,
			SortOrder::Descending => ordering.reverse(),
		}
	});
}
