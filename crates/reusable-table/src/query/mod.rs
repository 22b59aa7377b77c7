//! Models, object sources and query sets feeding a table

pub mod q;
pub mod queryset;
pub mod value;

pub use q::{Lookup, Q};
pub use queryset::QuerySet;

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// A type whose instances are listed in a table
///
/// Rows are exposed to cell bits in their serialized form, so
/// `{{ object.name }}` reads the `name` field.
pub trait Model: Serialize + Send + Sync + 'static {
	/// Name shown in export headings (`<name> List`)
	///
	/// Defaults to the type's name without its module path.
	fn model_name() -> &'static str
	where
		Self: Sized,
	{
		let name = std::any::type_name::<Self>();
		name.rsplit("::").next().unwrap_or(name)
	}

	/// Detail page of this object
	///
	/// When present, the first cell of the object's row links to it.
	fn absolute_url(&self) -> Option<String> {
		None
	}
}

/// Supplies every object of a model; filters are applied afterwards
pub trait ObjectSource<M>: Send + Sync {
	/// Returns all objects
	fn objects(&self) -> Result<Vec<M>>;
}

impl<M: Clone + Send + Sync> ObjectSource<M> for Vec<M> {
	fn objects(&self) -> Result<Vec<M>> {
		Ok(self.clone())
	}
}

/// Object source backed by a closure
pub struct FnObjects<F>(F);

impl<M, F> ObjectSource<M> for FnObjects<F>
where
	F: Fn() -> Result<Vec<M>> + Send + Sync,
{
	fn objects(&self) -> Result<Vec<M>> {
		(self.0)()
	}
}

/// Wraps a closure returning all objects of a model
///
/// # Examples
///
/// ```
/// use reusable_table::query::{from_fn, ObjectSource};
///
/// let source = from_fn(|| Ok(vec![1, 2, 3]));
/// assert_eq!(source.objects().unwrap(), vec![1, 2, 3]);
/// ```
pub fn from_fn<M, F>(f: F) -> FnObjects<F>
where
	F: Fn() -> Result<Vec<M>> + Send + Sync,
{
	FnObjects(f)
}

/// A row ready to be rendered: its serialized form plus an optional link
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
	/// Serialized row, exposed to bits as `object`
	pub value: Value,
	/// Detail page the first cell links to
	pub url: Option<String>,
}

impl Row {
	/// Row with no detail link
	pub fn from_value(value: Value) -> Self {
		Self { value, url: None }
	}
}
