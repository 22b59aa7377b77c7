//! Global table registry for rendering several tables in one request
//!
//! Tables are registered under a name and rendered together with
//! [`get`], each one receiving the key of its position (`"1"`, `"2"`, …)
//! so their pagination and sort parameters do not collide.

use crate::column::Field;
use crate::error::{Result, TableError};
use crate::format::{Format, Rendered};
use crate::query::{Model, ObjectSource, Q};
use crate::request::TableRequest;
use crate::table::{RenderOptions, Table};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Type-erased table
pub trait AnyTable: Send + Sync {
	/// Name of the listed model
	fn model_name(&self) -> &'static str;

	/// Renders the rows matching `q` (see [`Table::render`])
	fn render_filtered(
		&self,
		request: &TableRequest,
		key: &str,
		q: Q,
		options: &RenderOptions,
	) -> Result<(Format, Rendered)>;
}

impl<M: Model> AnyTable for Table<M> {
	fn model_name(&self) -> &'static str {
		M::model_name()
	}

	fn render_filtered(
		&self,
		request: &TableRequest,
		key: &str,
		q: Q,
		options: &RenderOptions,
	) -> Result<(Format, Rendered)> {
		self.render(request, key, q, options)
	}
}

static TABLES: Lazy<RwLock<HashMap<String, Arc<dyn AnyTable>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `table` under `name`, replacing any table of that name
pub fn register(name: impl Into<String>, table: impl AnyTable + 'static) {
	let name = name.into();
	tracing::debug!(table = %name, "registering table");
	TABLES.write().insert(name, Arc::new(table));
}

/// Builds a table from its parts and registers it under `name`
pub fn register_table<M: Model>(
	name: impl Into<String>,
	source: impl ObjectSource<M> + 'static,
	fields: Vec<Field>,
	size: usize,
	link_first: bool,
) -> Result<()> {
	let table = Table::new(source, fields, size, link_first)?;
	register(name, table);
	Ok(())
}

/// Removes a table; returns whether it was registered
pub fn unregister(name: &str) -> bool {
	TABLES.write().remove(name).is_some()
}

/// Whether a table is registered under `name`
pub fn is_registered(name: &str) -> bool {
	TABLES.read().contains_key(name)
}

/// Names of all registered tables, sorted
pub fn table_names() -> Vec<String> {
	let mut names: Vec<String> = TABLES.read().keys().cloned().collect();
	names.sort();
	names
}

/// Removes every table
///
/// This is primarily useful for testing.
pub fn clear() {
	TABLES.write().clear();
}

fn lookup(name: &str) -> Result<Arc<dyn AnyTable>> {
	TABLES
		.read()
		.get(name)
		.cloned()
		.ok_or_else(|| TableError::UnknownTable(name.to_string()))
}

/// Renders each `(name, q)` tab in order
///
/// Every table resolves before rendering starts, so an unknown name fails
/// the whole call. Tables render with keys `"1"`, `"2"`, … by position.
fn render_tabs<'a>(
	request: &TableRequest,
	tabs: &'a [(&'a str, Q)],
	options: &RenderOptions,
) -> Result<(Option<Rendered>, Vec<(&'a str, Rendered)>)> {
	let tables = tabs
		.iter()
		.map(|(name, _)| lookup(name))
		.collect::<Result<Vec<_>>>()?;

	let mut nonhtml = None;
	let mut results = Vec::with_capacity(tabs.len());
	for (index, ((name, q), table)) in tabs.iter().zip(tables).enumerate() {
		let key = (index + 1).to_string();
		let (format, rendered) = table.render_filtered(request, &key, q.clone(), options)?;
		if format != Format::Html && nonhtml.is_none() {
			nonhtml = Some(rendered.clone());
		}
		results.push((*name, rendered));
	}
	Ok((nonhtml, results))
}

/// Renders registered tables into one page
///
/// Returns the first non-HTML result, if any (a download requested for
/// one of the tables), and every table's result in tab order.
///
/// # Example
///
/// ```rust
/// use reusable_table::{registry, Field, Model, Q, RenderOptions, TableRequest};
/// use serde::Serialize;
///
/// #[derive(Clone, Serialize)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Model for Tag {}
///
/// let tags = vec![Tag { label: "rust".into() }, Tag { label: "web".into() }];
/// registry::register_table(
///     "doc_tags",
///     tags,
///     vec![Field::new("Label", "label", "{{ object.label }}")],
///     10,
///     false,
/// )
/// .unwrap();
///
/// let request = TableRequest::from_query("format_1=csv");
/// let (download, results) =
///     registry::get(&request, &[("doc_tags", Q::all())], &RenderOptions::new()).unwrap();
///
/// let download = download.unwrap().into_export().unwrap();
/// assert_eq!(download.body.as_ref(), b"Label\r\nrust\r\nweb\r\n");
/// assert_eq!(results.len(), 1);
/// # registry::unregister("doc_tags");
/// ```
pub fn get(
	request: &TableRequest,
	tabs: &[(&str, Q)],
	options: &RenderOptions,
) -> Result<(Option<Rendered>, Vec<Rendered>)> {
	let (nonhtml, results) = render_tabs(request, tabs, options)?;
	Ok((nonhtml, results.into_iter().map(|(_, r)| r).collect()))
}

/// Like [`get`], forcing `final_rows` into every table
pub fn get_with_final_rows(
	request: &TableRequest,
	tabs: &[(&str, Q)],
	options: &RenderOptions,
	final_rows: Vec<Value>,
) -> Result<(Option<Rendered>, Vec<Rendered>)> {
	let options = options.clone().with_final_rows(final_rows);
	get(request, tabs, &options)
}

/// Like [`get`], with results keyed by table name in tab order
///
/// A name appearing twice keeps its first position and its last result.
pub fn get_dict(
	request: &TableRequest,
	tabs: &[(&str, Q)],
	options: &RenderOptions,
) -> Result<(Option<Rendered>, IndexMap<String, Rendered>)> {
	let (nonhtml, results) = render_tabs(request, tabs, options)?;
	let results = results
		.into_iter()
		.map(|(name, rendered)| (name.to_string(), rendered))
		.collect();
	Ok((nonhtml, results))
}
