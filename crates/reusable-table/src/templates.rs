//! Tera templates used to render tables
//!
//! Every table compiles its own [`Tera`] instance holding the wrapper,
//! pagination and cell templates plus one template per field bit. Bits are
//! named with an `.html` suffix, so their output is HTML-escaped.

use crate::column::Field;
use crate::error::{Result, TableError};
use crate::i18n::Translator;
use crate::query::value::value_text;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context, Function, Tera};

/// Name of the table wrapper template
pub const WRAPPER: &str = "table_wrapper.html";
/// Name of the pagination template
pub const PAGINATION: &str = "pagination.html";
/// Name of the cell template that links to the row's detail page
pub const FIRST_COLUMN: &str = "html_first_column.html";
/// Name of the plain cell template
pub const SECOND_COLUMN: &str = "html_second_column.html";

/// Sources of the templates a table renders with
///
/// Defaults to the templates shipped with this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTemplates {
	/// `<table>` markup; receives the full table context
	pub wrapper: String,
	/// Page links; receives `object_list`, `table_key`, `filtered_query`,
	/// `sort_query`
	pub pagination: String,
	/// Linked cell; receives `url` and `content`
	pub first_column: String,
	/// Plain cell; receives `content`
	pub second_column: String,
}

impl Default for TableTemplates {
	fn default() -> Self {
		Self {
			wrapper: include_str!("../templates/table_wrapper.html").to_string(),
			pagination: include_str!("../templates/pagination.html").to_string(),
			first_column: include_str!("../templates/html_first_column.html").to_string(),
			second_column: include_str!("../templates/html_second_column.html").to_string(),
		}
	}
}

/// Registers the `trans` filter, translating its input through `translator`
///
/// ```
/// use reusable_table::templates::register_trans_filter;
/// use reusable_table::MessageCatalog;
/// use std::sync::Arc;
/// use tera::{Context, Function, Tera};
///
/// let mut catalog = MessageCatalog::new("fr");
/// catalog.add_translation("Yes", "Oui");
///
/// let mut tera = Tera::default();
/// register_trans_filter(&mut tera, Arc::new(catalog));
/// let html = tera.render_str("{{ 'Yes' | trans }}", &Context::new()).unwrap();
/// assert_eq!(html, "Oui");
/// ```
pub fn register_trans_filter(tera: &mut Tera, translator: Arc<dyn Translator>) {
	tera.register_filter(
		"trans",
		move |value: &Value, _args: &HashMap<String, Value>| -> tera::Result<Value> {
			Ok(Value::String(translator.gettext(&value_text(value))))
		},
	);
}

/// Registers the `pagination(object_list=...)` function
///
/// The function renders `template` with the given `object_list` (a
/// serialized [`Paginated`](crate::pagination::Paginated)) and optional
/// `table_key`, `filtered_query` and `sort_query` arguments. Its output is
/// markup and is not escaped again by the calling template.
pub fn register_pagination_function(tera: &mut Tera, template: &str) -> Result<()> {
	let mut inner = Tera::default();
	inner.add_raw_template(PAGINATION, template)?;
	tera.register_function("pagination", PaginationFunction { tera: inner });
	Ok(())
}

/// Renders the pagination template from function arguments
struct PaginationFunction {
	tera: Tera,
}

impl Function for PaginationFunction {
	fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
		let object_list = args
			.get("object_list")
			.ok_or_else(|| tera::Error::msg("pagination() requires an `object_list` argument"))?;

		let mut context = Context::new();
		context.insert("object_list", object_list);
		for name in ["table_key", "filtered_query", "sort_query"] {
			let value = args.get(name).map(value_text).unwrap_or_default();
			context.insert(name, &value);
		}
		self.tera.render(PAGINATION, &context).map(Value::String)
	}

	fn is_safe(&self) -> bool {
		true
	}
}

/// Compiled templates of one table
pub(crate) struct Engine {
	tera: Tera,
	bits: Vec<String>,
}

impl Engine {
	pub(crate) fn new(
		templates: &TableTemplates,
		fields: &[Field],
		translator: Arc<dyn Translator>,
	) -> Result<Self> {
		let mut tera = Tera::default();
		register_trans_filter(&mut tera, translator);
		register_pagination_function(&mut tera, &templates.pagination)?;

		tera.add_raw_templates(vec![
			(WRAPPER, templates.wrapper.as_str()),
			(PAGINATION, templates.pagination.as_str()),
			(FIRST_COLUMN, templates.first_column.as_str()),
			(SECOND_COLUMN, templates.second_column.as_str()),
		])?;

		let mut bits = Vec::with_capacity(fields.len());
		for (index, field) in fields.iter().enumerate() {
			let name = format!("bit_{}.html", index);
			tera.add_raw_template(&name, field.bit())
				.map_err(|e| TableError::InvalidField {
					field: field.name().to_string(),
					message: error_chain(&e),
				})?;
			bits.push(name);
		}

		Ok(Self { tera, bits })
	}

	/// Renders the bit of field `index` against a row context
	///
	/// A bit reading a variable the row does not have renders as an empty
	/// cell.
	pub(crate) fn render_bit(&self, index: usize, context: &Context) -> Result<String> {
		match self.tera.render(&self.bits[index], context) {
			Ok(html) => Ok(html),
			Err(e) if is_missing_variable(&e) => {
				tracing::debug!(
					bit = %self.bits[index],
					error = %error_chain(&e),
					"bit reads a missing variable, rendering an empty cell"
				);
				Ok(String::new())
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Renders one cell, linking it when `url` is given
	pub(crate) fn render_cell(&self, content: &str, url: Option<&str>) -> Result<String> {
		let mut context = Context::new();
		context.insert("content", content);
		match url {
			Some(url) => {
				context.insert("url", url);
				Ok(self.tera.render(FIRST_COLUMN, &context)?)
			}
			None => Ok(self.tera.render(SECOND_COLUMN, &context)?),
		}
	}

	/// Renders a named template
	pub(crate) fn render(&self, name: &str, context: &Context) -> Result<String> {
		Ok(self.tera.render(name, context)?)
	}
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("bits", &self.bits)
			.finish_non_exhaustive()
	}
}

fn is_missing_variable(error: &tera::Error) -> bool {
	error_chain(error).contains("not found in context")
}

fn error_chain(error: &tera::Error) -> String {
	let mut message = error.to_string();
	let mut source = std::error::Error::source(error);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
