//! Table definitions and the format handlers
//!
//! A [`Table`] turns a query over one model into a paginated, sortable HTML
//! table, or into a CSV or PDF download, depending on the request:
//!
//! ```mermaid
//! graph LR
//!     R[TableRequest] --> D{format_key}
//!     D -->|html| H[sort + paginate + bits] --> W[wrapper + pagination]
//!     D -->|csv| C[bits] --> CSV[text/csv attachment]
//!     D -->|pdf| P[bits] --> PDF[application/pdf attachment]
//! ```

use crate::column::{ColumnState, Field};
use crate::error::{Result, TableError};
use crate::export;
use crate::format::{Format, Rendered, available_formats};
use crate::i18n::{NullTranslator, Translator};
use crate::pagination::{Paginated, paginate_with_window};
use crate::query::queryset::sort_by_path;
use crate::query::{Model, ObjectSource, Q, QuerySet, Row};
use crate::request::TableRequest;
use crate::response::ExportResponse;
use crate::settings::TableSettings;
use crate::sort::SortOrder;
use crate::templates::{Engine, PAGINATION, TableTemplates, WRAPPER};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tera::Context;

/// Rows a table is rendered from
#[derive(Debug, Clone)]
pub enum TableQuery<M> {
	/// A query set used as is
	QuerySet(QuerySet<M>),
	/// A filter applied to every object of the table's model
	Filter(Q),
}

impl<M> From<QuerySet<M>> for TableQuery<M> {
	fn from(queryset: QuerySet<M>) -> Self {
		Self::QuerySet(queryset)
	}
}

impl<M> From<Q> for TableQuery<M> {
	fn from(q: Q) -> Self {
		Self::Filter(q)
	}
}

/// Per-call rendering options
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
	/// Extra values for every cell context; they override the defaults
	pub extra_context: Option<Map<String, Value>>,
	/// Page size overriding the table's own
	pub size: Option<usize>,
	/// De-duplicate rows selected by a filter
	pub distinct: bool,
	/// Pre-built rows rendered instead of the query
	///
	/// An empty list is ignored and the query is used.
	pub final_rows: Option<Vec<Value>>,
}

impl RenderOptions {
	/// Default options
	pub fn new() -> Self {
		Self::default()
	}

	/// Add one extra context value
	pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra_context
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	/// Replace the extra context
	pub fn with_extra_context(mut self, extra_context: Map<String, Value>) -> Self {
		self.extra_context = Some(extra_context);
		self
	}

	/// Override the page size
	pub fn with_size(mut self, size: usize) -> Self {
		self.size = Some(size);
		self
	}

	/// De-duplicate filtered rows
	pub fn with_distinct(mut self, distinct: bool) -> Self {
		self.distinct = distinct;
		self
	}

	/// Force these rows into the table
	pub fn with_final_rows(mut self, rows: Vec<Value>) -> Self {
		self.final_rows = Some(rows);
		self
	}
}

/// Context the HTML templates are rendered with
#[derive(Debug, Clone, Serialize)]
pub struct HtmlContext {
	/// Header state of every column
	pub columns: Vec<ColumnState>,
	/// Rendered cells of each row on the page
	pub rows: Vec<String>,
	/// Pagination of the whole result set
	pub object_list: Paginated,
	/// Key of the table within the request
	pub table_key: String,
	/// Export formats offered under the table
	pub formats: Vec<&'static str>,
	/// Request parameter of the active sort
	pub sort_key: Option<String>,
	/// Direction of the active sort (`asc` when unsorted)
	pub sort_value: SortOrder,
	/// Request parameters to carry over in table links
	pub filtered_query: String,
	/// The active sort as `sort_<key>_<column>=<order>`, empty when unsorted
	pub sort_query: String,
}

/// A paginated list of one model
///
/// # Example
///
/// ```rust
/// use reusable_table::{Format, Model, Q, RenderOptions, Table, TableRequest};
/// use serde::Serialize;
///
/// #[derive(Clone, Serialize)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl Model for User {
///     fn absolute_url(&self) -> Option<String> {
///         Some(format!("/users/{}/", self.id))
///     }
/// }
///
/// let users = vec![
///     User { id: 1, name: "Bob".into() },
///     User { id: 2, name: "Alice".into() },
/// ];
/// let table = Table::builder(users)
///     .field(("Name", "name", "{{ object.name }}"))
///     .field(("ID", "id", "{{ object.id }}"))
///     .size(10)
///     .build()
///     .unwrap();
///
/// let request = TableRequest::from_query("sort_1_name=asc");
/// let (format, rendered) = table.render(&request, "1", Q::all(), &RenderOptions::new()).unwrap();
/// assert_eq!(format, Format::Html);
///
/// let html = rendered.as_html().unwrap();
/// assert!(html.find("Alice").unwrap() < html.find("Bob").unwrap());
/// ```
pub struct Table<M> {
	source: Arc<dyn ObjectSource<M>>,
	fields: Vec<Field>,
	size: usize,
	link_first: bool,
	settings: TableSettings,
	translator: Arc<dyn Translator>,
	engine: Engine,
}

/// Builder for [`Table`]
pub struct TableBuilder<M> {
	source: Arc<dyn ObjectSource<M>>,
	fields: Vec<Field>,
	size: Option<usize>,
	link_first: bool,
	settings: TableSettings,
	translator: Arc<dyn Translator>,
	templates: TableTemplates,
}

impl<M: Model> TableBuilder<M> {
	/// Add a field
	pub fn field(mut self, field: impl Into<Field>) -> Self {
		self.fields.push(field.into());
		self
	}

	/// Add several fields
	pub fn fields<I, F>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = F>,
		F: Into<Field>,
	{
		self.fields.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Rows per page (defaults to the settings' `default_page_size`)
	pub fn size(mut self, size: usize) -> Self {
		self.size = Some(size);
		self
	}

	/// Whether the first cell links to the row's detail page (default: true)
	pub fn link_first(mut self, link_first: bool) -> Self {
		self.link_first = link_first;
		self
	}

	/// Settings for filenames, window width and PDF title
	pub fn settings(mut self, settings: TableSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Translator for headers and the `trans` filter
	pub fn translator(mut self, translator: impl Translator + 'static) -> Self {
		self.translator = Arc::new(translator);
		self
	}

	/// Replace the built-in templates
	pub fn templates(mut self, templates: TableTemplates) -> Self {
		self.templates = templates;
		self
	}

	/// Compile the templates and build the table
	///
	/// Fails when a field has an empty header or a bit does not compile.
	pub fn build(self) -> Result<Table<M>> {
		if let Some(field) = self.fields.iter().find(|f| f.name().is_empty()) {
			return Err(TableError::InvalidField {
				field: field.column().to_string(),
				message: "header must not be empty".to_string(),
			});
		}

		let engine = Engine::new(&self.templates, &self.fields, Arc::clone(&self.translator))?;
		let size = self
			.size
			.filter(|size| *size > 0)
			.unwrap_or(self.settings.default_page_size);

		Ok(Table {
			source: self.source,
			fields: self.fields,
			size,
			link_first: self.link_first,
			settings: self.settings,
			translator: self.translator,
			engine,
		})
	}
}

impl<M: Model> Table<M> {
	/// Start building a table over every object `source` yields
	pub fn builder(source: impl ObjectSource<M> + 'static) -> TableBuilder<M> {
		TableBuilder {
			source: Arc::new(source),
			fields: Vec::new(),
			size: None,
			link_first: true,
			settings: TableSettings::default(),
			translator: Arc::new(NullTranslator),
			templates: TableTemplates::default(),
		}
	}

	/// Build a table with default settings and templates
	pub fn new(
		source: impl ObjectSource<M> + 'static,
		fields: Vec<Field>,
		size: usize,
		link_first: bool,
	) -> Result<Self> {
		Self::builder(source)
			.fields(fields)
			.size(size)
			.link_first(link_first)
			.build()
	}

	/// The table's fields
	pub fn fields(&self) -> &[Field] {
		&self.fields
	}

	/// Default rows per page
	pub fn size(&self) -> usize {
		self.size
	}

	/// Whether the first cell links to the row's detail page
	pub fn link_first(&self) -> bool {
		self.link_first
	}

	/// The table's settings
	pub fn settings(&self) -> &TableSettings {
		&self.settings
	}

	/// Recompile the table with other templates
	pub fn with_templates(mut self, templates: TableTemplates) -> Result<Self> {
		self.engine = Engine::new(&templates, &self.fields, Arc::clone(&self.translator))?;
		Ok(self)
	}

	/// Render the table for `request`
	///
	/// `key` identifies this table among several on one page: its format,
	/// page and sort are read from `format_<key>`, `page_<key>` and
	/// `sort_<key>_<column>`.
	///
	/// # Errors
	///
	/// - [`TableError::UnsupportedFormat`] for an unknown `format_<key>`
	/// - [`TableError::FormatUnavailable`] for `pdf` without the `pdf` feature
	/// - template, serialization and source errors
	pub fn render(
		&self,
		request: &TableRequest,
		key: &str,
		query: impl Into<TableQuery<M>>,
		options: &RenderOptions,
	) -> Result<(Format, Rendered)> {
		let format = Format::from_request(request, key)?;
		let rows = self.resolve_rows(query.into(), options)?;

		tracing::debug!(
			model = M::model_name(),
			key,
			%format,
			rows = rows.len(),
			"rendering table"
		);

		let rendered = match format {
			Format::Html => Rendered::Html(self.handle_html(request, key, rows, options)?),
			Format::Csv => Rendered::Export(self.handle_csv(&rows, options)?),
			Format::Pdf => Rendered::Export(self.handle_pdf(&rows, options)?),
		};
		Ok((format, rendered))
	}

	fn resolve_rows(&self, query: TableQuery<M>, options: &RenderOptions) -> Result<Vec<Row>> {
		if let Some(rows) = options.final_rows.as_ref().filter(|rows| !rows.is_empty()) {
			return Ok(rows.iter().cloned().map(Row::from_value).collect());
		}

		let queryset = match query {
			TableQuery::QuerySet(queryset) => queryset,
			TableQuery::Filter(q) => {
				let queryset = QuerySet::from_objects(self.source.objects()?)?.filter(&q);
				if options.distinct {
					queryset.distinct()
				} else {
					queryset
				}
			}
		};
		Ok(queryset.into_rows())
	}

	/// The column selected by `sort_<key>_<column>`; the first match wins
	fn active_sort(&self, request: &TableRequest, key: &str) -> Option<(usize, SortOrder)> {
		self.fields
			.iter()
			.enumerate()
			.filter(|(_, field)| field.sortable())
			.find_map(|(index, field)| {
				request
					.get(&field.sort_param(key))
					.and_then(SortOrder::from_param)
					.map(|order| (index, order))
			})
	}

	fn header(&self, field: &Field) -> String {
		self.translator.gettext(field.name())
	}

	/// Build the context of the HTML templates without rendering them
	pub fn html_context(
		&self,
		request: &TableRequest,
		key: &str,
		mut rows: Vec<Row>,
		options: &RenderOptions,
	) -> Result<HtmlContext> {
		let active = self.active_sort(request, key);
		if let Some((index, order)) = active {
			let column = self.fields[index].column();
			tracing::debug!(key, column, order = order.as_param(), "sorting table");
			sort_by_path(&mut rows, |row| &row.value, column, order);
		}

		let size = options.size.filter(|size| *size > 0).unwrap_or(self.size);
		let object_list = paginate_with_window(
			rows.len(),
			request.get(&format!("page_{}", key)),
			size,
			self.settings.window_side,
		);

		let user = request.user().cloned().unwrap_or(Value::Null);
		let mut rendered_rows = Vec::with_capacity(object_list.page.len);
		for (offset, row) in rows[object_list.page.range()].iter().enumerate() {
			let counter = offset + 1;
			tracing::trace!(key, counter, "rendering row");
			let mut context = Context::new();
			context.insert("object", &row.value);
			context.insert("counter", &counter);
			context.insert("total_counter", &(object_list.page.start_index + counter - 1));
			context.insert("user", &user);
			extend_context(&mut context, options.extra_context.as_ref());

			let mut link = row.url.as_deref().filter(|_| self.link_first);
			let mut cells = String::new();
			for index in 0..self.fields.len() {
				let content = self.engine.render_bit(index, &context)?;
				cells.push_str(&self.engine.render_cell(&content, link.take())?);
			}
			rendered_rows.push(cells);
		}

		let columns = self
			.fields
			.iter()
			.enumerate()
			.map(|(index, field)| {
				let sorted = active
					.filter(|(active_index, _)| *active_index == index)
					.map(|(_, order)| order);
				ColumnState::new(field, key, self.header(field), sorted)
			})
			.collect();

		let sort_key = active.map(|(index, _)| self.fields[index].sort_param(key));
		let sort_value = active
			.map(|(_, order)| order)
			.unwrap_or(SortOrder::Ascending);
		let filtered_query = request.encode_filtered(|name| {
			!name.starts_with("page_") && Some(name) != sort_key.as_deref()
		});
		let sort_query = sort_key
			.as_ref()
			.map(|sort_key| format!("{}={}", sort_key, sort_value.as_param()))
			.unwrap_or_default();

		Ok(HtmlContext {
			columns,
			rows: rendered_rows,
			object_list,
			table_key: key.to_string(),
			formats: available_formats().iter().map(Format::as_str).collect(),
			sort_key,
			sort_value,
			filtered_query,
			sort_query,
		})
	}

	/// Render the sorted, paginated HTML table followed by its page links
	pub fn handle_html(
		&self,
		request: &TableRequest,
		key: &str,
		rows: Vec<Row>,
		options: &RenderOptions,
	) -> Result<String> {
		let html_context = self.html_context(request, key, rows, options)?;
		let context = Context::from_serialize(&html_context)?;
		let mut html = self.engine.render(WRAPPER, &context)?;
		html.push_str(&self.engine.render(PAGINATION, &context)?);
		Ok(html)
	}

	/// Cells of every row, rendered with `object` and the extra context
	///
	/// `counter`, `total_counter` and `user` are null here, so bits shared
	/// with the HTML view print nothing for them.
	fn plain_cells(&self, rows: &[Row], options: &RenderOptions) -> Result<Vec<Vec<String>>> {
		rows.iter()
			.map(|row| {
				let mut context = Context::new();
				context.insert("object", &row.value);
				for name in ["counter", "total_counter", "user"] {
					context.insert(name, &Value::Null);
				}
				extend_context(&mut context, options.extra_context.as_ref());
				(0..self.fields.len())
					.map(|index| self.engine.render_bit(index, &context))
					.collect()
			})
			.collect()
	}

	/// Render every row as a CSV download
	///
	/// The header row is only written when there is at least one data row.
	pub fn handle_csv(&self, rows: &[Row], options: &RenderOptions) -> Result<ExportResponse> {
		let cells = self.plain_cells(rows, options)?;
		let header: Vec<String> = self.fields.iter().map(|f| self.header(f)).collect();
		let body = export::csv::write_table(&header, &cells)?;
		ExportResponse::attachment("text/csv", &self.settings.csv_filename, body)
	}

	/// Render every row as a PDF download
	#[cfg(feature = "pdf")]
	pub fn handle_pdf(&self, rows: &[Row], options: &RenderOptions) -> Result<ExportResponse> {
		let cells = self.plain_cells(rows, options)?;
		let header: Vec<String> = self.fields.iter().map(|f| self.header(f)).collect();
		let document = export::pdf::PdfDocument {
			title: self.settings.site_title.as_deref(),
			heading: format!("{} List", M::model_name()),
			header: &header,
			rows: &cells,
			created: chrono::Local::now().date_naive(),
		};
		ExportResponse::attachment(
			"application/pdf",
			&self.settings.pdf_filename,
			export::pdf::render(&document),
		)
	}

	/// Render every row as a PDF download
	///
	/// This build has no PDF support, so this always fails.
	#[cfg(not(feature = "pdf"))]
	pub fn handle_pdf(&self, _rows: &[Row], _options: &RenderOptions) -> Result<ExportResponse> {
		Err(TableError::FormatUnavailable(Format::Pdf.to_string()))
	}
}

impl<M> std::fmt::Debug for Table<M> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Table")
			.field("fields", &self.fields)
			.field("size", &self.size)
			.field("link_first", &self.link_first)
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}

fn extend_context(context: &mut Context, extra: Option<&Map<String, Value>>) {
	for (key, value) in extra.into_iter().flatten() {
		context.insert(key.as_str(), value);
	}
}
