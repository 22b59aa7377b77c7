//! Paginated, sortable tables with CSV and PDF export
//!
//! A [`Table`] lists the objects of one [`Model`]. Each column is a
//! [`Field`]: a header, the field path it sorts by, and a Tera template
//! (the "bit") rendered once per row. Rendering is driven by the request's
//! query parameters, namespaced by a table key so several tables can share
//! one page:
//!
//! - `format_<key>`: `html` (default), `csv` or `pdf`
//! - `page_<key>`: 1-based page number
//! - `sort_<key>_<column>`: `asc` or `desc`
//!
//! # Features
//!
//! - **Pagination**: windowed page links with ellipses
//! - **Sorting**: one active column per table, toggled from its header
//! - **Export**: CSV always, PDF with the `pdf` feature
//! - **Registry**: named tables rendered together with [`registry::get`]
//! - **i18n**: headers and the `trans` filter go through a [`Translator`]
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[Table] --> B[Fields]
//!     A --> C[ObjectSource]
//!     C --> D[QuerySet]
//!     D --> E[Q filters]
//!     A --> F[Templates]
//!     A --> G[Pagination]
//!     A --> H[Export]
//!     H --> I[CSV]
//!     H --> J[PDF]
//!     K[Registry] --> A
//! ```
//!
//! # Example
//!
//! ```rust
//! use reusable_table::{Field, Model, Q, RenderOptions, Table, TableRequest};
//! use serde::Serialize;
//!
//! #[derive(Clone, Serialize)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     active: bool,
//! }
//!
//! impl Model for User {}
//!
//! let users = vec![
//!     User { id: 1, name: "Ada".into(), active: true },
//!     User { id: 2, name: "Brian".into(), active: false },
//! ];
//! let table = Table::new(
//!     users,
//!     vec![
//!         Field::new("Name", "name", "{{ object.name }}"),
//!         Field::new("Active", "active", "{% if object.active %}yes{% else %}no{% endif %}"),
//!     ],
//!     20,
//!     true,
//! )
//! .unwrap();
//!
//! let request = TableRequest::from_query("format_1=csv");
//! let (_, rendered) = table
//!     .render(&request, "1", Q::exact("active", true), &RenderOptions::new())
//!     .unwrap();
//! let csv = rendered.into_export().unwrap();
//! assert_eq!(csv.body.as_ref(), b"Name,Active\r\nAda,yes\r\n");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod column;
pub mod error;
pub mod export;
pub mod format;
pub mod i18n;
pub mod pagination;
pub mod query;
pub mod registry;
pub mod request;
pub mod response;
pub mod settings;
pub mod sort;
pub mod table;
pub mod templates;

pub use column::{ColumnState, Field};
pub use error::{Result, TableError};
pub use format::{Format, Rendered, available_formats};
pub use i18n::{MessageCatalog, NullTranslator, Translator};
pub use pagination::{Jump, Page, Paginated};
pub use query::{Lookup, Model, ObjectSource, Q, QuerySet, Row};
pub use request::{TableRequest, TableUser};
pub use response::ExportResponse;
pub use settings::TableSettings;
pub use sort::SortOrder;
pub use table::{HtmlContext, RenderOptions, Table, TableBuilder, TableQuery};
pub use templates::TableTemplates;
