
use fixtures::*;
use reusable_table::{
	Field, Format, MessageCatalog, Q, QuerySet, RenderOptions, Rendered, Table, TableError,
	TableRequest, TableSettings,
};
use rstest::*;
use serde_json::json;

fn html(rendered: Rendered) -> String {
	match rendered {
		Rendered::Html(html) => html,
		Rendered::Export(_) => panic!("expected an HTML table"),
	}
}

fn render_html(table: &Table<TestUser>, query: &str) -> String {
	let request = TableRequest::from_query(query);
	let (format, rendered) = table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();
	assert_eq!(format, Format::Html);
	html(rendered)
}

#[rstest]
fn test_html_is_default_format(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "");

	assert!(html.contains("id=\"table_1\""));
	assert!(html.contains("Alice"));
	assert!(html.contains("Bob"));
	assert!(!html.contains("Charlie"));
	assert!(html.contains("id=\"pagination_1\""));
	assert!(html.contains("href=\"?page_1=2\""));
	assert!(html.contains("format_1=csv"));
}

#[rstest]
fn test_first_cell_links_to_detail(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "");
	assert!(html.contains("<td><a href=\"&#x2F;users&#x2F;1&#x2F;\">Alice</a></td><td>alice@example.com</td><td>yes</td>"));
}

#[rstest]
fn test_rows_alternate_classes(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "");
	let odd = html.find("<tr class=\"odd\">").unwrap();
	let even = html.find("<tr class=\"even\">").unwrap();
	assert!(odd < even);
}

#[rstest]
fn test_sort_descending(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "sort_1_name=desc");

	assert!(html.contains("Charlie"));
	assert!(html.contains("Bob"));
	assert!(!html.contains("Alice"));
	assert!(html.find("Charlie").unwrap() < html.find("Bob").unwrap());
	assert!(html.contains("class=\"sorted desc\""));
	// The header link toggles back to ascending
	assert!(html.contains("href=\"?sort_1_name=asc\""));
}

#[rstest]
fn test_sort_ascending_toggles_to_descending(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "sort_1_email=asc");
	assert!(html.contains("class=\"sorted asc\""));
	assert!(html.contains("href=\"?sort_1_email=desc\""));
	assert!(html.contains("href=\"?sort_1_name=asc\""));
}

#[rstest]
fn test_invalid_sort_value_ignored(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "sort_1_name=sideways");
	assert!(!html.contains("class=\"sorted"));
	assert!(html.find("Alice").unwrap() < html.find("Bob").unwrap());
}

#[rstest]
fn test_sort_of_other_table_ignored(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "sort_2_name=desc");
	assert!(html.contains("Alice"));
	assert!(!html.contains("class=\"sorted"));
}

#[rstest]
fn test_second_page(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "page_1=2");
	assert!(html.contains("Charlie"));
	assert!(!html.contains("Alice"));
	assert!(html.contains("<span class=\"current\">2</span>"));
	assert!(html.contains("class=\"previous\" href=\"?page_1=1\""));
}

#[rstest]
#[case("page_1=99")]
#[case("page_1=0")]
#[case("page_1=-3")]
#[case("page_1=abc")]
fn test_bad_page_falls_back_to_first(users_table: Table<TestUser>, #[case] query: &str) {
	let html = render_html(&users_table, query);
	assert!(html.contains("Alice"));
	assert!(html.contains("<span class=\"current\">1</span>"));
}

#[rstest]
fn test_links_keep_other_parameters(users_table: Table<TestUser>) {
	let html = render_html(&users_table, "q=ali&page_1=2&sort_1_name=asc");

	assert!(html.contains("href=\"?q=ali&amp;sort_1_name=asc&amp;page_1=1\""));
	assert!(html.contains("href=\"?q=ali&amp;sort_1_name=desc\""));
	assert!(html.contains("href=\"?q=ali&amp;sort_1_name=asc&amp;format_1=csv\""));
}

#[rstest]
fn test_pagination_window_ellipses(many_users: Vec<TestUser>, user_fields: Vec<Field>) {
	let table = Table::new(many_users, user_fields, 2, true).unwrap();
	let html = render_html(&table, "page_1=12");

	assert!(html.contains("<span class=\"count\">47</span>"));
	assert!(html.contains("<span class=\"current\">12</span>"));
	assert_eq!(html.matches("class=\"ellipsis\"").count(), 2);
	assert!(html.contains("page_1=7\""));
	assert!(html.contains("page_1=17\""));
	assert!(!html.contains("page_1=6\""));
	assert!(!html.contains("page_1=18\""));
}

#[rstest]
fn test_single_page_has_no_pagination(sample_users: Vec<TestUser>, user_fields: Vec<Field>) {
	let table = Table::new(sample_users, user_fields, 10, true).unwrap();
	let html = render_html(&table, "");
	assert!(!html.contains("pagination_1"));
}

#[rstest]
fn test_empty_result(users_table: Table<TestUser>) {
	let request = TableRequest::new();
	let (_, rendered) = users_table
		.render(&request, "1", Q::exact("name", "Nobody"), &RenderOptions::new())
		.unwrap();
	let html = html(rendered);
	assert!(html.contains("<tr class=\"empty\"><td colspan=\"3\"></td></tr>"));
	assert!(!html.contains("pagination_1"));
}

#[rstest]
fn test_filter_selects_rows(users_table: Table<TestUser>) {
	let request = TableRequest::new();
	let (_, rendered) = users_table
		.render(&request, "1", Q::exact("active", true), &RenderOptions::new())
		.unwrap();
	let html = html(rendered);
	assert!(html.contains("Alice"));
	assert!(html.contains("Charlie"));
	assert!(!html.contains("Bob"));
}

#[rstest]
fn test_queryset_rendered_as_given(users_table: Table<TestUser>, sample_users: Vec<TestUser>) {
	let queryset = QuerySet::from_objects(sample_users).unwrap().order_by("-id");
	let (_, rendered) = users_table
		.render(&TableRequest::new(), "1", queryset, &RenderOptions::new())
		.unwrap();
	let html = html(rendered);
	assert!(html.contains("Charlie"));
	assert!(!html.contains("Alice"));
}

#[rstest]
fn test_size_override(users_table: Table<TestUser>) {
	let options = RenderOptions::new().with_size(3);
	let (_, rendered) = users_table
		.render(&TableRequest::new(), "1", Q::all(), &options)
		.unwrap();
	let html = html(rendered);
	assert!(html.contains("Charlie"));
	assert!(!html.contains("pagination_1"));
}

#[rstest]
fn test_zero_size_uses_table_size(users_table: Table<TestUser>) {
	let options = RenderOptions::new().with_size(0);
	let (_, rendered) = users_table
		.render(&TableRequest::new(), "1", Q::all(), &options)
		.unwrap();
	assert!(!html(rendered).contains("Charlie"));
}

#[rstest]
fn test_extra_context_and_user(sample_users: Vec<TestUser>) {
	let table = Table::builder(sample_users)
		.field(("Name", "name", "{{ object.name }}@{{ site }}"))
		.field(("Viewer", "", "{{ user.username }}"))
		.build()
		.unwrap();

	let request = TableRequest::from_query("").with_user(json!({"username": "root"}));
	let options = RenderOptions::new().with_context("site", "acme");
	let (_, rendered) = table.render(&request, "1", Q::all(), &options).unwrap();
	let html = html(rendered);
	assert!(html.contains(">Alice@acme</a></td><td>root</td>"));
}

#[rstest]
fn test_anonymous_user_is_null(sample_users: Vec<TestUser>) {
	let table = Table::builder(sample_users)
		.field(("Viewer", "", "{% if user %}known{% else %}anonymous{% endif %}"))
		.link_first(false)
		.build()
		.unwrap();
	let html = render_html(&table, "");
	assert!(html.contains("<td>anonymous</td>"));
}

#[rstest]
fn test_final_rows_override_query(users_table: Table<TestUser>) {
	let options = RenderOptions::new().with_final_rows(vec![json!({
		"name": "Zed",
		"email": "zed@example.com",
		"active": false,
	})]);
	let (_, rendered) = users_table
		.render(&TableRequest::new(), "1", Q::all(), &options)
		.unwrap();
	let html = html(rendered);
	assert!(html.contains("<td>Zed</td>"));
	assert!(!html.contains("Alice"));
}

#[rstest]
fn test_distinct_drops_duplicates(user_fields: Vec<Field>) {
	let mut users = sample_users();
	users.push(users[0].clone());
	let table = Table::new(users, user_fields, 10, false).unwrap();
	let options = RenderOptions::new().with_distinct(true);
	let (_, rendered) = table
		.render(&TableRequest::new(), "1", Q::all(), &options)
		.unwrap();
	assert_eq!(html(rendered).matches("<td>Alice</td>").count(), 1);
}

#[rstest]
fn test_translated_headers(sample_users: Vec<TestUser>) {
	let mut catalog = MessageCatalog::new("fr");
	catalog.add_translation("Name", "Nom");
	catalog.add_translation("yes", "oui");

	let table = Table::builder(sample_users)
		.field(("Name", "name", "{{ object.name }}"))
		.field(("Active", "", "{% if object.active %}{{ 'yes' | trans }}{% endif %}"))
		.translator(catalog)
		.build()
		.unwrap();

	let html = render_html(&table, "");
	assert!(html.contains(">Nom</a>"));
	assert!(html.contains("<td>oui</td>"));

	let request = TableRequest::from_query("format_1=csv");
	let (_, rendered) = table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();
	let csv = rendered.into_export().unwrap();
	assert!(csv.body.starts_with(b"Nom,Active\r\n"));
}

#[rstest]
fn test_csv_export(users_table: Table<TestUser>) {
	// Sorting and pagination do not apply to downloads
	let request = TableRequest::from_query("format_1=csv&sort_1_name=desc&page_1=2");
	let (format, rendered) = users_table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();

	assert_eq!(format, Format::Csv);
	let response = rendered.into_export().unwrap();
	assert_eq!(response.status, http::StatusCode::OK);
	assert_eq!(response.content_type(), Some("text/csv"));
	assert_eq!(
		response.content_disposition(),
		Some("attachment; filename=report.csv")
	);
	assert_eq!(
		std::str::from_utf8(&response.body).unwrap(),
		"Name,Email,Active\r\n\
		 Alice,alice@example.com,yes\r\n\
		 Bob,bob@example.com,no\r\n\
		 Charlie,charlie@example.com,yes\r\n"
	);
}

#[rstest]
fn test_csv_with_html_only_variables(sample_users: Vec<TestUser>) {
	let table = Table::builder(sample_users)
		.field(("Name", "name", "{{ object.name }}"))
		.field(("Row", "", "{{ counter }}"))
		.field(("Viewer", "", "{{ user.username }}"))
		.build()
		.unwrap();

	let html = render_html(&table, "");
	assert!(html.contains("<td>1</td>"));

	let request = TableRequest::from_query("format_1=csv").with_user(json!({"username": "root"}));
	let (_, rendered) = table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();
	assert_eq!(
		std::str::from_utf8(&rendered.into_export().unwrap().body).unwrap(),
		"Name,Row,Viewer\r\nAlice,,\r\nBob,,\r\nCharlie,,\r\n"
	);
}

#[rstest]
fn test_final_rows_with_missing_keys(users_table: Table<TestUser>) {
	let options = RenderOptions::new().with_final_rows(vec![
		json!({"other": 1}),
		json!({"name": "Zed", "email": "zed@example.com", "active": true}),
	]);

	let (_, rendered) = users_table
		.render(&TableRequest::new(), "1", Q::all(), &options)
		.unwrap();
	let html = html(rendered);
	assert!(html.contains("<td></td><td></td>"));
	assert!(html.contains("<td>Zed</td><td>zed@example.com</td><td>yes</td>"));

	let request = TableRequest::from_query("format_1=csv");
	let (_, rendered) = users_table
		.render(&request, "1", Q::all(), &options)
		.unwrap();
	let body = rendered.into_export().unwrap().body;
	assert!(body.starts_with(b"Name,Email,Active\r\n,,"));
}

#[rstest]
fn test_csv_of_empty_result_is_empty(users_table: Table<TestUser>) {
	let request = TableRequest::from_query("format_1=csv");
	let (_, rendered) = users_table
		.render(&request, "1", Q::exact("name", "Nobody"), &RenderOptions::new())
		.unwrap();
	assert!(rendered.into_export().unwrap().body.is_empty());
}

#[rstest]
fn test_csv_filename_from_settings(sample_users: Vec<TestUser>, user_fields: Vec<Field>) {
	let settings = TableSettings::from_toml_str("csv_filename = \"users.csv\"").unwrap();
	let table = Table::builder(sample_users)
		.fields(user_fields)
		.settings(settings)
		.build()
		.unwrap();
	let request = TableRequest::from_query("format_1=csv");
	let (_, rendered) = table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();
	assert_eq!(
		rendered.as_export().unwrap().content_disposition(),
		Some("attachment; filename=users.csv")
	);
}

#[rstest]
fn test_unsupported_format(users_table: Table<TestUser>) {
	let request = TableRequest::from_query("format_1=xls");
	let result = users_table.render(&request, "1", Q::all(), &RenderOptions::new());
	match result {
		Err(err @ TableError::UnsupportedFormat(_)) => {
			assert_eq!(err.to_string(), "The format: xls is not handled");
		}
		other => panic!("unexpected result: {:?}", other.map(|(format, _)| format)),
	}
}

#[rstest]
fn test_format_of_other_table_ignored(users_table: Table<TestUser>) {
	let request = TableRequest::from_query("format_2=csv");
	let (format, _) = users_table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();
	assert_eq!(format, Format::Html);
}

#[cfg(feature = "pdf")]
#[rstest]
fn test_pdf_export(users_table: Table<TestUser>) {
	let request = TableRequest::from_query("format_1=pdf");
	let (format, rendered) = users_table
		.render(&request, "1", Q::all(), &RenderOptions::new())
		.unwrap();

	assert_eq!(format, Format::Pdf);
	let response = rendered.into_export().unwrap();
	assert_eq!(response.content_type(), Some("application/pdf"));
	assert_eq!(
		response.content_disposition(),
		Some("attachment; filename=report.pdf")
	);
	assert!(response.body.starts_with(b"%PDF-"));
	let body = response.body.as_ref();
	assert!(body.windows(b"(TestUser List)".len()).any(|w| w == b"(TestUser List)"));
}

#[cfg(not(feature = "pdf"))]
#[rstest]
fn test_pdf_unavailable(users_table: Table<TestUser>) {
	let request = TableRequest::from_query("format_1=pdf");
	let result = users_table.render(&request, "1", Q::all(), &RenderOptions::new());
	assert!(matches!(result, Err(TableError::FormatUnavailable(ref f)) if f == "pdf"));
}

#[rstest]
fn test_invalid_bit_fails_build(sample_users: Vec<TestUser>) {
	let result = Table::builder(sample_users)
		.field(("Name", "name", "{% if %}"))
		.build();
	assert!(matches!(result, Err(TableError::InvalidField { .. })));
}
