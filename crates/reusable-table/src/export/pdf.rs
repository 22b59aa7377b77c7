//! PDF export
//!
//! Tables are laid out on landscape letter pages using the built-in
//! Helvetica font: an optional site title, a `<Model> List` heading, then a
//! grid with a bold rule under the header and light rules between rows.
//! Rows alternate between a whitesmoke and a white background, and the
//! creation date closes the document.
//!
//! Columns share the page width equally and cells do not wrap: text longer
//! than its column is cut and ends with `...`. Use the CSV export when full
//! cell contents are needed.

use chrono::NaiveDate;
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const PAGE_WIDTH: f32 = 792.0;
const PAGE_HEIGHT: f32 = 612.0;
const MARGIN: f32 = 72.0;
const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 18.0;
const CELL_PADDING: f32 = 4.0;
const FONT: Name<'static> = Name(b"F1");

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const LIGHT_GREY: (f32, f32, f32) = (0.827, 0.827, 0.827);
const WHITE_SMOKE: (f32, f32, f32) = (0.961, 0.961, 0.961);

/// Everything printed in one PDF export
#[derive(Debug, Clone)]
pub struct PdfDocument<'a> {
	/// Site title printed above the heading
	pub title: Option<&'a str>,
	/// Heading naming the listed model
	pub heading: String,
	/// Column headers
	pub header: &'a [String],
	/// Rendered cells; HTML tags are stripped before printing
	pub rows: &'a [Vec<String>],
	/// Date printed in the footer
	pub created: NaiveDate,
}

/// Lays out `document` and returns the PDF bytes
pub fn render(document: &PdfDocument<'_>) -> Vec<u8> {
	let mut layout = Layout::new();

	if let Some(title) = document.title {
		layout.reserve(TITLE_SIZE * 2.0);
		layout.advance(TITLE_SIZE * 1.5);
		layout.text(MARGIN, TITLE_SIZE, title);
	}
	layout.reserve(HEADING_SIZE * 2.0);
	layout.advance(HEADING_SIZE * 1.5);
	layout.text(MARGIN, HEADING_SIZE, &document.heading);
	layout.advance(HEADING_SIZE * 0.5);

	let columns = document.header.len().max(1);
	let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns as f32;

	layout.row(document.header, column_width, WHITE_SMOKE, (2.0, BLACK));
	for (index, row) in document.rows.iter().enumerate() {
		let cells: Vec<String> = row.iter().map(|cell| plain_text(cell)).collect();
		let background = if index % 2 == 0 { (1.0, 1.0, 1.0) } else { WHITE_SMOKE };
		layout.row(&cells, column_width, background, (0.5, LIGHT_GREY));
	}

	layout.reserve(BODY_SIZE * 3.0);
	layout.advance(BODY_SIZE * 2.5);
	let footer = format!("Created: {}", document.created.format("%d/%m/%Y"));
	layout.text(MARGIN, BODY_SIZE, &footer);

	layout.finish()
}

/// Cursor over a growing list of pages
struct Layout {
	pages: Vec<Content>,
	y: f32,
}

impl Layout {
	fn new() -> Self {
		Self {
			pages: vec![Content::new()],
			y: PAGE_HEIGHT - MARGIN,
		}
	}

	fn content(&mut self) -> &mut Content {
		if self.pages.is_empty() {
			self.pages.push(Content::new());
		}
		let last = self.pages.len() - 1;
		&mut self.pages[last]
	}

	/// Starts a new page unless `height` still fits on the current one
	fn reserve(&mut self, height: f32) {
		if self.y - height < MARGIN {
			self.pages.push(Content::new());
			self.y = PAGE_HEIGHT - MARGIN;
		}
	}

	fn advance(&mut self, height: f32) {
		self.y -= height;
	}

	fn text(&mut self, x: f32, size: f32, text: &str) {
		let y = self.y;
		let encoded = encode(text);
		let content = self.content();
		content.set_fill_rgb(BLACK.0, BLACK.1, BLACK.2);
		content.begin_text();
		content.set_font(FONT, size);
		content.next_line(x, y);
		content.show(Str(&encoded));
		content.end_text();
	}

	fn row(
		&mut self,
		cells: &[String],
		column_width: f32,
		background: (f32, f32, f32),
		rule: (f32, (f32, f32, f32)),
	) {
		self.reserve(ROW_HEIGHT);
		self.advance(ROW_HEIGHT);
		let y = self.y;
		let width = PAGE_WIDTH - 2.0 * MARGIN;

		let content = self.content();
		content.set_fill_rgb(background.0, background.1, background.2);
		content.rect(MARGIN, y, width, ROW_HEIGHT);
		content.fill_nonzero();

		let (line_width, color) = rule;
		content.set_stroke_rgb(color.0, color.1, color.2);
		content.set_line_width(line_width);
		content.move_to(MARGIN, y);
		content.line_to(MARGIN + width, y);
		content.stroke();

		for (index, cell) in cells.iter().enumerate() {
			let x = MARGIN + index as f32 * column_width + CELL_PADDING;
			self.y = y + (ROW_HEIGHT - BODY_SIZE) / 2.0 + 1.0;
			self.text(x, BODY_SIZE, &fit(cell, column_width - 2.0 * CELL_PADDING));
		}
		self.y = y;
	}

	fn finish(self) -> Vec<u8> {
		let catalog_id = Ref::new(1);
		let tree_id = Ref::new(2);
		let font_id = Ref::new(3);
		let page_ids: Vec<Ref> = (0..self.pages.len())
			.map(|index| Ref::new(4 + 2 * index as i32))
			.collect();

		let mut pdf = Pdf::new();
		pdf.catalog(catalog_id).pages(tree_id);
		pdf.pages(tree_id)
			.kids(page_ids.iter().copied())
			.count(page_ids.len() as i32);

		for (content, page_id) in self.pages.into_iter().zip(&page_ids) {
			let content_id = Ref::new(page_id.get() + 1);
			{
				let mut page = pdf.page(*page_id);
				page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
				page.parent(tree_id);
				page.contents(content_id);
				page.resources().fonts().pair(FONT, font_id);
			}
			pdf.stream(content_id, &content.finish());
		}

		pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
		pdf.finish()
	}
}

/// Truncates `text` to roughly fit `width` points of body text, marking the
/// cut with `...`
fn fit(text: &str, width: f32) -> String {
	// Helvetica averages about half an em per glyph.
	let max_chars = (width / (BODY_SIZE * 0.5)).floor().max(1.0) as usize;
	if text.chars().count() <= max_chars {
		return text.to_string();
	}
	let mut fitted: String = text.chars().take(max_chars.saturating_sub(3)).collect();
	fitted.push_str("...");
	fitted
}

/// Bytes for a Type1 string; characters outside ASCII print as `?`
fn encode(text: &str) -> Vec<u8> {
	text.chars()
		.map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
		.collect()
}

/// Strips markup from a rendered cell and decodes the common entities
pub(crate) fn plain_text(html: &str) -> String {
	let mut text = String::with_capacity(html.len());
	let mut in_tag = false;
	for c in html.chars() {
		match c {
			'<' => in_tag = true,
			'>' if in_tag => in_tag = false,
			_ if !in_tag => text.push(c),
			_ => {}
		}
	}

	let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
	[
		("&lt;", "<"),
		("&gt;", ">"),
		("&quot;", "\""),
		("&#x27;", "'"),
		("&#39;", "'"),
		("&#x2F;", "/"),
		("&nbsp;", " "),
		("&amp;", "&"),
	]
	.iter()
	.fold(text, |text, (entity, plain)| text.replace(entity, plain))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn contains(haystack: &[u8], needle: &[u8]) -> bool {
		haystack.windows(needle.len()).any(|window| window == needle)
	}

	fn document<'a>(header: &'a [String], rows: &'a [Vec<String>]) -> PdfDocument<'a> {
		PdfDocument {
			title: Some("Acme"),
			heading: "Task List".to_string(),
			header,
			rows,
			created: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
		}
	}

	#[rstest]
	fn test_render_single_page() {
		let header = vec!["Title".to_string()];
		let rows = vec![vec!["<a href=\"/t/1\">first</a>".to_string()]];
		let bytes = render(&document(&header, &rows));

		assert!(bytes.starts_with(b"%PDF-"));
		assert!(contains(&bytes, b"Helvetica"));
		assert!(contains(&bytes, b"(Acme)"));
		assert!(contains(&bytes, b"(Task List)"));
		assert!(contains(&bytes, b"(first)"));
		assert!(contains(&bytes, b"(Created: 09/03/2024)"));
		assert!(!contains(&bytes, b"href"));
	}

	#[rstest]
	fn test_long_tables_span_pages() {
		let header = vec!["N".to_string()];
		let rows: Vec<Vec<String>> = (0..100).map(|n| vec![n.to_string()]).collect();
		let bytes = render(&document(&header, &rows));
		let pages = bytes
			.windows(b"/MediaBox".len())
			.filter(|window| *window == b"/MediaBox")
			.count();
		assert!(pages > 1);
		assert!(contains(&bytes, b"(99)"));
	}

	#[rstest]
	#[case("<b>Bold</b> &amp; more", "Bold & more")]
	#[case("O&#x27;Neil &lt;x&gt;", "O'Neil <x>")]
	#[case("  spaced \n out ", "spaced out")]
	#[case("a&#x2F;b", "a/b")]
	fn test_plain_text(#[case] html: &str, #[case] expected: &str) {
		assert_eq!(plain_text(html), expected);
	}

	#[rstest]
	fn test_fit_truncates() {
		assert_eq!(fit("short", 100.0), "short");
		let fitted = fit(&"x".repeat(100), 50.0);
		assert_eq!(fitted.chars().count(), 10);
		assert!(fitted.ends_with("..."));
	}

	#[rstest]
	fn test_long_cells_are_cut() {
		let header = vec!["Notes".to_string()];
		let rows = vec![vec!["y".repeat(200)]];
		let bytes = render(&document(&header, &rows));
		let expected = format!("({}...)", "y".repeat(125));
		assert!(contains(&bytes, expected.as_bytes()));
		assert!(!contains(&bytes, "y".repeat(126).as_bytes()));
	}

	#[rstest]
	fn test_encode_replaces_non_ascii() {
		assert_eq!(encode("café"), b"caf?".to_vec());
	}
}
