//! Pagination and the page-number window shown under a table
//!
//! Pages are 1-indexed. A page parameter that is missing, unparsable or out
//! of range selects page 1, so a stale link never produces an error page.

use crate::settings::DEFAULT_WINDOW_SIDE;
use serde::{Deserialize, Serialize};

/// One page of a paginated result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
	/// Current page number (1-indexed)
	pub number: usize,
	/// Items per page
	pub page_size: usize,
	/// Number of items on this page
	pub len: usize,
	/// 1-based index of the first item on this page, 0 when empty
	pub start_index: usize,
	/// 1-based index of the last item on this page, 0 when empty
	pub end_index: usize,
	/// Whether a later page exists
	pub has_next: bool,
	/// Whether an earlier page exists
	pub has_previous: bool,
	/// Number of the next page, if any
	pub next_page_number: Option<usize>,
	/// Number of the previous page, if any
	pub previous_page_number: Option<usize>,
}

impl Page {
	fn new(number: usize, page_size: usize, count: usize, num_pages: usize) -> Self {
		let offset = (number - 1) * page_size;
		let len = count.saturating_sub(offset).min(page_size);
		let has_next = number < num_pages;
		let has_previous = number > 1;
		Self {
			number,
			page_size,
			len,
			start_index: if len == 0 { 0 } else { offset + 1 },
			end_index: if len == 0 { 0 } else { offset + len },
			has_next,
			has_previous,
			next_page_number: has_next.then_some(number + 1),
			previous_page_number: has_previous.then_some(number - 1),
		}
	}

	/// Returns the start offset for the current page (0-indexed)
	pub fn offset(&self) -> usize {
		(self.number - 1) * self.page_size
	}

	/// Returns the range of item indices (0-indexed) on this page
	pub fn range(&self) -> std::ops::Range<usize> {
		self.offset()..self.offset() + self.len
	}
}

/// Page-number links around the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jump {
	/// Pages before the window exist
	pub start_ellipsis: bool,
	/// Pages after the window exist
	pub end_ellipsis: bool,
	/// Page numbers inside the window, ascending
	pub pages_bit: Vec<usize>,
}

/// Everything the pagination template needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated {
	/// Total number of items across all pages
	pub count: usize,
	/// Total number of pages
	pub num_pages: usize,
	/// Whether there is more than one page
	pub paginated: bool,
	/// The selected page
	pub page: Page,
	/// Window of page links around the selected page
	pub jump: Jump,
}

/// Returns the number of pages needed for `count` items
///
/// An empty result set still has one (empty) page.
///
/// # Examples
///
/// ```
/// use reusable_table::pagination::num_pages;
///
/// assert_eq!(num_pages(100, 25), 4);
/// assert_eq!(num_pages(101, 25), 5);
/// assert_eq!(num_pages(0, 25), 1);
/// ```
pub fn num_pages(count: usize, page_size: usize) -> usize {
	count.div_ceil(page_size.max(1)).max(1)
}

/// Computes the window of page links around `page`
///
/// The window spans `side` pages on each side of `page`, clipped to
/// `[1, num_pages]`.
///
/// # Examples
///
/// ```
/// use reusable_table::pagination::jump;
///
/// let window = jump(20, 10, 5);
/// assert_eq!(window.pages_bit, (5..=15).collect::<Vec<_>>());
/// assert!(window.start_ellipsis);
/// assert!(window.end_ellipsis);
///
/// let window = jump(3, 1, 5);
/// assert_eq!(window.pages_bit, vec![1, 2, 3]);
/// assert!(!window.start_ellipsis);
/// assert!(!window.end_ellipsis);
/// ```
pub fn jump(num_pages: usize, page: usize, side: usize) -> Jump {
	let page = page.clamp(1, num_pages.max(1));
	let first = page.saturating_sub(side).max(1);
	let last = page.saturating_add(side).min(num_pages);
	Jump {
		start_ellipsis: first > 1,
		end_ellipsis: last < num_pages,
		pages_bit: (first..=last).collect(),
	}
}

/// Parses a page parameter
///
/// Returns `None` for anything that is not a positive integer.
pub fn parse_page_number(value: &str) -> Option<usize> {
	value
		.trim()
		.parse::<i64>()
		.ok()
		.filter(|n| *n >= 1)
		.and_then(|n| usize::try_from(n).ok())
}

/// Paginates `count` items using the raw page parameter
///
/// # Examples
///
/// ```
/// use reusable_table::pagination::paginate;
///
/// let result = paginate(60, Some("2"), 25);
/// assert_eq!(result.num_pages, 3);
/// assert_eq!(result.page.number, 2);
/// assert_eq!(result.page.start_index, 26);
///
/// // Out of range falls back to the first page
/// let result = paginate(60, Some("9"), 25);
/// assert_eq!(result.page.number, 1);
/// ```
pub fn paginate(count: usize, number: Option<&str>, page_size: usize) -> Paginated {
	paginate_with_window(count, number, page_size, DEFAULT_WINDOW_SIDE)
}

/// Paginates `count` items with an explicit window half-width
pub fn paginate_with_window(
	count: usize,
	number: Option<&str>,
	page_size: usize,
	side: usize,
) -> Paginated {
	let page_size = page_size.max(1);
	let num_pages = num_pages(count, page_size);

	let requested = number.and_then(parse_page_number);
	let number = match requested {
		Some(n) if n <= num_pages => n,
		Some(n) => {
			tracing::warn!(page = n, num_pages, "page out of range, falling back to page 1");
			1
		}
		None => 1,
	};

	Paginated {
		count,
		num_pages,
		paginated: num_pages > 1,
		page: Page::new(number, page_size, count, num_pages),
		jump: jump(num_pages, number, side),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, 1)]
	#[case(Some("3"), 3)]
	#[case(Some(" 2 "), 2)]
	#[case(Some("abc"), 1)]
	#[case(Some("0"), 1)]
	#[case(Some("-4"), 1)]
	#[case(Some("2.5"), 1)]
	#[case(Some("40"), 1)]
	fn test_page_selection(#[case] number: Option<&str>, #[case] expected: usize) {
		let result = paginate(100, number, 10);
		assert_eq!(result.page.number, expected);
	}

	#[rstest]
	fn test_last_page_is_partial() {
		let result = paginate(23, Some("3"), 10);
		assert_eq!(result.page.len, 3);
		assert_eq!(result.page.start_index, 21);
		assert_eq!(result.page.end_index, 23);
		assert_eq!(result.page.range(), 20..23);
		assert!(!result.page.has_next);
		assert_eq!(result.page.previous_page_number, Some(2));
	}

	#[rstest]
	fn test_empty_result_set() {
		let result = paginate(0, Some("1"), 10);
		assert_eq!(result.num_pages, 1);
		assert!(!result.paginated);
		assert_eq!(result.page.len, 0);
		assert_eq!(result.page.start_index, 0);
		assert_eq!(result.jump.pages_bit, vec![1]);
	}

	#[rstest]
	fn test_single_page_not_paginated() {
		let result = paginate(10, None, 10);
		assert_eq!(result.num_pages, 1);
		assert!(!result.paginated);
	}

	#[rstest]
	fn test_zero_page_size_treated_as_one() {
		let result = paginate(3, Some("2"), 0);
		assert_eq!(result.num_pages, 3);
		assert_eq!(result.page.page_size, 1);
		assert_eq!(result.page.number, 2);
	}

	#[rstest]
	fn test_jump_near_start() {
		let window = jump(30, 3, 5);
		assert_eq!(window.pages_bit, (1..=8).collect::<Vec<_>>());
		assert!(!window.start_ellipsis);
		assert!(window.end_ellipsis);
	}

	#[rstest]
	fn test_jump_near_end() {
		let window = jump(30, 28, 5);
		assert_eq!(window.pages_bit, (23..=30).collect::<Vec<_>>());
		assert!(window.start_ellipsis);
		assert!(!window.end_ellipsis);
	}

	#[rstest]
	fn test_jump_window_touching_last_page() {
		let window = jump(15, 10, 5);
		assert_eq!(window.pages_bit.last(), Some(&15));
		assert!(!window.end_ellipsis);
	}

	#[rstest]
	fn test_serializes_for_templates() {
		let value = serde_json::to_value(paginate(30, Some("2"), 10)).unwrap();
		assert_eq!(value["page"]["number"], 2);
		assert_eq!(value["page"]["next_page_number"], 3);
		assert_eq!(value["jump"]["pages_bit"], serde_json::json!([1, 2, 3]));
	}
}
