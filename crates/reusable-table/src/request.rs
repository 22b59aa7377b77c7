//! Request parameters consumed by table rendering.
//!
//! Tables are driven entirely by query-string parameters:
//!
//! - `format_<key>`: output format (`html`, `csv`, `pdf`)
//! - `page_<key>`: page number
//! - `sort_<key>_<column>`: `asc` or `desc`

use http::Uri;
use serde_json::Value;
use url::form_urlencoded;

/// Request extension carrying the current user into the row context.
///
/// Insert it into an `http::Request`'s extensions before building a
/// [`TableRequest`] and cell bits can reference `{{ user }}`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableUser(pub Value);

/// Query parameters of the request a table is rendered for.
///
/// Parameters keep their original order and may repeat. [`get`](Self::get)
/// returns the last value of a key, [`get_list`](Self::get_list) all of them.
///
/// # Examples
///
/// ```
/// use reusable_table::TableRequest;
///
/// let request = TableRequest::from_query("page_1=2&tag=a&tag=b");
/// assert_eq!(request.get("page_1"), Some("2"));
/// assert_eq!(request.get("tag"), Some("b"));
/// assert_eq!(request.get_list("tag"), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRequest {
	params: Vec<(String, String)>,
	user: Option<Value>,
}

impl TableRequest {
	/// Create an empty request
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a raw, percent-encoded query string (without the leading `?`)
	pub fn from_query(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		Self {
			params: form_urlencoded::parse(query.as_bytes())
				.into_owned()
				.collect(),
			user: None,
		}
	}

	/// Build from the query component of a URI
	pub fn from_uri(uri: &Uri) -> Self {
		uri.query().map(Self::from_query).unwrap_or_default()
	}

	/// Build from an HTTP request, picking up a [`TableUser`] extension if present
	pub fn from_http<B>(request: &http::Request<B>) -> Self {
		let mut table_request = Self::from_uri(request.uri());
		table_request.user = request
			.extensions()
			.get::<TableUser>()
			.map(|user| user.0.clone());
		table_request
	}

	/// Attach the current user
	pub fn with_user(mut self, user: Value) -> Self {
		self.user = Some(user);
		self
	}

	/// Append a parameter
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));
		self
	}

	/// The current user, if one was attached
	pub fn user(&self) -> Option<&Value> {
		self.user.as_ref()
	}

	/// Last value for `key`
	pub fn get(&self, key: &str) -> Option<&str> {
		self.params
			.iter()
			.rev()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Every value for `key`, in request order
	pub fn get_list(&self, key: &str) -> Vec<&str> {
		self.params
			.iter()
			.filter(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
			.collect()
	}

	/// Distinct keys in order of first appearance
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = Vec::new();
		for (key, _) in &self.params {
			if !keys.contains(&key.as_str()) {
				keys.push(key);
			}
		}
		keys
	}

	/// Re-encode the parameters whose key passes `keep`
	///
	/// Values of a repeated key are emitted together under the key's first
	/// position, so `a=1&b=2&a=3` encodes as `a=1&a=3&b=2`.
	pub fn encode_filtered<F>(&self, keep: F) -> String
	where
		F: Fn(&str) -> bool,
	{
		let mut serializer = form_urlencoded::Serializer::new(String::new());
		for key in self.keys() {
			if !keep(key) {
				continue;
			}
			for value in self.get_list(key) {
				serializer.append_pair(key, value);
			}
		}
		serializer.finish()
	}
}
