//! Translation of column headers and `trans` bits.

use std::collections::HashMap;

/// Source of translated strings.
pub trait Translator: Send + Sync {
	/// Translate `message`, returning it unchanged when no translation exists
	fn gettext(&self, message: &str) -> String;
}

/// Translator that returns every message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTranslator;

impl Translator for NullTranslator {
	fn gettext(&self, message: &str) -> String {
		message.to_string()
	}
}

/// Translations for a single locale
///
/// # Example
/// ```
/// use reusable_table::{MessageCatalog, Translator};
///
/// let mut catalog = MessageCatalog::new("fr");
/// catalog.add_translation("Name", "Nom");
///
/// assert_eq!(catalog.gettext("Name"), "Nom");
/// assert_eq!(catalog.gettext("Email"), "Email");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
	locale: String,
	messages: HashMap<String, String>,
}

impl MessageCatalog {
	/// Create an empty catalog for `locale`
	pub fn new(locale: &str) -> Self {
		Self {
			locale: locale.to_string(),
			messages: HashMap::new(),
		}
	}

	/// Get the locale for this catalog
	pub fn locale(&self) -> &str {
		&self.locale
	}

	/// Add a simple translation
	pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
		self.messages.insert(message.into(), translation.into());
	}

	/// Get a translation
	pub fn get(&self, message: &str) -> Option<&String> {
		self.messages.get(message)
	}
}

impl Translator for MessageCatalog {
	fn gettext(&self, message: &str) -> String {
		self.get(message)
			.cloned()
			.unwrap_or_else(|| message.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_null_translator() {
		assert_eq!(NullTranslator.gettext("Hello"), "Hello");
	}

	#[rstest]
	fn test_catalog_lookup() {
		let mut catalog = MessageCatalog::new("de");
		catalog.add_translation("Active", "Aktiv");
		assert_eq!(catalog.locale(), "de");
		assert_eq!(catalog.get("Active"), Some(&"Aktiv".to_string()));
		assert_eq!(catalog.gettext("Active"), "Aktiv");
		assert_eq!(catalog.gettext("Missing"), "Missing");
	}
}
