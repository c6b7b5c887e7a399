//! Render options loaded by the embedding application.

use serde::Deserialize;

use crate::error::ConfigError;

/// Options for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RenderOptions {
	/// Prepended to every id produced by the tree's id generator.
	pub id_prefix: String,
}

impl RenderOptions {
	/// Creates options with the given id prefix.
	pub fn with_id_prefix(id_prefix: impl Into<String>) -> Self {
		Self { id_prefix: id_prefix.into() }
	}

	/// Parses and validates options from a TOML document.
	pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
		let options: Self = toml::from_str(src)?;
		options.validate()?;
		Ok(options)
	}

	/// Checks that generated ids stay valid element ids.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.id_prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
			Ok(())
		} else {
			Err(ConfigError::InvalidIdPrefix(self.id_prefix.clone()))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_kebab_case_prefix() {
		let options = RenderOptions::from_toml("id-prefix = \"app-\"").unwrap();
		assert_eq!(options, RenderOptions::with_id_prefix("app-"));
	}

	#[test]
	fn empty_document_uses_defaults() {
		assert_eq!(RenderOptions::from_toml("").unwrap(), RenderOptions::default());
	}

	#[test]
	fn rejects_unknown_fields() {
		assert!(matches!(RenderOptions::from_toml("prefix = \"x\""), Err(ConfigError::Toml(_))));
	}

	#[test]
	fn rejects_prefix_with_spaces() {
		let err = RenderOptions::from_toml("id-prefix = \"a b\"").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidIdPrefix(p) if p == "a b"));
	}
}
