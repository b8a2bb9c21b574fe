//! Router configuration.

use serde::Deserialize;

/// Redirect hops allowed per navigation before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 16;

/// Router settings.
///
/// Deserializable so it can come from an application config file; missing
/// fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// Fragment written on `init` when the location has none.
	pub default_path: String,
	/// Redirect hops allowed per navigation.
	pub max_redirects: usize,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			default_path: "/".to_string(),
			max_redirects: DEFAULT_MAX_REDIRECTS,
		}
	}
}
