//! Router error types.
//!
//! A path with no matching route and a guard that blocks a navigation are
//! ordinary outcomes (see [`NavigationOutcome`](crate::NavigationOutcome)),
//! not errors.

/// Errors raised by the router.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// A route pattern could not be compiled.
	#[error("Invalid route pattern '{pattern}': {reason}")]
	InvalidPattern { pattern: String, reason: String },

	/// A redirect-only route has no target.
	#[error("Redirect route '{path}' has an empty target")]
	EmptyRedirect { path: String },

	/// Redirects (route or guard) kept bouncing past the configured limit.
	#[error("Too many redirects while navigating to '{path}'")]
	RedirectLoop { path: String },
}
