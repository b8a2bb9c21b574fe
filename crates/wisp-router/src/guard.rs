//! Navigation guards.
//!
//! Guards run in registration order before a navigation commits. Each one
//! sees the path of the last committed route (if any) and the path of the
//! candidate route, and answers with a [`GuardOutcome`].

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// The decision of a single guard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardOutcome {
	/// Continue with the next guard.
	#[default]
	Allow,
	/// Abort the navigation. State and history stay untouched.
	Block,
	/// Abandon this navigation and navigate to the given path instead.
	RedirectTo(String),
}

impl GuardOutcome {
	/// Shorthand for [`GuardOutcome::RedirectTo`].
	pub fn redirect(path: impl Into<String>) -> Self {
		Self::RedirectTo(path.into())
	}
}

impl From<bool> for GuardOutcome {
	fn from(allowed: bool) -> Self {
		if allowed { Self::Allow } else { Self::Block }
	}
}

impl From<()> for GuardOutcome {
	fn from((): ()) -> Self {
		Self::Allow
	}
}

impl From<Option<bool>> for GuardOutcome {
	fn from(value: Option<bool>) -> Self {
		value.map_or(Self::Allow, Self::from)
	}
}

/// An async check run before each navigation commits.
///
/// Route paths are passed as written in the route table (`/user/:id`), not
/// the concrete path being navigated to.
///
/// # Deadlocks
///
/// Guards run while the router holds its navigation lock. A guard that awaits
/// [`HashRouter::navigate_to`](crate::HashRouter::navigate_to) on the same
/// router never completes. Return [`GuardOutcome::RedirectTo`] to send the
/// navigation elsewhere.
#[async_trait]
pub trait NavigationGuard: Send + Sync {
	async fn check(&self, from: Option<&str>, to: &str) -> GuardOutcome;
}

/// Shared, type-erased guard.
pub type BoxedGuard = Arc<dyn NavigationGuard>;

/// A guard backed by an async closure. See [`guard_fn`].
pub struct FnGuard<F> {
	f: F,
}

impl<F> std::fmt::Debug for FnGuard<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FnGuard").finish_non_exhaustive()
	}
}

/// Wraps an async closure as a [`NavigationGuard`].
///
/// The closure may resolve to anything convertible into [`GuardOutcome`]:
/// `bool` (`false` blocks), `()` (allows), or the outcome itself.
///
/// # Example
///
/// ```
/// use wisp_router::{GuardOutcome, guard_fn};
///
/// let _admin_only = guard_fn(|_from, to| async move {
///     if to.starts_with("/admin") {
///         GuardOutcome::redirect("/login")
///     } else {
///         GuardOutcome::Allow
///     }
/// });
/// ```
pub fn guard_fn<F, Fut, R>(f: F) -> FnGuard<F>
where
	F: Fn(Option<String>, String) -> Fut + Send + Sync,
	Fut: Future<Output = R> + Send,
	R: Into<GuardOutcome>,
{
	FnGuard { f }
}

#[async_trait]
impl<F, Fut, R> NavigationGuard for FnGuard<F>
where
	F: Fn(Option<String>, String) -> Fut + Send + Sync,
	Fut: Future<Output = R> + Send,
	R: Into<GuardOutcome>,
{
	async fn check(&self, from: Option<&str>, to: &str) -> GuardOutcome {
		(self.f)(from.map(str::to_string), to.to_string())
			.await
			.into()
	}
}
