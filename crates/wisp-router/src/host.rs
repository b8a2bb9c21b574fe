//! Navigation hosts.
//!
//! The router never touches the browser directly. It reads and writes the
//! location fragment, walks history and listens for history changes through
//! a [`NavigationHost`]. [`MemoryHost`] keeps everything in memory;
//! `BrowserHost` (wasm32 only) drives `window.location` and `window.history`.

#[cfg(target_arch = "wasm32")]
mod browser;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHost;
pub use memory::MemoryHost;

use futures::future::BoxFuture;
use std::sync::Arc;

/// Identifies a registered navigation listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Future returned by a navigation listener. The host is responsible for
/// driving it to completion.
pub type NavigationFuture = BoxFuture<'static, ()>;

/// Callback invoked with the new fragment after a history change that the
/// router did not initiate (back, forward, or the user editing the hash).
pub type NavigationListener = Arc<dyn Fn(String) -> NavigationFuture + Send + Sync>;

/// Location and history access used by the router.
///
/// Fragments are passed without the leading `#`. An empty fragment means the
/// location has none.
pub trait NavigationHost: Send + Sync {
	/// The current fragment.
	fn current_fragment(&self) -> String;

	/// Replaces the current fragment without adding a history entry.
	fn replace_fragment(&self, fragment: &str);

	/// Sets the fragment, adding a history entry.
	fn push_fragment(&self, fragment: &str);

	/// Steps back one history entry, if there is one.
	fn back(&self);

	/// Steps forward one history entry, if there is one.
	fn forward(&self);

	/// Registers a listener for history changes.
	fn add_navigation_listener(&self, listener: NavigationListener) -> ListenerId;

	/// Removes a listener. Unknown ids are ignored.
	fn remove_navigation_listener(&self, id: ListenerId);
}
