//! Wisp Router - hash-based client routing
//!
//! Maps the location fragment (`#/user/42?tab=posts`) onto an ordered route
//! table, runs async navigation guards before each change and notifies
//! subscribers after it.
//!
//! ## Features
//!
//! - **Route patterns**: literal segments, `:name` parameters and the `*` catch-all
//! - **Redirect routes**: forward one path to another before guards run
//! - **Navigation guards**: async checks that allow, block or redirect
//! - **Serialized navigation**: overlapping calls commit in call order
//! - **Pluggable host**: [`MemoryHost`] for tests and servers, `BrowserHost` on wasm32
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wisp_router::{GuardOutcome, HashRouter, MemoryHost, Route, guard_fn};
//!
//! # futures::executor::block_on(async {
//! let router = HashRouter::new(
//!     vec![
//!         Route::new("/", "Home"),
//!         Route::new("/login", "Login"),
//!         Route::new("/admin", "Admin"),
//!         Route::redirect("/dashboard", "/admin"),
//!     ],
//!     Arc::new(MemoryHost::new()),
//! )
//! .unwrap();
//!
//! router.add_guard(guard_fn(|_from, to: String| async move {
//!     if to == "/admin" {
//!         GuardOutcome::redirect("/login")
//!     } else {
//!         GuardOutcome::Allow
//!     }
//! }));
//!
//! router.init().await.unwrap();
//! router.navigate_to("/dashboard").await.unwrap();
//! assert_eq!(router.matched_route().unwrap().path(), "/login");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod host;
pub mod pattern;
pub mod route;
pub mod router;

pub use config::RouterConfig;
pub use error::RouterError;
pub use guard::{BoxedGuard, FnGuard, GuardOutcome, NavigationGuard, guard_fn};
#[cfg(target_arch = "wasm32")]
pub use host::BrowserHost;
pub use host::{
	ListenerId, MemoryHost, NavigationFuture, NavigationHost, NavigationListener,
};
pub use pattern::{PathPattern, parse_query};
pub use route::{Route, RouteTarget};
pub use router::{HashRouter, NavigationOutcome, RouteChange, SubscriptionId};
