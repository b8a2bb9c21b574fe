//! # Wisp
//!
//! The core of a lightweight client-side UI framework: a template compiler
//! that emits virtual-DOM render functions and a hash router with async
//! navigation guards.
//!
//! ## Feature Flags
//!
//! - `template` - template compiler ([`template`])
//! - `router` - hash router ([`router`])
//! - `full` (default) - both
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wisp::prelude::*;
//!
//! let home = compile("<h1>{{ title }}</h1>").unwrap();
//! let about = compile("<p>About</p>").unwrap();
//!
//! let router = HashRouter::new(
//!     vec![
//!         Route::new("/", Arc::new(home)),
//!         Route::new("/about", Arc::new(about)),
//!     ],
//!     Arc::new(MemoryHost::new()),
//! )
//! .unwrap();
//! # let _ = router;
//! ```

#[cfg(feature = "router")]
pub mod router;
#[cfg(feature = "template")]
pub mod template;

#[cfg(feature = "router")]
pub use wisp_router::{
	GuardOutcome, HashRouter, MemoryHost, NavigationGuard, NavigationHost, NavigationOutcome, Route,
	RouteChange, RouterConfig, RouterError, guard_fn,
};

#[cfg(feature = "template")]
pub use wisp_template::{
	CompileError, CompileOptions, CompiledTemplate, Primitive, RenderError, VNode, compile,
	compile_with,
};

/// Common imports.
pub mod prelude {
	#[cfg(feature = "router")]
	pub use crate::{
		GuardOutcome, HashRouter, MemoryHost, NavigationHost, NavigationOutcome, Route, RouteChange,
		guard_fn,
	};

	#[cfg(feature = "template")]
	pub use crate::{CompiledTemplate, VNode, compile};
}
