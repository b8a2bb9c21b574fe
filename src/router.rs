//! Hash router
//!
//! This module provides access to wisp-router: route tables over the
//! location fragment, async navigation guards and route-change
//! subscriptions.
//!
//! ## Architecture
//!
//! - **HashRouter**: cloneable handle owning routes, guards and subscribers
//! - **NavigationHost**: location and history access (`MemoryHost`, `BrowserHost`)
//! - **NavigationGuard**: async allow/block/redirect checks run before commit

// Re-export all wisp-router functionality
pub use wisp_router::*;
