//! Route definitions.

use crate::error::RouterError;
use crate::pattern::PathPattern;

/// What a route resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget<C> {
	/// A component to mount.
	Component(C),
	/// Another path to navigate to instead.
	Redirect(String),
}

/// A single route: a path pattern and its target.
///
/// The component type `C` is opaque to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<C> {
	path: String,
	target: RouteTarget<C>,
}

impl<C> Route<C> {
	/// A route that mounts `component` on `path`.
	pub fn new(path: impl Into<String>, component: C) -> Self {
		Self {
			path: path.into(),
			target: RouteTarget::Component(component),
		}
	}

	/// A route that forwards `path` to `to`.
	pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			target: RouteTarget::Redirect(to.into()),
		}
	}

	/// The pattern as written, e.g. `/user/:id`.
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn target(&self) -> &RouteTarget<C> {
		&self.target
	}

	pub fn component(&self) -> Option<&C> {
		match &self.target {
			RouteTarget::Component(component) => Some(component),
			RouteTarget::Redirect(_) => None,
		}
	}

	pub fn redirect_target(&self) -> Option<&str> {
		match &self.target {
			RouteTarget::Redirect(to) => Some(to),
			RouteTarget::Component(_) => None,
		}
	}

	pub fn is_redirect(&self) -> bool {
		matches!(self.target, RouteTarget::Redirect(_))
	}

	/// Compiles the path and validates the target.
	pub(crate) fn compile(&self) -> Result<PathPattern, RouterError> {
		if let RouteTarget::Redirect(to) = &self.target
			&& to.is_empty()
		{
			return Err(RouterError::EmptyRedirect {
				path: self.path.clone(),
			});
		}
		PathPattern::new(&self.path)
	}
}
