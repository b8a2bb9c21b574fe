//! The hash router.
//!
//! [`HashRouter`] is a cheap, cloneable handle. Navigations are serialized:
//! a navigation waits for the previous one (guards included) to finish, so
//! commits and subscriber notifications happen in call order.

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::guard::{BoxedGuard, GuardOutcome, NavigationGuard};
use crate::host::{ListenerId, NavigationFuture, NavigationHost};
use crate::pattern::{PathPattern, parse_query};
use crate::route::{Route, RouteTarget};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Result of a navigation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// State was updated, history written and subscribers notified.
	Committed,
	/// No route matched. The matched route, params and query were cleared.
	NotFound,
	/// A guard blocked the navigation. Nothing changed.
	Blocked,
}

/// Passed to subscribers after each committed navigation.
#[derive(Debug, Clone)]
pub struct RouteChange<C> {
	/// The previously committed route, `None` on the first commit.
	pub from: Option<Route<C>>,
	/// The route just committed.
	pub to: Route<C>,
	/// The router that committed it.
	pub router: HashRouter<C>,
}

/// Identifies a subscription for [`HashRouter::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<C> = Arc<dyn Fn(&RouteChange<C>) + Send + Sync>;

struct RouterState<C> {
	matched: Option<Route<C>>,
	last_committed: Option<Route<C>>,
	params: HashMap<String, String>,
	query: HashMap<String, String>,
}

impl<C> Default for RouterState<C> {
	fn default() -> Self {
		Self {
			matched: None,
			last_committed: None,
			params: HashMap::new(),
			query: HashMap::new(),
		}
	}
}

struct RouterInner<C> {
	routes: Vec<(PathPattern, Route<C>)>,
	host: Arc<dyn NavigationHost>,
	config: RouterConfig,
	state: RwLock<RouterState<C>>,
	guards: RwLock<Vec<BoxedGuard>>,
	subscribers: Mutex<Vec<(SubscriptionId, Subscriber<C>)>>,
	next_subscription: AtomicU64,
	listener: Mutex<Option<ListenerId>>,
	navigation: futures::lock::Mutex<()>,
}

impl<C> RouterInner<C> {
	fn find(&self, path: &str) -> Option<(&Route<C>, HashMap<String, String>)> {
		self.routes.iter().find_map(|(pattern, route)| {
			let params = pattern.matches(path)?;
			tracing::trace!(pattern = pattern.as_str(), path, "route matched");
			Some((route, params))
		})
	}
}

/// A hash-based router over component type `C`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wisp_router::{HashRouter, MemoryHost, NavigationHost, NavigationOutcome, Route};
///
/// # futures::executor::block_on(async {
/// let host = Arc::new(MemoryHost::new());
/// let router = HashRouter::new(
///     vec![
///         Route::new("/", "Home"),
///         Route::new("/user/:id", "User"),
///     ],
///     host.clone(),
/// )
/// .unwrap();
///
/// router.init().await.unwrap();
/// assert_eq!(host.current_fragment(), "/");
///
/// let outcome = router.navigate_to("/user/42").await.unwrap();
/// assert_eq!(outcome, NavigationOutcome::Committed);
/// assert_eq!(router.params().get("id").map(String::as_str), Some("42"));
/// # });
/// ```
pub struct HashRouter<C> {
	inner: Arc<RouterInner<C>>,
}

impl<C> Clone for HashRouter<C> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<C> std::fmt::Debug for HashRouter<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HashRouter")
			.field(
				"routes",
				&self
					.inner
					.routes
					.iter()
					.map(|(_, route)| route.path())
					.collect::<Vec<_>>(),
			)
			.field("guards", &self.inner.guards.read().len())
			.field("subscribers", &self.inner.subscribers.lock().len())
			.field("initialized", &self.inner.listener.lock().is_some())
			.finish()
	}
}

impl<C> HashRouter<C>
where
	C: Clone + Send + Sync + 'static,
{
	/// Creates a router with the default [`RouterConfig`].
	///
	/// Routes are tried in order; the first match wins.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] or [`RouterError::EmptyRedirect`]
	/// for the first malformed route.
	pub fn new(routes: Vec<Route<C>>, host: Arc<dyn NavigationHost>) -> Result<Self, RouterError> {
		Self::with_config(routes, host, RouterConfig::default())
	}

	/// Creates a router with an explicit configuration.
	///
	/// # Errors
	///
	/// See [`HashRouter::new`].
	pub fn with_config(
		routes: Vec<Route<C>>,
		host: Arc<dyn NavigationHost>,
		config: RouterConfig,
	) -> Result<Self, RouterError> {
		let routes = routes
			.into_iter()
			.map(|route| route.compile().map(|pattern| (pattern, route)))
			.collect::<Result<Vec<_>, _>>()?;

		debug!(routes = routes.len(), "router created");

		Ok(Self {
			inner: Arc::new(RouterInner {
				routes,
				host,
				config,
				state: RwLock::new(RouterState::default()),
				guards: RwLock::new(Vec::new()),
				subscribers: Mutex::new(Vec::new()),
				next_subscription: AtomicU64::new(1),
				listener: Mutex::new(None),
				navigation: futures::lock::Mutex::new(()),
			}),
		})
	}

	/// Starts listening for history changes and navigates to the current
	/// fragment, writing the default path first if there is none.
	///
	/// Does nothing when already initialized.
	///
	/// # Errors
	///
	/// Propagates errors from the initial navigation.
	pub async fn init(&self) -> Result<(), RouterError> {
		{
			let mut listener = self.inner.listener.lock();
			if listener.is_some() {
				debug!("router already initialized");
				return Ok(());
			}

			if self.inner.host.current_fragment().is_empty() {
				self.inner
					.host
					.replace_fragment(&self.inner.config.default_path);
			}

			let weak = Arc::downgrade(&self.inner);
			let id = self
				.inner
				.host
				.add_navigation_listener(Arc::new(move |fragment: String| {
					history_navigation(weak.clone(), fragment)
				}));
			*listener = Some(id);
		}

		let current = self.inner.host.current_fragment();
		self.navigate_to(&current).await.map(|_| ())
	}

	/// Stops listening for history changes and drops all subscribers.
	///
	/// Does nothing when not initialized.
	pub fn destroy(&self) {
		let Some(id) = self.inner.listener.lock().take() else {
			return;
		};
		self.inner.host.remove_navigation_listener(id);
		self.inner.subscribers.lock().clear();
		debug!("router destroyed");
	}

	/// Whether [`init`](Self::init) has run without a later
	/// [`destroy`](Self::destroy).
	pub fn is_initialized(&self) -> bool {
		self.inner.listener.lock().is_some()
	}

	/// Navigates to `path`.
	///
	/// Redirect routes and guard redirects are followed up to
	/// [`RouterConfig::max_redirects`] times. On commit the path is written
	/// to history unless the location already shows it (the case for
	/// back/forward), then subscribers are notified in subscription order.
	///
	/// # Errors
	///
	/// Returns [`RouterError::RedirectLoop`] when the redirect limit is hit.
	///
	/// Awaiting this from inside a guard of the same router deadlocks; see
	/// [`NavigationGuard`].
	#[tracing::instrument(level = "debug", skip(self))]
	pub async fn navigate_to(&self, path: &str) -> Result<NavigationOutcome, RouterError> {
		let _navigation = self.inner.navigation.lock().await;

		let mut target = path.to_string();
		let mut hops = 0usize;

		'resolve: loop {
			if hops > self.inner.config.max_redirects {
				warn!(hops, "redirect limit reached");
				return Err(RouterError::RedirectLoop {
					path: path.to_string(),
				});
			}

			let Some((route, params)) = self.inner.find(&target) else {
				warn!(path = %target, "no route matches");
				let mut state = self.inner.state.write();
				state.matched = None;
				state.params.clear();
				state.query.clear();
				return Ok(NavigationOutcome::NotFound);
			};
			let candidate = route.clone();

			if let RouteTarget::Redirect(to) = candidate.target() {
				debug!(from = %target, to = %to, "following redirect route");
				target = to.clone();
				hops += 1;
				continue;
			}

			let from = self
				.inner
				.state
				.read()
				.last_committed
				.as_ref()
				.map(|route| route.path().to_string());
			let guards: Vec<BoxedGuard> = self.inner.guards.read().clone();

			for guard in guards {
				match guard.check(from.as_deref(), candidate.path()).await {
					GuardOutcome::Allow => {}
					GuardOutcome::Block => {
						debug!(path = %target, "navigation blocked by guard");
						return Ok(NavigationOutcome::Blocked);
					}
					GuardOutcome::RedirectTo(next) => {
						debug!(from = %target, to = %next, "guard redirected navigation");
						target = next;
						hops += 1;
						continue 'resolve;
					}
				}
			}

			self.commit(candidate, params, &target);
			return Ok(NavigationOutcome::Committed);
		}
	}

	fn commit(&self, route: Route<C>, params: HashMap<String, String>, path: &str) {
		let previous = {
			let mut state = self.inner.state.write();
			state.matched = Some(route.clone());
			state.params = params;
			state.query = parse_query(path);
			state.last_committed.replace(route.clone())
		};

		if self.inner.host.current_fragment() != path {
			self.inner.host.push_fragment(path);
		}

		debug!(path, route = route.path(), "navigation committed");

		let change = RouteChange {
			from: previous,
			to: route,
			router: self.clone(),
		};
		let subscribers: Vec<Subscriber<C>> = self
			.inner
			.subscribers
			.lock()
			.iter()
			.map(|(_, subscriber)| subscriber.clone())
			.collect();
		for subscriber in subscribers {
			subscriber(&change);
		}
	}

	/// Steps back in history. The resulting history event navigates.
	pub fn back(&self) {
		self.inner.host.back();
	}

	/// Steps forward in history. The resulting history event navigates.
	pub fn forward(&self) {
		self.inner.host.forward();
	}

	/// Registers a callback run after every committed navigation.
	pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(&RouteChange<C>) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
		self.inner.subscribers.lock().push((id, Arc::new(handler)));
		id
	}

	/// Removes a subscription. Returns whether it existed.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.inner.subscribers.lock();
		let before = subscribers.len();
		subscribers.retain(|(existing, _)| *existing != id);
		subscribers.len() != before
	}

	/// Appends a guard to the chain.
	pub fn add_guard<G>(&self, guard: G)
	where
		G: NavigationGuard + 'static,
	{
		self.inner.guards.write().push(Arc::new(guard));
	}

	/// The currently matched route, if any.
	pub fn matched_route(&self) -> Option<Route<C>> {
		self.inner.state.read().matched.clone()
	}

	/// Parameters captured by the matched route.
	pub fn params(&self) -> HashMap<String, String> {
		self.inner.state.read().params.clone()
	}

	/// Query parameters of the committed path.
	pub fn query(&self) -> HashMap<String, String> {
		self.inner.state.read().query.clone()
	}

	/// The routes in match order.
	pub fn routes(&self) -> impl Iterator<Item = &Route<C>> {
		self.inner.routes.iter().map(|(_, route)| route)
	}
}

fn history_navigation<C>(router: Weak<RouterInner<C>>, fragment: String) -> NavigationFuture
where
	C: Clone + Send + Sync + 'static,
{
	Box::pin(async move {
		let Some(inner) = router.upgrade() else {
			return;
		};
		let router = HashRouter { inner };
		if let Err(error) = router.navigate_to(&fragment).await {
			tracing::error!(%error, %fragment, "history navigation failed");
		}
	})
}
