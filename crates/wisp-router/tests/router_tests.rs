//! Integration tests for the hash router
//!
//! These tests drive a router over an in-memory host and verify:
//! 1. init/destroy idempotence and listener bookkeeping
//! 2. Route matching, parameters, query strings and the catch-all
//! 3. Guard chains (allow, block, redirect) and redirect routes
//! 4. Subscriber notifications
//! 5. History-driven navigation (back, forward, typed fragments)
//! 6. Serialized overlapping navigations

use futures::channel::oneshot;
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wisp_router::{
	GuardOutcome, HashRouter, MemoryHost, NavigationHost, NavigationOutcome, Route, RouterConfig,
	RouterError, guard_fn,
};

type Router = HashRouter<&'static str>;

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

fn routes(with_catch_all: bool) -> Vec<Route<&'static str>> {
	let mut routes = vec![
		Route::new("/", "Home"),
		Route::new("/one", "One"),
		Route::new("/two/:userId/page/:pageId", "Two"),
		Route::new("/login", "Login"),
		Route::redirect("/legacy", "/one"),
	];
	if with_catch_all {
		routes.push(Route::new("*", "NotFound"));
	}
	routes
}

#[fixture]
fn host() -> Arc<MemoryHost> {
	Arc::new(MemoryHost::new())
}

fn router(host: &Arc<MemoryHost>, with_catch_all: bool) -> Router {
	HashRouter::new(routes(with_catch_all), host.clone()).unwrap()
}

fn record_changes(router: &Router) -> Arc<Mutex<Vec<(Option<String>, String)>>> {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	router.subscribe(move |change| {
		sink.lock().push((
			change.from.as_ref().map(|r| r.path().to_string()),
			change.to.path().to_string(),
		));
	});
	seen
}

fn matched(router: &Router) -> Option<String> {
	router.matched_route().map(|r| r.path().to_string())
}

/// Success Criterion 1: init twice attaches one listener, destroy twice detaches it
#[rstest]
#[tokio::test]
async fn test_init_and_destroy_are_idempotent(host: Arc<MemoryHost>) {
	let router = router(&host, true);

	router.init().await.unwrap();
	router.init().await.unwrap();
	assert_eq!(host.listener_count(), 1);
	assert!(router.is_initialized());
	assert_eq!(host.entries(), vec!["/"]);

	router.destroy();
	router.destroy();
	assert_eq!(host.listener_count(), 0);
	assert!(!router.is_initialized());
}

/// Success Criterion 1: destroy before init is a no-op
#[rstest]
fn test_destroy_without_init(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.destroy();
	assert_eq!(host.listener_count(), 0);
}

/// Success Criterion 1: init keeps an existing fragment and navigates to it
#[rstest]
#[tokio::test]
async fn test_init_uses_existing_fragment() {
	let host = Arc::new(MemoryHost::with_fragment("/one"));
	let router = router(&host, false);

	router.init().await.unwrap();

	assert_eq!(matched(&router).as_deref(), Some("/one"));
	assert_eq!(host.entries(), vec!["/one"]);
}

/// Success Criterion 1: the default path comes from configuration
#[rstest]
#[tokio::test]
async fn test_init_writes_configured_default_path(host: Arc<MemoryHost>) {
	let config = RouterConfig {
		default_path: "/login".to_string(),
		..RouterConfig::default()
	};
	let router = HashRouter::with_config(routes(false), host.clone(), config).unwrap();

	router.init().await.unwrap();

	assert_eq!(host.current_fragment(), "/login");
	assert_eq!(matched(&router).as_deref(), Some("/login"));
}

/// Success Criterion 2: parameters and query are exposed after a commit and reset by the next one
#[rstest]
#[tokio::test]
async fn test_params_and_query(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();

	let outcome = router
		.navigate_to("/two/7/page/intro?tab=posts&sort=new+first&tab=ignored")
		.await
		.unwrap();

	assert_eq!(outcome, NavigationOutcome::Committed);
	assert_eq!(matched(&router).as_deref(), Some("/two/:userId/page/:pageId"));

	let params = router.params();
	assert_eq!(params.get("userId").map(String::as_str), Some("7"));
	assert_eq!(params.get("pageId").map(String::as_str), Some("intro"));

	let query = router.query();
	assert_eq!(query.get("tab").map(String::as_str), Some("posts"));
	assert_eq!(query.get("sort").map(String::as_str), Some("new first"));
	assert_eq!(
		host.current_fragment(),
		"/two/7/page/intro?tab=posts&sort=new+first&tab=ignored"
	);

	router.navigate_to("/one").await.unwrap();

	assert_eq!(matched(&router).as_deref(), Some("/one"));
	assert!(router.params().is_empty());
	assert!(router.query().is_empty());
}

/// Success Criterion 2: unknown paths fall through to the catch-all, hash kept verbatim
#[rstest]
#[tokio::test]
async fn test_catch_all(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();

	let outcome = router.navigate_to("/unknown").await.unwrap();

	assert_eq!(outcome, NavigationOutcome::Committed);
	assert_eq!(matched(&router).as_deref(), Some("*"));
	assert_eq!(host.current_fragment(), "/unknown");
}

/// Success Criterion 2: without a catch-all, state is cleared and the hash is left alone
#[rstest]
#[tokio::test]
async fn test_no_match_without_catch_all(host: Arc<MemoryHost>) {
	let router = router(&host, false);
	router.init().await.unwrap();
	router.navigate_to("/two/1/page/a?x=1").await.unwrap();
	let changes = record_changes(&router);

	let outcome = router.navigate_to("/unknown").await.unwrap();

	assert_eq!(outcome, NavigationOutcome::NotFound);
	assert_eq!(router.matched_route(), None);
	assert!(router.params().is_empty());
	assert!(router.query().is_empty());
	assert_eq!(host.current_fragment(), "/two/1/page/a?x=1");
	assert!(changes.lock().is_empty());
}

/// Success Criterion 2: the first matching route wins
#[rstest]
#[tokio::test]
async fn test_first_match_wins(host: Arc<MemoryHost>) {
	let router = HashRouter::new(
		vec![
			Route::new("*", "Everything"),
			Route::new("/one", "One"),
		],
		host.clone(),
	)
	.unwrap();

	router.navigate_to("/one").await.unwrap();

	assert_eq!(router.matched_route().unwrap().component(), Some(&"Everything"));
}

/// Success Criterion 3: a blocking guard leaves state, history and subscribers untouched
#[rstest]
#[tokio::test]
async fn test_guard_block(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();
	router.add_guard(guard_fn(|_from, to: String| async move { to != "/one" }));
	let changes = record_changes(&router);

	let outcome = router.navigate_to("/one").await.unwrap();

	assert_eq!(outcome, NavigationOutcome::Blocked);
	assert_eq!(matched(&router).as_deref(), Some("/"));
	assert_eq!(host.entries(), vec!["/"]);
	assert!(changes.lock().is_empty());
}

/// Success Criterion 3: a redirecting guard commits and announces only the redirect target
#[rstest]
#[tokio::test]
async fn test_guard_redirect(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();
	let observed = Arc::new(Mutex::new(Vec::new()));
	let log = observed.clone();
	router.add_guard(guard_fn(move |from: Option<String>, to: String| {
		let log = log.clone();
		async move {
			log.lock().push((from, to.clone()));
			if to.starts_with("/two") {
				GuardOutcome::redirect("/login")
			} else {
				GuardOutcome::Allow
			}
		}
	}));

	let changes = record_changes(&router);

	let outcome = router.navigate_to("/two/1/page/2").await.unwrap();

	assert_eq!(outcome, NavigationOutcome::Committed);
	assert_eq!(matched(&router).as_deref(), Some("/login"));
	assert_eq!(host.current_fragment(), "/login");
	assert_eq!(
		*observed.lock(),
		vec![
			(Some("/".to_string()), "/two/:userId/page/:pageId".to_string()),
			(Some("/".to_string()), "/login".to_string()),
		]
	);
	assert_eq!(
		*changes.lock(),
		vec![(Some("/".to_string()), "/login".to_string())]
	);
}

/// Success Criterion 3: guards run in order and the first block short-circuits
#[rstest]
#[tokio::test]
async fn test_guard_chain_short_circuits(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	let calls = Arc::new(AtomicUsize::new(0));

	let first = calls.clone();
	router.add_guard(guard_fn(move |_from, to: String| {
		first.fetch_add(1, Ordering::SeqCst);
		async move { if to == "/login" { GuardOutcome::Block } else { GuardOutcome::Allow } }
	}));
	let second = calls.clone();
	router.add_guard(guard_fn(move |_from, _to| {
		second.fetch_add(10, Ordering::SeqCst);
		async { GuardOutcome::Allow }
	}));

	router.navigate_to("/login").await.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	router.navigate_to("/one").await.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 12);
}

/// Success Criterion 3: redirect routes are followed before guards see the target
#[rstest]
#[tokio::test]
async fn test_redirect_route(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();
	let seen_targets = Arc::new(Mutex::new(Vec::new()));
	let log = seen_targets.clone();
	router.add_guard(guard_fn(move |_from, to: String| {
		log.lock().push(to);
		async { true }
	}));

	router.navigate_to("/legacy").await.unwrap();

	assert_eq!(matched(&router).as_deref(), Some("/one"));
	assert_eq!(host.current_fragment(), "/one");
	assert_eq!(*seen_targets.lock(), vec!["/one"]);
}

/// Success Criterion 3: cyclic redirects fail instead of spinning forever
#[rstest]
#[tokio::test]
async fn test_redirect_loop_is_reported(host: Arc<MemoryHost>) {
	init_tracing();
	let router: Router = HashRouter::new(
		vec![
			Route::new("/", "Home"),
			Route::redirect("/a", "/b"),
			Route::redirect("/b", "/a"),
		],
		host.clone(),
	)
	.unwrap();
	router.init().await.unwrap();

	let err = router.navigate_to("/a").await.unwrap_err();

	assert_eq!(
		err,
		RouterError::RedirectLoop {
			path: "/a".to_string()
		}
	);
	assert_eq!(matched(&router).as_deref(), Some("/"));
}

/// Success Criterion 3: guard redirects count toward the configured limit
#[rstest]
#[tokio::test]
async fn test_guard_redirect_loop_respects_limit(host: Arc<MemoryHost>) {
	let config = RouterConfig {
		max_redirects: 3,
		..RouterConfig::default()
	};
	let router = HashRouter::with_config(routes(true), host.clone(), config).unwrap();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	router.add_guard(guard_fn(move |_from, to: String| {
		counter.fetch_add(1, Ordering::SeqCst);
		async move {
			if to == "/one" {
				GuardOutcome::redirect("/login")
			} else {
				GuardOutcome::redirect("/one")
			}
		}
	}));

	let err = router.navigate_to("/one").await.unwrap_err();

	assert!(matches!(err, RouterError::RedirectLoop { .. }));
	assert_eq!(calls.load(Ordering::SeqCst), 4);
	assert_eq!(router.matched_route(), None);
}

/// Success Criterion 4: the first navigation after init reports the default route as `from`
#[rstest]
#[tokio::test]
async fn test_subscriber_sees_from_and_to(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	let changes = record_changes(&router);

	router.init().await.unwrap();
	router.navigate_to("/one").await.unwrap();

	assert_eq!(
		*changes.lock(),
		vec![
			(None, "/".to_string()),
			(Some("/".to_string()), "/one".to_string()),
		]
	);
}

/// Success Criterion 4: subscribers run in subscription order with a live router handle
#[rstest]
#[tokio::test]
async fn test_subscribers_run_in_order(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	let order = Arc::new(Mutex::new(Vec::new()));

	for name in ["first", "second"] {
		let order = order.clone();
		router.subscribe(move |change| {
			let current = change.router.matched_route().map(|r| r.path().to_string());
			order.lock().push((name, current));
		});
	}

	router.navigate_to("/one").await.unwrap();

	assert_eq!(
		*order.lock(),
		vec![
			("first", Some("/one".to_string())),
			("second", Some("/one".to_string())),
		]
	);
}

/// Success Criterion 4: destroy drops subscribers
#[rstest]
#[tokio::test]
async fn test_destroy_unsubscribes(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();
	let changes = record_changes(&router);

	router.destroy();
	router.navigate_to("/one").await.unwrap();

	assert!(changes.lock().is_empty());
	assert_eq!(matched(&router).as_deref(), Some("/one"));
}

/// Success Criterion 5: back and forward navigate without rewriting history
#[rstest]
#[tokio::test]
async fn test_back_and_forward(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();
	router.navigate_to("/one").await.unwrap();
	router.navigate_to("/two/3/page/x").await.unwrap();

	router.back();
	host.settle().await;
	assert_eq!(matched(&router).as_deref(), Some("/one"));

	router.back();
	host.settle().await;
	assert_eq!(matched(&router).as_deref(), Some("/"));

	router.forward();
	host.settle().await;
	assert_eq!(matched(&router).as_deref(), Some("/one"));

	assert_eq!(host.entries(), vec!["/", "/one", "/two/3/page/x"]);
	assert_eq!(host.position(), 1);
}

/// Success Criterion 5: a fragment typed by the user is routed
#[rstest]
#[tokio::test]
async fn test_typed_fragment_navigates(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();

	host.enter_fragment("/two/9/page/typed");
	host.settle().await;

	assert_eq!(matched(&router).as_deref(), Some("/two/:userId/page/:pageId"));
	assert_eq!(router.params().get("userId").map(String::as_str), Some("9"));
	assert_eq!(host.entries(), vec!["/", "/two/9/page/typed"]);
}

/// Success Criterion 5: history changes after destroy are ignored
#[rstest]
#[tokio::test]
async fn test_history_ignored_after_destroy(host: Arc<MemoryHost>) {
	let router = router(&host, true);
	router.init().await.unwrap();
	router.navigate_to("/one").await.unwrap();
	router.destroy();

	host.back();
	host.settle().await;

	assert_eq!(matched(&router).as_deref(), Some("/one"));
	assert_eq!(host.current_fragment(), "/");
}

/// Success Criterion 6: overlapping navigations commit in call order
#[rstest]
#[tokio::test]
async fn test_overlapping_navigations_are_serialized(host: Arc<MemoryHost>) {
	init_tracing();
	let router = router(&host, true);
	router.init().await.unwrap();

	let (release, gate) = oneshot::channel::<()>();
	let gate = Arc::new(Mutex::new(Some(gate)));
	let seen_from = Arc::new(Mutex::new(Vec::new()));
	let log = seen_from.clone();
	router.add_guard(guard_fn(move |from: Option<String>, to: String| {
		let gate = gate.clone();
		let log = log.clone();
		async move {
			log.lock().push(from);
			let pending = gate.lock().take();
			if to == "/one"
				&& let Some(pending) = pending
			{
				let _ = pending.await;
			}
			GuardOutcome::Allow
		}
	}));
	let changes = record_changes(&router);

	let (slow, fast, ()) = futures::join!(
		router.navigate_to("/one"),
		router.navigate_to("/login"),
		async {
			tokio::task::yield_now().await;
			release.send(()).unwrap();
		},
	);

	assert_eq!(slow.unwrap(), NavigationOutcome::Committed);
	assert_eq!(fast.unwrap(), NavigationOutcome::Committed);
	assert_eq!(matched(&router).as_deref(), Some("/login"));
	assert_eq!(host.entries(), vec!["/", "/one", "/login"]);
	assert_eq!(
		*changes.lock(),
		vec![
			(Some("/".to_string()), "/one".to_string()),
			(Some("/one".to_string()), "/login".to_string()),
		]
	);
	assert_eq!(
		*seen_from.lock(),
		vec![Some("/".to_string()), Some("/one".to_string())]
	);
}
