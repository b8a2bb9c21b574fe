//! Browser navigation host backed by `window.location` and `window.history`.

use super::{ListenerId, NavigationHost, NavigationListener};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

type PopStateClosure = Closure<dyn FnMut(web_sys::Event)>;

thread_local! {
	// JS closures are not Send; they live on the thread that owns the window.
	static POPSTATE_CLOSURES: RefCell<HashMap<u64, PopStateClosure>> = RefCell::new(HashMap::new());
}

/// A [`NavigationHost`] for the browser main thread.
///
/// Listeners are attached to `popstate`, which fires on back/forward and when
/// the user edits the hash. Listener futures run via
/// `wasm_bindgen_futures::spawn_local`.
#[derive(Debug, Default)]
pub struct BrowserHost {
	next_listener: AtomicU64,
}

impl BrowserHost {
	pub fn new() -> Self {
		Self::default()
	}
}

fn fragment() -> String {
	web_sys::window()
		.and_then(|window| window.location().hash().ok())
		.map(|hash| hash.trim_start_matches('#').to_string())
		.unwrap_or_default()
}

fn history() -> Option<web_sys::History> {
	web_sys::window().and_then(|window| window.history().ok())
}

fn log_js_error(operation: &str, result: Result<(), JsValue>) {
	if let Err(error) = result {
		tracing::warn!(operation, error = ?error, "history operation failed");
	}
}

impl NavigationHost for BrowserHost {
	fn current_fragment(&self) -> String {
		fragment()
	}

	fn replace_fragment(&self, fragment: &str) {
		if let Some(history) = history() {
			let url = format!("#{fragment}");
			log_js_error(
				"replaceState",
				history.replace_state_with_url(&JsValue::NULL, "", Some(url.as_str())),
			);
		}
	}

	fn push_fragment(&self, fragment: &str) {
		if let Some(history) = history() {
			let url = format!("#{fragment}");
			log_js_error(
				"pushState",
				history.push_state_with_url(&JsValue::NULL, "", Some(url.as_str())),
			);
		}
	}

	fn back(&self) {
		if let Some(history) = history() {
			log_js_error("back", history.back());
		}
	}

	fn forward(&self) {
		if let Some(history) = history() {
			log_js_error("forward", history.forward());
		}
	}

	fn add_navigation_listener(&self, listener: NavigationListener) -> ListenerId {
		let id = self.next_listener.fetch_add(1, Ordering::Relaxed);

		let closure = PopStateClosure::new(move |_event: web_sys::Event| {
			wasm_bindgen_futures::spawn_local(listener(fragment()));
		});

		if let Some(window) = web_sys::window() {
			log_js_error(
				"addEventListener",
				window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref()),
			);
		}
		POPSTATE_CLOSURES.with(|closures| closures.borrow_mut().insert(id, closure));

		ListenerId(id)
	}

	fn remove_navigation_listener(&self, id: ListenerId) {
		let Some(closure) = POPSTATE_CLOSURES.with(|closures| closures.borrow_mut().remove(&id.0))
		else {
			return;
		};

		if let Some(window) = web_sys::window() {
			log_js_error(
				"removeEventListener",
				window.remove_event_listener_with_callback(
					"popstate",
					closure.as_ref().unchecked_ref(),
				),
			);
		}
	}
}
