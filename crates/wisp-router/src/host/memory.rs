//! In-memory navigation host.

use super::{ListenerId, NavigationFuture, NavigationHost, NavigationListener};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
struct History {
	entries: Vec<String>,
	cursor: usize,
}

impl History {
	fn current(&self) -> &str {
		&self.entries[self.cursor]
	}
}

/// A [`NavigationHost`] backed by an in-memory history stack.
///
/// History changes that a browser would report through `popstate`
/// ([`back`](NavigationHost::back), [`forward`](NavigationHost::forward) and
/// [`enter_fragment`](Self::enter_fragment)) call the registered listeners.
/// The futures they return are queued; [`settle`](Self::settle) runs them.
pub struct MemoryHost {
	history: Mutex<History>,
	listeners: Mutex<Vec<(ListenerId, NavigationListener)>>,
	pending: Mutex<Vec<NavigationFuture>>,
	next_listener: AtomicU64,
}

impl std::fmt::Debug for MemoryHost {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHost")
			.field("history", &*self.history.lock())
			.field("listeners", &self.listeners.lock().len())
			.field("pending", &self.pending.lock().len())
			.finish()
	}
}

impl Default for MemoryHost {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryHost {
	/// Creates a host whose location has no fragment.
	pub fn new() -> Self {
		Self::with_fragment("")
	}

	/// Creates a host whose location starts at `fragment`.
	pub fn with_fragment(fragment: &str) -> Self {
		Self {
			history: Mutex::new(History {
				entries: vec![fragment.to_string()],
				cursor: 0,
			}),
			listeners: Mutex::new(Vec::new()),
			pending: Mutex::new(Vec::new()),
			next_listener: AtomicU64::new(1),
		}
	}

	/// All history entries, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.history.lock().entries.clone()
	}

	/// Index of the current entry in [`entries`](Self::entries).
	pub fn position(&self) -> usize {
		self.history.lock().cursor
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	/// Simulates the user typing a new fragment into the address bar.
	pub fn enter_fragment(&self, fragment: &str) {
		self.push_fragment(fragment);
		self.notify();
	}

	/// Runs queued listener futures, including any queued while running,
	/// until none remain.
	pub async fn settle(&self) {
		loop {
			let batch = std::mem::take(&mut *self.pending.lock());
			if batch.is_empty() {
				break;
			}
			for future in batch {
				future.await;
			}
		}
	}

	fn notify(&self) {
		let fragment = self.current_fragment();
		let listeners: Vec<NavigationListener> = self
			.listeners
			.lock()
			.iter()
			.map(|(_, listener)| listener.clone())
			.collect();

		let futures: Vec<NavigationFuture> = listeners
			.iter()
			.map(|listener| listener(fragment.clone()))
			.collect();
		self.pending.lock().extend(futures);
	}

	fn step(&self, forward: bool) {
		let moved = {
			let mut history = self.history.lock();
			if forward && history.cursor + 1 < history.entries.len() {
				history.cursor += 1;
				true
			} else if !forward && history.cursor > 0 {
				history.cursor -= 1;
				true
			} else {
				false
			}
		};
		if moved {
			self.notify();
		}
	}
}

impl NavigationHost for MemoryHost {
	fn current_fragment(&self) -> String {
		self.history.lock().current().to_string()
	}

	fn replace_fragment(&self, fragment: &str) {
		let mut history = self.history.lock();
		let cursor = history.cursor;
		history.entries[cursor] = fragment.to_string();
	}

	fn push_fragment(&self, fragment: &str) {
		let mut history = self.history.lock();
		let next = history.cursor + 1;
		history.entries.truncate(next);
		history.entries.push(fragment.to_string());
		history.cursor = next;
	}

	fn back(&self) {
		self.step(false);
	}

	fn forward(&self) {
		self.step(true);
	}

	fn add_navigation_listener(&self, listener: NavigationListener) -> ListenerId {
		let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().push((id, listener));
		id
	}

	fn remove_navigation_listener(&self, id: ListenerId) {
		self.listeners.lock().retain(|(existing, _)| *existing != id);
	}
}
