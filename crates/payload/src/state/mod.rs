//! Tree-wide state shared by every payload of one render.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;

mod head;

pub use head::{Title, TreeHeadState, supersedes};

/// Prefix-scoped id generator producing `{prefix}s1`, `{prefix}s2`, ...
///
/// Clones share the counter.
#[derive(Debug, Clone)]
pub struct IdGenerator {
	prefix: Rc<str>,
	next: Rc<Cell<u64>>,
}

impl IdGenerator {
	/// Creates a generator whose first id is `{prefix}s1`.
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: Rc::from(prefix.into()),
			next: Rc::new(Cell::new(1)),
		}
	}

	/// Returns the configured prefix.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Generates the next unique id and increments the counter.
	#[allow(clippy::should_implement_trait, reason = "convention")]
	pub fn next(&self) -> String {
		let n = self.next.get();
		self.next.set(n.wrapping_add(1));
		format!("{}s{n}", self.prefix)
	}
}

impl Default for IdGenerator {
	fn default() -> Self {
		Self::new("")
	}
}

/// A style or asset emitted by some scope, identified by its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
	/// Dedup key.
	pub hash: String,
	/// Payload text (stylesheet body, asset reference, ...).
	pub code: String,
}

impl StyleRecord {
	/// Creates a record.
	pub fn new(hash: impl Into<String>, code: impl Into<String>) -> Self {
		Self {
			hash: hash.into(),
			code: code.into(),
		}
	}
}

/// Insertion-ordered set of [`StyleRecord`]s deduplicated by hash.
#[derive(Debug, Clone, Default)]
pub struct StyleSet {
	records: IndexMap<String, StyleRecord>,
}

impl StyleSet {
	/// Inserts `record` unless its hash is present. The first record for a hash wins.
	pub fn insert(&mut self, record: StyleRecord) -> bool {
		if self.records.contains_key(&record.hash) {
			return false;
		}
		self.records.insert(record.hash.clone(), record);
		true
	}

	/// Returns `true` if a record with `hash` is present.
	pub fn contains(&self, hash: &str) -> bool {
		self.records.contains_key(hash)
	}

	/// Iterates records in insertion order.
	pub fn records(&self) -> impl Iterator<Item = &StyleRecord> {
		self.records.values()
	}

	/// Number of distinct hashes.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns `true` if the set holds no records.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

#[derive(Debug)]
struct TreeStateInner {
	ids: IdGenerator,
	styles: Rc<RefCell<StyleSet>>,
	head: TreeHeadState,
}

/// State shared by reference across an entire payload tree.
///
/// Cloning the handle shares the same state. [`TreeState::copy`] forks an
/// independent instance for a speculative branch and [`TreeState::subsume`]
/// collapses it back.
#[derive(Debug, Clone)]
pub struct TreeState {
	inner: Rc<RefCell<TreeStateInner>>,
}

impl Default for TreeState {
	fn default() -> Self {
		Self::new("")
	}
}

impl TreeState {
	/// Creates fresh state whose ids carry `id_prefix`.
	pub fn new(id_prefix: impl Into<String>) -> Self {
		let ids = IdGenerator::new(id_prefix);
		let head = TreeHeadState::new(ids.clone());
		Self {
			inner: Rc::new(RefCell::new(TreeStateInner {
				ids,
				styles: Rc::new(RefCell::new(StyleSet::default())),
				head,
			})),
		}
	}

	/// Returns `true` if both handles point at the same state.
	pub fn ptr_eq(&self, other: &TreeState) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Generates the next unique id.
	pub fn uid(&self) -> String {
		self.inner.borrow().ids.next()
	}

	/// Returns the id generator.
	pub fn ids(&self) -> IdGenerator {
		self.inner.borrow().ids.clone()
	}

	/// Adds a style record to the tree-wide set; returns `false` on a duplicate hash.
	pub fn add_style(&self, record: StyleRecord) -> bool {
		let styles = Rc::clone(&self.inner.borrow().styles);
		styles.borrow_mut().insert(record)
	}

	/// Returns a snapshot of the tree-wide style set.
	pub fn styles(&self) -> StyleSet {
		self.inner.borrow().styles.borrow().clone()
	}

	/// Returns the head state handle.
	pub fn head(&self) -> TreeHeadState {
		self.inner.borrow().head.clone()
	}

	/// Forks an independent state: a new style set and head state, the same id generator.
	pub fn copy(&self) -> Self {
		let inner = self.inner.borrow();
		let styles = inner.styles.borrow().clone();
		Self {
			inner: Rc::new(RefCell::new(TreeStateInner {
				ids: inner.ids.clone(),
				styles: Rc::new(RefCell::new(styles)),
				head: inner.head.copy(),
			})),
		}
	}

	/// Replaces this state's fields with `other`'s, in place.
	///
	/// `other` keeps a detached copy of its style set, so styles added through
	/// it afterwards do not reach this state.
	pub fn subsume(&self, other: &TreeState) {
		if self.ptr_eq(other) {
			return;
		}
		let mut theirs = other.inner.borrow_mut();
		let mut ours = self.inner.borrow_mut();
		let detached = theirs.styles.borrow().clone();
		ours.styles = std::mem::replace(&mut theirs.styles, Rc::new(RefCell::new(detached)));
		ours.ids = theirs.ids.clone();
		ours.head.subsume(&theirs.head);
		tracing::trace!(styles = ours.styles.borrow().len(), "tree_state.subsume");
	}
}

#[cfg(test)]
mod tests;
