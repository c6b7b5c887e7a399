//! Head-channel state: the single-winner title slot and head style records.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use super::{IdGenerator, StyleRecord, StyleSet};

/// A title candidate tagged with the structural path of the node that set it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Title {
	/// Sibling indices from the root to the submitting node.
	pub path: Vec<usize>,
	/// Title text.
	pub value: String,
}

impl Title {
	/// Creates a title candidate.
	pub fn new(path: Vec<usize>, value: impl Into<String>) -> Self {
		Self { path, value: value.into() }
	}
}

/// Returns `true` if a candidate at `candidate` should replace a title stored
/// at `stored`.
///
/// Paths are compared index by index up to the longer length. At the first
/// differing index a candidate that ran out is earlier and loses; a stored
/// path that ran out, or a larger candidate segment, wins. Equal paths keep
/// the stored value.
pub fn supersedes(candidate: &[usize], stored: &[usize]) -> bool {
	let len = candidate.len().max(stored.len());
	for i in 0..len {
		match (candidate.get(i), stored.get(i)) {
			(None, _) => return false,
			(Some(_), None) => return true,
			(Some(a), Some(b)) => match a.cmp(b) {
				Ordering::Greater => return true,
				Ordering::Less => return false,
				Ordering::Equal => {}
			},
		}
	}
	false
}

#[derive(Debug)]
struct HeadInner {
	styles: StyleSet,
	title: Option<Title>,
	ids: IdGenerator,
}

/// Head state of one render tree.
///
/// Cloning the handle shares the same state; use [`TreeHeadState::copy`] for an
/// independent snapshot.
#[derive(Debug, Clone)]
pub struct TreeHeadState {
	inner: Rc<RefCell<HeadInner>>,
}

impl TreeHeadState {
	/// Creates empty head state drawing ids from `ids`.
	pub fn new(ids: IdGenerator) -> Self {
		Self {
			inner: Rc::new(RefCell::new(HeadInner {
				styles: StyleSet::default(),
				title: None,
				ids,
			})),
		}
	}

	/// Returns the id generator shared with the owning tree.
	pub fn ids(&self) -> IdGenerator {
		self.inner.borrow().ids.clone()
	}

	/// Generates the next unique id.
	pub fn uid(&self) -> String {
		self.inner.borrow().ids.next()
	}

	/// Returns the current winning title, if any candidate was accepted.
	pub fn title(&self) -> Option<Title> {
		self.inner.borrow().title.clone()
	}

	/// Offers a title candidate and returns whether it became the winner.
	///
	/// The first candidate is always accepted; later ones only replace it when
	/// their path is structurally later (see [`supersedes`]).
	pub fn set_title(&self, candidate: Title) -> bool {
		let mut inner = self.inner.borrow_mut();
		let accept = match &inner.title {
			None => true,
			Some(stored) => supersedes(&candidate.path, &stored.path),
		};
		if accept {
			tracing::trace!(path = ?candidate.path, "head.title.accept");
			inner.title = Some(candidate);
		} else {
			tracing::trace!(path = ?candidate.path, "head.title.reject");
		}
		accept
	}

	/// Adds a head style record; returns `false` if its hash was already present.
	pub fn add_style(&self, record: StyleRecord) -> bool {
		self.inner.borrow_mut().styles.insert(record)
	}

	/// Returns the head style records in insertion order.
	pub fn styles(&self) -> Vec<StyleRecord> {
		self.inner.borrow().styles.records().cloned().collect()
	}

	/// Returns an independent copy sharing only the id generator.
	pub fn copy(&self) -> Self {
		let inner = self.inner.borrow();
		Self {
			inner: Rc::new(RefCell::new(HeadInner {
				styles: inner.styles.clone(),
				title: inner.title.clone(),
				ids: inner.ids.clone(),
			})),
		}
	}

	/// Replaces this state's fields with `other`'s, in place.
	pub fn subsume(&self, other: &TreeHeadState) {
		if Rc::ptr_eq(&self.inner, &other.inner) {
			return;
		}
		let theirs = other.inner.borrow();
		let mut ours = self.inner.borrow_mut();
		ours.styles = theirs.styles.clone();
		ours.title = theirs.title.clone();
		ours.ids = theirs.ids.clone();
	}
}
