//! The payload tree: one node per rendering scope.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::Channel;
use crate::state::{Title, TreeState};

mod collect;
mod compact;
mod work;

use work::{PendingWork, WorkState};
pub use work::{Produced, Transformed};

/// Scope-local state inherited by value from parent to child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchLocal {
	/// Value of the enclosing `<select>`, used to mark matching options.
	pub select_value: Option<String>,
}

pub(crate) enum Entry {
	Fragment(String),
	Child(Payload),
}

/// Where a node that is no longer listed under its parent sits in the document.
///
/// Only read by [`Payload::path`].
#[derive(Clone, Default)]
enum Anchor {
	#[default]
	None,
	/// A structural copy stands at the position of its source.
	CopyOf(Weak<RefCell<Node>>),
	/// An entry compacted away sits at `index` within its range, under the placeholder.
	Compacted { placeholder: Weak<RefCell<Node>>, index: usize },
}

struct Node {
	entries: Vec<Entry>,
	channel: Channel,
	/// Only read by [`Payload::path`].
	parent: Weak<RefCell<Node>>,
	anchor: Anchor,
	work: Rc<RefCell<PendingWork>>,
	local: BranchLocal,
	state: TreeState,
}

/// Handle to one node of a render tree.
///
/// Cloning the handle aliases the node; use [`Payload::copy`] for a structural
/// clone. Producers receive an owned handle so async continuations can keep
/// appending after the spawning call has returned.
#[derive(Clone)]
pub struct Payload {
	node: Rc<RefCell<Node>>,
}

impl std::fmt::Debug for Payload {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let node = self.node.borrow();
		f.debug_struct("Payload")
			.field("channel", &node.channel)
			.field("entries", &node.entries.len())
			.field("local", &node.local)
			.finish_non_exhaustive()
	}
}

impl Default for Payload {
	fn default() -> Self {
		Self::new(TreeState::default())
	}
}

impl Payload {
	/// Creates a body-channel root payload over `state`.
	pub fn new(state: TreeState) -> Self {
		Self::with_channel(state, Channel::Body)
	}

	/// Creates a root payload emitting its own fragments into `channel`.
	pub fn with_channel(state: TreeState, channel: Channel) -> Self {
		Self::from_node(Node {
			entries: Vec::new(),
			channel,
			parent: Weak::new(),
			anchor: Anchor::None,
			work: Rc::default(),
			local: BranchLocal::default(),
			state,
		})
	}

	fn from_node(node: Node) -> Self {
		Self {
			node: Rc::new(RefCell::new(node)),
		}
	}

	/// Channel this node's own fragments are emitted into.
	pub fn channel(&self) -> Channel {
		self.node.borrow().channel
	}

	/// Tree-wide state handle.
	pub fn state(&self) -> TreeState {
		self.node.borrow().state.clone()
	}

	/// Branch-local state of this node.
	pub fn local(&self) -> BranchLocal {
		self.node.borrow().local.clone()
	}

	/// Sets the select value seen by children spawned from now on.
	pub fn set_select_value(&self, value: Option<String>) {
		self.node.borrow_mut().local.select_value = value;
	}

	/// Number of entries (fragments and children) directly under this node.
	pub fn len(&self) -> usize {
		self.node.borrow().entries.len()
	}

	/// Returns `true` if nothing was appended to this node.
	pub fn is_empty(&self) -> bool {
		self.node.borrow().entries.is_empty()
	}

	/// Appends a raw fragment.
	pub fn push(&self, fragment: impl Into<String>) {
		self.node.borrow_mut().entries.push(Entry::Fragment(fragment.into()));
	}

	/// Spawns a child in this node's channel and hands it to `produce`.
	pub fn child<F, R>(&self, produce: F)
	where
		F: FnOnce(Payload) -> R,
		R: Into<Produced>,
	{
		let channel = self.channel();
		self.child_in(channel, produce);
	}

	/// Spawns a child emitting into `channel` and hands it to `produce`.
	///
	/// A suspended producer is recorded on the child; this call never waits for it.
	pub fn child_in<F, R>(&self, channel: Channel, produce: F)
	where
		F: FnOnce(Payload) -> R,
		R: Into<Produced>,
	{
		let child = self.spawn_child(channel);
		child.run(produce);
	}

	pub(crate) fn spawn_child(&self, channel: Channel) -> Payload {
		let mut node = self.node.borrow_mut();
		let child = Self::from_node(Node {
			entries: Vec::new(),
			channel,
			parent: Rc::downgrade(&self.node),
			anchor: Anchor::None,
			work: Rc::default(),
			local: node.local.clone(),
			state: node.state.clone(),
		});
		node.entries.push(Entry::Child(child.clone()));
		child
	}

	/// Runs `produce` against this node, recording its continuation if it suspends.
	pub(crate) fn run<F, R>(&self, produce: F)
	where
		F: FnOnce(Payload) -> R,
		R: Into<Produced>,
	{
		if let Produced::Suspended(fut) = produce(self.clone()).into() {
			let initial = WorkState::start(fut);
			if matches!(initial, WorkState::Pending(_)) {
				tracing::trace!(channel = self.channel().as_str(), "payload.suspend");
			}
			let work = Rc::clone(&self.node.borrow().work);
			work.borrow_mut().initial = initial;
		}
	}

	/// Sibling indices from the root down to this node.
	///
	/// A copy resolves through the node it was copied from, and an entry
	/// compacted away resolves through its placeholder followed by its offset
	/// in the compacted range.
	pub fn path(&self) -> Vec<usize> {
		let mut path = Vec::new();
		let mut current = Rc::clone(&self.node);
		loop {
			let parent = current.borrow().parent.upgrade();
			let Some(parent) = parent else {
				break;
			};
			let index = parent
				.borrow()
				.entries
				.iter()
				.position(|entry| matches!(entry, Entry::Child(child) if Rc::ptr_eq(&child.node, &current)));
			if let Some(index) = index {
				path.push(index);
				current = parent;
				continue;
			}
			let anchor = current.borrow().anchor.clone();
			match anchor {
				Anchor::CopyOf(source) => match source.upgrade() {
					Some(source) => current = source,
					None => break,
				},
				Anchor::Compacted { placeholder, index } => match placeholder.upgrade() {
					Some(placeholder) => {
						path.push(index);
						current = placeholder;
					}
					None => break,
				},
				Anchor::None => break,
			}
		}
		path.reverse();
		path
	}

	/// Offers `value` as the document title from this node's position.
	pub fn title(&self, value: impl Into<String>) -> bool {
		self.state().head().set_title(Title::new(self.path(), value))
	}

	/// Structurally clones this subtree.
	///
	/// Entries are copied recursively; pending work and tree state are shared
	/// with the original.
	pub fn copy(&self) -> Payload {
		let parent = self.node.borrow().parent.clone();
		self.copy_with(parent, None)
	}

	/// Copies this subtree onto a forked [`TreeState`] for speculative rendering.
	///
	/// Merge the result back with [`Payload::subsume`]; that is the only
	/// supported way for two branches to interact.
	pub fn fork(&self) -> Payload {
		let (parent, state) = {
			let node = self.node.borrow();
			(node.parent.clone(), node.state.copy())
		};
		self.copy_with(parent, Some(&state))
	}

	fn copy_with(&self, parent: Weak<RefCell<Node>>, state: Option<&TreeState>) -> Payload {
		let node = self.node.borrow();
		let copy = Self::from_node(Node {
			entries: Vec::with_capacity(node.entries.len()),
			channel: node.channel,
			parent,
			anchor: Anchor::CopyOf(Rc::downgrade(&self.node)),
			work: Rc::clone(&node.work),
			local: node.local.clone(),
			state: state.cloned().unwrap_or_else(|| node.state.clone()),
		});
		let entries = node
			.entries
			.iter()
			.map(|entry| match entry {
				Entry::Fragment(text) => Entry::Fragment(text.clone()),
				Entry::Child(child) => Entry::Child(child.copy_with(Rc::downgrade(&copy.node), state)),
			})
			.collect();
		copy.node.borrow_mut().entries = entries;
		copy
	}

	/// Replaces this node's content with `other`'s while keeping this node's
	/// position in its tree.
	///
	/// `other`'s children move under this node and `other` is left empty. Its
	/// tree state is merged into this node's via [`TreeState::subsume`], which
	/// detaches `other`'s state: styles added through the abandoned branch
	/// afterwards do not reach this tree.
	pub fn subsume(&self, other: &Payload) {
		if Rc::ptr_eq(&self.node, &other.node) {
			return;
		}
		let (entries, work, local, channel, their_state) = {
			let mut theirs = other.node.borrow_mut();
			(
				std::mem::take(&mut theirs.entries),
				Rc::clone(&theirs.work),
				theirs.local.clone(),
				theirs.channel,
				theirs.state.clone(),
			)
		};
		let state = {
			let mut ours = self.node.borrow_mut();
			ours.work = work;
			ours.local = local;
			ours.channel = channel;
			ours.state.clone()
		};
		state.subsume(&their_state);

		for entry in &entries {
			if let Entry::Child(child) = entry {
				child.node.borrow_mut().parent = Rc::downgrade(&self.node);
				child.rebind_state(&state);
			}
		}
		tracing::trace!(entries = entries.len(), "payload.subsume");
		self.node.borrow_mut().entries = entries;
	}

	/// Links entries spliced out of this node's range to `placeholder`.
	pub(crate) fn anchor_compacted(entries: &[Entry], placeholder: &Payload) {
		for (index, entry) in entries.iter().enumerate() {
			if let Entry::Child(child) = entry {
				child.node.borrow_mut().anchor = Anchor::Compacted {
					placeholder: Rc::downgrade(&placeholder.node),
					index,
				};
			}
		}
	}

	fn rebind_state(&self, state: &TreeState) {
		let mut node = self.node.borrow_mut();
		node.state = state.clone();
		for entry in &node.entries {
			if let Entry::Child(child) = entry {
				child.rebind_state(state);
			}
		}
	}
}
