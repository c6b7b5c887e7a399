//! Per-node bookkeeping of async work that is still populating a payload.

use std::cell::RefCell;
use std::future::Future;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::Rendered;
use crate::error::{RenderError, Result};

/// A started unit of work. Shared so the original tree and its copies can await it.
pub(crate) type Work = Shared<LocalBoxFuture<'static, Result<()>>>;

/// What a producer hands back after being given its payload.
pub enum Produced {
	/// The producer populated the payload before returning.
	Complete,
	/// The producer keeps populating the payload until this future resolves.
	Suspended(LocalBoxFuture<'static, Result<()>>),
}

impl Produced {
	/// Wraps a producer's continuation.
	pub fn suspend(fut: impl Future<Output = Result<()>> + 'static) -> Self {
		Self::Suspended(fut.boxed_local())
	}
}

impl From<()> for Produced {
	fn from((): ()) -> Self {
		Self::Complete
	}
}

/// Output of a compaction transform.
pub enum Transformed {
	/// The transformed content is available now.
	Ready(Rendered),
	/// The transform resolves later.
	Suspended(LocalBoxFuture<'static, Result<Rendered>>),
}

impl Transformed {
	/// Wraps an async transform.
	pub fn suspend(fut: impl Future<Output = Result<Rendered>> + 'static) -> Self {
		Self::Suspended(fut.boxed_local())
	}
}

impl From<Rendered> for Transformed {
	fn from(content: Rendered) -> Self {
		Self::Ready(content)
	}
}

/// Lifecycle of the producer that populates a node.
#[derive(Default)]
pub(crate) enum WorkState {
	/// No async producer was attached; the node was populated synchronously.
	#[default]
	Idle,
	/// A producer future was started and has not been observed to succeed.
	Pending(Work),
	/// The producer future resolved successfully.
	Settled,
}

impl WorkState {
	/// Starts `fut`, polling it once so its synchronous prefix runs immediately.
	pub(crate) fn start(fut: LocalBoxFuture<'static, Result<()>>) -> Self {
		let work = start(fut);
		match work.peek() {
			Some(Ok(())) => Self::Settled,
			_ => Self::Pending(work),
		}
	}

	fn pending(&self) -> Option<Work> {
		match self {
			Self::Pending(work) => Some(work.clone()),
			Self::Idle | Self::Settled => None,
		}
	}
}

/// Async work attached to one node: its producer plus compaction followups.
#[derive(Default)]
pub(crate) struct PendingWork {
	pub(crate) initial: WorkState,
	pub(crate) followups: Vec<Work>,
}

impl PendingWork {
	/// Fails unless every piece of work has already resolved successfully.
	pub(crate) fn check_settled(&self) -> Result<()> {
		if let WorkState::Pending(work) = &self.initial {
			settled(work)?;
		}
		self.followups.iter().try_for_each(settled)
	}
}

/// Registers a followup on `work`, then starts it.
///
/// The followup is listed before it is first polled so that followups it
/// registers itself land after it.
pub(crate) fn enqueue(work: &RefCell<PendingWork>, fut: LocalBoxFuture<'static, Result<()>>) {
	let followup = fut.shared();
	work.borrow_mut().followups.push(followup.clone());
	// Drives the future once; the outcome stays readable through `peek` on the listed handle.
	let _ = followup.now_or_never();
}

fn start(fut: LocalBoxFuture<'static, Result<()>>) -> Work {
	let work = fut.shared();
	// Drives the future once; the outcome stays readable through `peek` on `work`.
	let _ = work.clone().now_or_never();
	work
}

fn settled(work: &Work) -> Result<()> {
	match work.peek() {
		Some(result) => result.clone(),
		None => Err(RenderError::Pending),
	}
}

/// Waits for the producer and then for every followup, in registration order.
///
/// Followups appended while draining are awaited once the cursor reaches them.
pub(crate) async fn settle(work: &RefCell<PendingWork>) -> Result<()> {
	let initial = work.borrow().initial.pending();
	if let Some(initial) = initial {
		initial.await?;
		let mut state = work.borrow_mut();
		if matches!(state.initial, WorkState::Pending(_)) {
			state.initial = WorkState::Settled;
		}
	}

	let mut cursor = 0;
	loop {
		let next = work.borrow().followups.get(cursor).cloned();
		let Some(followup) = next else {
			break;
		};
		followup.await?;
		cursor += 1;
	}
	Ok(())
}
