//! Blocking and suspending collection of a payload tree into [`Rendered`] output.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};

use super::{Entry, Payload, work};
use crate::error::Result;
use crate::{Channel, Rendered};

impl Payload {
	/// Collects this subtree without suspending.
	///
	/// Fails with [`crate::RenderError::Pending`] if any node in the subtree
	/// still has unsettled work; collect with [`Payload::collect_async`] then.
	pub fn collect(&self) -> Result<Rendered> {
		let mut out = Rendered::default();
		self.collect_into(&mut out)?;
		Ok(out)
	}

	fn collect_into(&self, out: &mut Rendered) -> Result<()> {
		let node = self.node.borrow();
		node.work.borrow().check_settled()?;
		collect_entries_into(&node.entries, node.channel, out)
	}

	/// Collects this subtree, waiting for every producer and followup in it.
	///
	/// Sibling subtrees are driven concurrently; their output is joined in
	/// document order regardless of which settles first.
	pub async fn collect_async(&self) -> Result<Rendered> {
		self.collect_boxed().await
	}

	fn collect_boxed(&self) -> LocalBoxFuture<'static, Result<Rendered>> {
		let this = self.clone();
		async move {
			let work = Rc::clone(&this.node.borrow().work);
			work::settle(&work).await?;
			let segments = {
				let node = this.node.borrow();
				segments(&node.entries, node.channel)
			};
			join_segments(segments).await
		}
		.boxed_local()
	}
}

pub(super) fn collect_entries(entries: &[Entry], channel: Channel) -> Result<Rendered> {
	let mut out = Rendered::default();
	collect_entries_into(entries, channel, &mut out)?;
	Ok(out)
}

fn collect_entries_into(entries: &[Entry], channel: Channel, out: &mut Rendered) -> Result<()> {
	for entry in entries {
		match entry {
			Entry::Fragment(text) => out.push(channel, text),
			Entry::Child(child) => child.collect_into(out)?,
		}
	}
	Ok(())
}

/// One future per entry; fragments resolve immediately.
pub(super) fn segments(entries: &[Entry], channel: Channel) -> Vec<LocalBoxFuture<'static, Result<Rendered>>> {
	entries
		.iter()
		.map(|entry| match entry {
			Entry::Fragment(text) => {
				let mut out = Rendered::default();
				out.push(channel, text);
				future::ready(Ok(out)).boxed_local()
			}
			Entry::Child(child) => child.collect_boxed(),
		})
		.collect()
}

/// Drives all segments together and concatenates them by position.
pub(super) async fn join_segments(segments: Vec<LocalBoxFuture<'static, Result<Rendered>>>) -> Result<Rendered> {
	let parts = future::try_join_all(segments).await?;
	let mut out = Rendered::default();
	for part in &parts {
		out.extend(part);
	}
	Ok(out)
}
