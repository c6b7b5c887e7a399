//! Compaction: collapsing a range of entries into transformed content.

use std::ops::{Bound, RangeBounds};
use std::rc::Rc;

use futures::FutureExt;

use super::collect::{collect_entries, join_segments, segments};
use super::{Entry, Payload, Transformed, work};
use crate::error::RenderError;
use crate::{Channel, Rendered};

impl Payload {
	/// Replaces `range` of this node's entries with a single placeholder child
	/// holding `transform` applied to the range's collected content.
	///
	/// When the range is settled and `transform` is ready, the placeholder is
	/// filled before this returns. Otherwise the remaining steps are queued as
	/// a followup on this node and run when it is collected asynchronously.
	/// Bounds past the end are clamped to the entry count.
	pub fn compact<F, T>(&self, range: impl RangeBounds<usize>, transform: F)
	where
		F: FnOnce(Rendered) -> T + 'static,
		T: Into<Transformed>,
	{
		let (placeholder, extracted, channel, pending_work) = {
			let len = self.len();
			let start = match range.start_bound() {
				Bound::Included(&s) => s,
				Bound::Excluded(&s) => s.saturating_add(1),
				Bound::Unbounded => 0,
			}
			.min(len);
			let end = match range.end_bound() {
				Bound::Included(&e) => e.saturating_add(1),
				Bound::Excluded(&e) => e,
				Bound::Unbounded => len,
			}
			.clamp(start, len);

			let placeholder = self.spawn_child(self.channel());
			let mut node = self.node.borrow_mut();
			// `spawn_child` appended the placeholder; move it to the start of the range.
			let appended = node.entries.pop();
			let extracted: Vec<Entry> = node.entries.splice(start..end, appended).collect();
			tracing::trace!(start, end, extracted = extracted.len(), "payload.compact");
			(placeholder, extracted, node.channel, Rc::clone(&node.work))
		};
		Payload::anchor_compacted(&extracted, &placeholder);

		let deferred = match collect_entries(&extracted, channel) {
			Ok(content) => match transform(content).into() {
				Transformed::Ready(out) => {
					placeholder.fill(&out);
					return;
				}
				Transformed::Suspended(pending) => async move {
					let out = pending.await?;
					placeholder.fill(&out);
					Ok::<(), RenderError>(())
				}
				.boxed_local(),
			},
			Err(RenderError::Pending) => {
				let segments = segments(&extracted, channel);
				async move {
					let content = join_segments(segments).await?;
					let out = match transform(content).into() {
						Transformed::Ready(out) => out,
						Transformed::Suspended(pending) => pending.await?,
					};
					placeholder.fill(&out);
					Ok::<(), RenderError>(())
				}
				.boxed_local()
			}
			Err(err) => futures::future::ready(Err(err)).boxed_local(),
		};
		tracing::trace!("payload.compact.deferred");
		work::enqueue(&pending_work, deferred);
	}

	/// Appends one leaf child per non-empty channel of `content`.
	fn fill(&self, content: &Rendered) {
		for channel in Channel::ALL {
			let text = content.get(channel);
			if !text.is_empty() {
				self.child_in(channel, |leaf| leaf.push(text));
			}
		}
	}
}
