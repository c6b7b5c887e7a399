//! One-shot render entry points over a fresh payload tree.

use crate::config::RenderOptions;
use crate::error::Result;
use crate::payload::{Payload, Produced};
use crate::state::TreeState;
use crate::Rendered;

/// Output of a completed render.
#[derive(Debug)]
pub struct RenderResult {
	/// Collected head and body content.
	pub content: Rendered,
	/// Settled tree state: styles, head styles, and the winning title.
	pub state: TreeState,
}

fn root<F, R>(options: &RenderOptions, produce: F) -> Payload
where
	F: FnOnce(Payload) -> R,
	R: Into<Produced>,
{
	tracing::debug!(id_prefix = %options.id_prefix, "render.start");
	let root = Payload::new(TreeState::new(options.id_prefix.clone()));
	root.run(produce);
	root
}

/// Renders `produce` into a root payload and collects it without suspending.
///
/// Fails with [`crate::RenderError::Pending`] if any producer suspended.
pub fn render<F, R>(options: &RenderOptions, produce: F) -> Result<RenderResult>
where
	F: FnOnce(Payload) -> R,
	R: Into<Produced>,
{
	let root = root(options, produce);
	let content = root.collect()?;
	tracing::debug!(head = content.head.len(), body = content.body.len(), "render.done");
	Ok(RenderResult {
		content,
		state: root.state(),
	})
}

/// Renders `produce` into a root payload and collects it once all work settles.
pub async fn render_async<F, R>(options: &RenderOptions, produce: F) -> Result<RenderResult>
where
	F: FnOnce(Payload) -> R,
	R: Into<Produced>,
{
	let root = root(options, produce);
	let content = root.collect_async().await?;
	tracing::debug!(head = content.head.len(), body = content.body.len(), "render.done");
	Ok(RenderResult {
		content,
		state: root.state(),
	})
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{Channel, RenderError};

	#[test]
	fn render_collects_sync_tree() {
		let options = RenderOptions::with_id_prefix("p-");
		let result = render(&options, |root| {
			let id = root.state().uid();
			root.push(format!("<div id=\"{id}\">"));
			root.child_in(Channel::Head, |head| {
				head.push("<title>t</title>");
			});
			root.push("</div>");
		})
		.unwrap();
		assert_eq!(result.content, Rendered::new("<title>t</title>", "<div id=\"p-s1\"></div>"));
	}

	#[test]
	fn render_rejects_suspended_producer() {
		let result = render(&RenderOptions::default(), |root| {
			root.child(|child| {
				Produced::suspend(async move {
					futures::future::pending::<()>().await;
					child.push("never");
					Ok(())
				})
			});
		});
		assert!(matches!(result, Err(RenderError::Pending)));
	}

	#[tokio::test]
	async fn render_async_waits_for_producers() {
		let result = render_async(&RenderOptions::default(), |root| {
			Produced::suspend(async move {
				tokio::task::yield_now().await;
				root.push("late");
				root.title("Hello");
				Ok(())
			})
		})
		.await
		.unwrap();
		assert_eq!(result.content.body, "late");
		assert_eq!(result.state.head().title().map(|t| t.value), Some("Hello".to_string()));
	}
}
