//! Output channels and the fixed-shape two-channel accumulator.

/// Output buffer a fragment is emitted into.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
	/// Metadata/header content.
	Head,
	/// Document body content.
	#[default]
	Body,
}

impl Channel {
	/// Both channels, in emission order.
	pub const ALL: [Channel; 2] = [Channel::Head, Channel::Body];

	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Head => "head",
			Self::Body => "body",
		}
	}
}

/// Collected content of a payload subtree, one string per [`Channel`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rendered {
	/// Content emitted into [`Channel::Head`].
	pub head: String,
	/// Content emitted into [`Channel::Body`].
	pub body: String,
}

impl Rendered {
	/// Creates a pair from its two channel strings.
	pub fn new(head: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			head: head.into(),
			body: body.into(),
		}
	}

	/// Returns the content of one channel.
	pub fn get(&self, channel: Channel) -> &str {
		match channel {
			Channel::Head => &self.head,
			Channel::Body => &self.body,
		}
	}

	/// Returns a mutable handle to one channel's buffer.
	pub fn get_mut(&mut self, channel: Channel) -> &mut String {
		match channel {
			Channel::Head => &mut self.head,
			Channel::Body => &mut self.body,
		}
	}

	/// Appends `fragment` to the buffer of `channel`.
	pub fn push(&mut self, channel: Channel, fragment: &str) {
		self.get_mut(channel).push_str(fragment);
	}

	/// Appends both channels of `other` after this pair's content.
	pub fn extend(&mut self, other: &Rendered) {
		for channel in Channel::ALL {
			self.push(channel, other.get(channel));
		}
	}

	/// Returns `true` if both channels are empty.
	pub fn is_empty(&self) -> bool {
		self.head.is_empty() && self.body.is_empty()
	}
}
