//! Store notifications.

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Kind of edit reported by [`StoreEvent::Changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
	/// Sprites appended
	Add,

	/// Sprites replaced in place
	Replace,

	/// Sprites blanked or truncated
	Remove,
}

/// Lifecycle and change notifications published by a [`Store`](super::Store).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreEvent {
	/// A file was opened or a temporary store created
	Loaded,

	/// Sprites were edited
	Changed {
		/// Kind of edit
		kind: ChangeKind,
		/// Affected ids, in processing order
		ids: Vec<u32>,
	},

	/// A compile finished and the store now reads the new file
	Compiled,

	/// A compile was cancelled; the store is unchanged
	CompileCancelled,

	/// The store was unloaded
	Unloaded,
}

/// Fan-out list of event channels.
#[derive(Debug, Default)]
pub(super) struct Subscribers {
	senders: Vec<Sender<StoreEvent>>,
}

impl Subscribers {
	pub(super) fn subscribe(&mut self) -> Receiver<StoreEvent> {
		let (sender, receiver) = unbounded();
		self.senders.push(sender);
		receiver
	}

	/// Sends `event` to every subscriber, dropping those that hung up.
	pub(super) fn emit(&mut self, event: StoreEvent) {
		self.senders.retain(|sender| sender.send(event.clone()).is_ok());
	}

	#[cfg(test)]
	pub(super) fn len(&self) -> usize {
		self.senders.len()
	}
}
