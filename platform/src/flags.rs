//! Flag word as seen by the accelerator library.
//!
//! The library predates the typed state machine in [`crate::mutex`] and only
//! reads a bit mask on each mutex record. [`MutexFlags`] is that mask; it is
//! derived from [`MutexKind`], never stored.

use bitflags::bitflags;

use crate::mutex::MutexKind;

bitflags! {
	/// Validity and provenance bits of a logical mutex.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct MutexFlags: u32 {
		/// The mutex is initialized and may be locked.
		const IS_VALID = 1 << 0;
		/// The native lock was borrowed from the pool and must be returned.
		const IS_ALLOCATED = 1 << 1;
	}
}

impl From<MutexKind> for MutexFlags {
	fn from(kind: MutexKind) -> Self {
		match kind {
			MutexKind::Invalid => MutexFlags::empty(),
			MutexKind::ValidStatic => MutexFlags::IS_VALID,
			MutexKind::ValidBorrowed => MutexFlags::IS_VALID | MutexFlags::IS_ALLOCATED,
		}
	}
}
