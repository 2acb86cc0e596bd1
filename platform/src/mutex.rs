//! Logical Mutex Manager — the four-operation lock contract.
//!
//! Each crypto subsystem owns one [`LogicalMutex`] and calls `init`, `lock`,
//! `unlock` and `free` on it through a [`MutexManager`]. The manager decides
//! whether the mutex runs on a native lock wired in at configuration time or
//! on one borrowed from the [`SlotPool`].
//!
//! State machine per logical mutex:
//!
//! ```text
//!            init (static slot)              init (no static slot)
//!   Invalid ─────────────────▶ ValidStatic   Invalid ──────────▶ ValidBorrowed
//!      ▲                            │           ▲                     │
//!      └────────── free ────────────┘           └─── free (release) ──┘
//! ```
//!
//! Handles are `Option<&LogicalMutex>` so an absent handle, the C contract's
//! null pointer, stays expressible. Only `lock` reports it as an error; the
//! other three operations treat it as fatal.

use spin::Mutex;

use crate::abort::Abort;
use crate::error::PlatformError;
use crate::flags::MutexFlags;
use crate::pool::{SlotHandle, SlotPool, POOL_SIZE};
use crate::sync::{NativeLock, TicketLock};

/// Where a logical mutex currently gets its native lock from.
#[derive(Debug)]
enum MutexState {
	Invalid,
	ValidStatic,
	ValidBorrowed(SlotHandle),
}

impl MutexState {
	fn kind(&self) -> MutexKind {
		match self {
			MutexState::Invalid => MutexKind::Invalid,
			MutexState::ValidStatic => MutexKind::ValidStatic,
			MutexState::ValidBorrowed(_) => MutexKind::ValidBorrowed,
		}
	}
}

/// Observable state of a logical mutex, without the slot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexKind {
	Invalid,
	ValidStatic,
	ValidBorrowed,
}

/// A caller-facing lock record.
///
/// The record is shared: many threads may `lock`/`unlock` it through `&self`.
/// `init` and `free` are expected to be sequenced by the owning subsystem.
pub struct LogicalMutex<'a, L: NativeLock = TicketLock> {
	/// Native lock fixed at configuration time. Survives `free`.
	static_slot: Option<&'a L>,
	/// Held only to read or flip the state, never while blocking on the
	/// native lock.
	state: Mutex<MutexState>,
}

impl<'a, L: NativeLock> LogicalMutex<'a, L> {
	/// A pool-backed logical mutex, initially invalid.
	pub const fn new() -> Self {
		Self {
			static_slot: None,
			state: Mutex::new(MutexState::Invalid),
		}
	}

	/// A logical mutex permanently wired to `native`, initially invalid.
	pub const fn with_static(native: &'a L) -> Self {
		Self {
			static_slot: Some(native),
			state: Mutex::new(MutexState::Invalid),
		}
	}

	pub fn kind(&self) -> MutexKind {
		self.state.lock().kind()
	}

	/// The flag word the accelerator library reads for this mutex.
	pub fn flags(&self) -> MutexFlags {
		self.kind().into()
	}

	/// Pool index of the borrowed slot, if any.
	pub fn slot_index(&self) -> Option<usize> {
		match &*self.state.lock() {
			MutexState::ValidBorrowed(handle) => Some(handle.index()),
			_ => None,
		}
	}

	/// The statically wired native lock, if any.
	pub fn static_slot(&self) -> Option<&'a L> {
		self.static_slot
	}
}

impl<L: NativeLock> Default for LogicalMutex<'_, L> {
	fn default() -> Self {
		Self::new()
	}
}

impl<L: NativeLock> core::fmt::Debug for LogicalMutex<'_, L> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("LogicalMutex")
			.field("static", &self.static_slot.is_some())
			.field("kind", &self.kind())
			.field("slot", &self.slot_index())
			.finish()
	}
}

/// Implements `init`/`lock`/`unlock`/`free` over one shared [`SlotPool`].
pub struct MutexManager<'p, A: Abort, L: NativeLock = TicketLock, const N: usize = POOL_SIZE> {
	pool: &'p SlotPool<L, N>,
	abort: A,
}

impl<'p, A: Abort, L: NativeLock, const N: usize> MutexManager<'p, A, L, N> {
	pub const fn new(pool: &'p SlotPool<L, N>, abort: A) -> Self {
		Self { pool, abort }
	}

	pub fn pool(&self) -> &'p SlotPool<L, N> {
		self.pool
	}

	/// Bring a logical mutex into a valid, unlocked state.
	///
	/// A statically wired mutex reuses its native lock. Otherwise a slot is
	/// borrowed from the pool; if none is left the abort path is taken.
	/// Calling `init` on a valid mutex only resets its native lock.
	pub fn init(&self, mutex: Option<&LogicalMutex<'_, L>>) {
		let Some(mutex) = mutex else {
			self.abort.abort("mutex_init called with NULL parameter");
		};

		let mut state = mutex.state.lock();
		match state.kind() {
			kind @ (MutexKind::ValidStatic | MutexKind::ValidBorrowed) => {
				self.native_of(mutex, &state).reset();
				log::debug!("mutex: re-init {:?}", kind);
			}
			MutexKind::Invalid => match mutex.static_slot {
				Some(native) => {
					native.reset();
					*state = MutexState::ValidStatic;
					log::debug!("mutex: init on static slot");
				}
				None => match self.pool.acquire_slot() {
					Some(handle) => {
						log::debug!("mutex: init on pool slot {}", handle.index());
						*state = MutexState::ValidBorrowed(handle);
					}
					None => {
						drop(state);
						self.abort.abort("Could not allocate mutex");
					}
				},
			},
		}
	}

	/// Block until the mutex's native lock is held.
	///
	/// The one recoverable operation: an absent or uninitialized mutex is
	/// reported to the caller instead of aborting.
	pub fn lock(&self, mutex: Option<&LogicalMutex<'_, L>>) -> Result<(), PlatformError> {
		let mutex = mutex.ok_or(PlatformError::NullParam)?;
		let native = self.resolve(mutex).ok_or(PlatformError::NotInitialized)?;
		native.lock();
		Ok(())
	}

	/// Release the mutex's native lock.
	pub fn unlock(&self, mutex: Option<&LogicalMutex<'_, L>>) {
		let Some(mutex) = mutex else {
			self.abort.abort("mutex_unlock called with NULL parameter");
		};
		let Some(native) = self.resolve(mutex) else {
			self.abort.abort("mutex_unlock called on uninitialized mutex");
		};
		if !native.unlock() {
			log::warn!("mutex: unlock of a mutex that is not held");
		}
	}

	/// Reset a logical mutex to `Invalid`, returning a borrowed slot.
	///
	/// Freeing an invalid mutex is a no-op. A static slot stays wired for the
	/// next `init`.
	pub fn free(&self, mutex: Option<&LogicalMutex<'_, L>>) {
		let Some(mutex) = mutex else {
			self.abort.abort("mutex_free called with NULL parameter");
		};

		let mut state = mutex.state.lock();
		match core::mem::replace(&mut *state, MutexState::Invalid) {
			MutexState::Invalid => {}
			MutexState::ValidStatic => {
				if let Some(native) = mutex.static_slot {
					native.reset();
				}
				log::debug!("mutex: freed static slot");
			}
			MutexState::ValidBorrowed(handle) => {
				let index = handle.index();
				if let Err(e) = self.pool.release_slot(handle) {
					drop(state);
					log::error!("mutex: pool refused slot {}: {}", index, e);
					self.abort.abort("mutex slot rejected by pool");
				}
				log::debug!("mutex: freed pool slot {}", index);
			}
		}
	}

	/// Native lock backing a valid mutex, `None` if the mutex is invalid.
	///
	/// The state lock is released before this returns.
	fn resolve<'s>(&'s self, mutex: &'s LogicalMutex<'_, L>) -> Option<&'s L> {
		let state = mutex.state.lock();
		if matches!(*state, MutexState::Invalid) {
			return None;
		}
		let native = self.native_of(mutex, &state);
		drop(state);
		Some(native)
	}

	/// Native lock for a valid state. Aborts if a borrowed handle does not
	/// belong to this manager's pool.
	fn native_of<'s>(&'s self, mutex: &'s LogicalMutex<'_, L>, state: &MutexState) -> &'s L {
		let native = match state {
			MutexState::ValidStatic => mutex.static_slot,
			MutexState::ValidBorrowed(handle) => self.pool.native(handle),
			MutexState::Invalid => None,
		};
		match native {
			Some(native) => native,
			None => self.abort.abort("mutex slot rejected by pool"),
		}
	}
}
