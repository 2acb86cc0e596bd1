//! Slot Pool — a bounded set of native locks lent out on demand.
//!
//! The pool owns `N` native locks that are always validly initialized, plus a
//! per-slot state table guarded by one allocation lock. Callers borrow a lock
//! with [`SlotPool::acquire_slot`] and give it back with
//! [`SlotPool::release_slot`].
//!
//! **Invariants:**
//! - A slot is marked in use iff exactly one live [`SlotHandle`] names it.
//! - The allocation lock covers only the scan-and-flip of one slot. Locking
//!   and unlocking a borrowed native lock never touches it.
//! - Handles are generation-guarded `(index, generation)` pairs. Releasing a
//!   slot bumps its generation, so a handle minted before the release (or by
//!   another pool) is rejected instead of freeing someone else's slot.

use spin::Mutex;

use crate::error::PoolError;
use crate::sync::{NativeLock, TicketLock};

/// Number of pooled native locks in the reference configuration.
pub const POOL_SIZE: usize = 64;

// ── Slot State ──────────────────────────────────────────────────

/// Per-slot bookkeeping, protected by the allocation lock.
#[derive(Debug, Clone, Copy)]
struct SlotState {
	in_use: bool,
	generation: u32,
}

impl SlotState {
	const FREE: SlotState = SlotState {
		in_use: false,
		generation: 0,
	};
}

// ── Slot Handle ─────────────────────────────────────────────────

/// Proof of a borrowed pool slot.
///
/// Deliberately neither `Clone` nor `Copy`: giving a slot back consumes the
/// handle, so the same borrow cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
pub struct SlotHandle {
	index: usize,
	generation: u32,
}

impl SlotHandle {
	/// Position of the slot in the pool.
	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Generation the slot had when this handle was issued.
	#[inline]
	pub fn generation(&self) -> u32 {
		self.generation
	}
}

// ── Slot Pool ───────────────────────────────────────────────────

/// A fixed-size pool of native locks.
///
/// Constructible in a `static`:
/// ```
/// use cc3xx_platform::pool::SlotPool;
///
/// static POOL: SlotPool = SlotPool::new();
///
/// let slot = POOL.acquire_slot().unwrap();
/// assert_eq!(POOL.in_use(), 1);
/// POOL.release_slot(slot).unwrap();
/// assert_eq!(POOL.in_use(), 0);
/// ```
pub struct SlotPool<L: NativeLock = TicketLock, const N: usize = POOL_SIZE> {
	locks: [L; N],
	slots: Mutex<[SlotState; N]>,
}

impl<L: NativeLock, const N: usize> SlotPool<L, N> {
	/// Create a pool with every slot free and every lock unlocked.
	pub const fn new() -> Self {
		Self {
			locks: [const { L::INIT }; N],
			slots: Mutex::new([SlotState::FREE; N]),
		}
	}

	/// Borrow the first free slot.
	///
	/// The slot's native lock is reset to the unlocked state before it is
	/// handed out. Returns `None` when every slot is in use; exhaustion is an
	/// expected outcome at this layer.
	pub fn acquire_slot(&self) -> Option<SlotHandle> {
		let handle = {
			let mut slots = self.slots.lock();
			slots
				.iter_mut()
				.enumerate()
				.find(|(_, slot)| !slot.in_use)
				.map(|(index, slot)| {
					self.locks[index].reset();
					slot.in_use = true;
					SlotHandle {
						index,
						generation: slot.generation,
					}
				})
		};

		match &handle {
			Some(h) => log::debug!("pool: lent slot {} (gen {})", h.index, h.generation),
			None => log::warn!("pool: exhausted, all {} slots in use", N),
		}
		handle
	}

	/// Give a borrowed slot back to the pool.
	///
	/// The native lock is left as is; the next [`acquire_slot`](Self::acquire_slot)
	/// resets it. Handles that do not name a currently lent slot of this pool
	/// are rejected and leave the pool untouched.
	pub fn release_slot(&self, handle: SlotHandle) -> Result<(), PoolError> {
		let SlotHandle { index, generation } = handle;
		{
			let mut slots = self.slots.lock();
			let slot = slots.get_mut(index).ok_or(PoolError::OutOfRange {
				index,
				capacity: N,
			})?;
			if !slot.in_use {
				return Err(PoolError::NotInUse { index });
			}
			if slot.generation != generation {
				return Err(PoolError::StaleHandle {
					index,
					held: generation,
					current: slot.generation,
				});
			}
			slot.in_use = false;
			slot.generation = slot.generation.wrapping_add(1);
		}
		log::debug!("pool: slot {} returned", index);
		Ok(())
	}

	/// Resolve a handle to its native lock.
	///
	/// Plain index lookup; the allocation lock is not taken. Returns `None`
	/// for an index outside this pool.
	#[inline]
	pub fn native(&self, handle: &SlotHandle) -> Option<&L> {
		self.native_at(handle.index)
	}

	/// Native lock at `index`, whether or not it is lent out.
	#[inline]
	pub fn native_at(&self, index: usize) -> Option<&L> {
		self.locks.get(index)
	}

	/// Total number of slots.
	#[inline]
	pub const fn capacity(&self) -> usize {
		N
	}

	/// Number of slots currently lent out.
	pub fn in_use(&self) -> usize {
		self.slots.lock().iter().filter(|s| s.in_use).count()
	}

	/// Number of slots available for borrowing.
	pub fn available(&self) -> usize {
		N - self.in_use()
	}

	/// Whether slot `index` is currently lent out. `false` if out of range.
	pub fn is_slot_in_use(&self, index: usize) -> bool {
		self.slots.lock().get(index).is_some_and(|s| s.in_use)
	}
}

impl<L: NativeLock, const N: usize> Default for SlotPool<L, N> {
	fn default() -> Self {
		Self::new()
	}
}
