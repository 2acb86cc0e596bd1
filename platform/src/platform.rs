//! Start-up wiring of the five well-known subsystem mutexes.
//!
//! The accelerator library expects its symmetric, asymmetric, RNG, power and
//! heap mutexes to exist before the first crypto call. Each is statically
//! bound to its own native lock so it never competes for a pool slot; only
//! mutexes created later by the library are pool-backed.
//!
//! On target everything here lives in statics:
//! ```
//! use cc3xx_platform::abort::PanicAbort;
//! use cc3xx_platform::platform::{Platform, PlatformMutexes, StaticLocks, Subsystem};
//! use cc3xx_platform::pool::SlotPool;
//!
//! static POOL: SlotPool = SlotPool::new();
//! static LOCKS: StaticLocks = StaticLocks::new();
//! static MUTEXES: PlatformMutexes<'static> = PlatformMutexes::wire(&LOCKS);
//! static PLATFORM: Platform<'static, PanicAbort> = Platform::new(&POOL, &MUTEXES, PanicAbort);
//!
//! PLATFORM.init_all();
//! let rng = PLATFORM.mutex(Subsystem::Rng);
//! PLATFORM.manager().lock(Some(rng)).unwrap();
//! PLATFORM.manager().unlock(Some(rng));
//! assert_eq!(POOL.in_use(), 0);
//! ```

use crate::abort::Abort;
use crate::mutex::{LogicalMutex, MutexManager};
use crate::pool::{SlotPool, POOL_SIZE};
use crate::sync::{NativeLock, TicketLock};

/// The subsystems that get a dedicated, statically bound mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
	Symmetric,
	Asymmetric,
	Rng,
	Power,
	Heap,
}

impl Subsystem {
	pub const ALL: [Subsystem; 5] = [
		Subsystem::Symmetric,
		Subsystem::Asymmetric,
		Subsystem::Rng,
		Subsystem::Power,
		Subsystem::Heap,
	];

	pub const fn name(self) -> &'static str {
		match self {
			Subsystem::Symmetric => "sym",
			Subsystem::Asymmetric => "asym",
			Subsystem::Rng => "rng",
			Subsystem::Power => "power",
			Subsystem::Heap => "heap",
		}
	}
}

/// One dedicated native lock per [`Subsystem`].
pub struct StaticLocks<L: NativeLock = TicketLock> {
	sym: L,
	asym: L,
	rng: L,
	power: L,
	heap: L,
}

impl<L: NativeLock> StaticLocks<L> {
	pub const fn new() -> Self {
		Self {
			sym: L::INIT,
			asym: L::INIT,
			rng: L::INIT,
			power: L::INIT,
			heap: L::INIT,
		}
	}

	pub fn get(&self, subsystem: Subsystem) -> &L {
		match subsystem {
			Subsystem::Symmetric => &self.sym,
			Subsystem::Asymmetric => &self.asym,
			Subsystem::Rng => &self.rng,
			Subsystem::Power => &self.power,
			Subsystem::Heap => &self.heap,
		}
	}
}

impl<L: NativeLock> Default for StaticLocks<L> {
	fn default() -> Self {
		Self::new()
	}
}

/// The five subsystem mutexes, each wired to its [`StaticLocks`] entry.
pub struct PlatformMutexes<'a, L: NativeLock = TicketLock> {
	sym: LogicalMutex<'a, L>,
	asym: LogicalMutex<'a, L>,
	rng: LogicalMutex<'a, L>,
	power: LogicalMutex<'a, L>,
	heap: LogicalMutex<'a, L>,
}

impl<'a, L: NativeLock> PlatformMutexes<'a, L> {
	pub const fn wire(locks: &'a StaticLocks<L>) -> Self {
		Self {
			sym: LogicalMutex::with_static(&locks.sym),
			asym: LogicalMutex::with_static(&locks.asym),
			rng: LogicalMutex::with_static(&locks.rng),
			power: LogicalMutex::with_static(&locks.power),
			heap: LogicalMutex::with_static(&locks.heap),
		}
	}

	pub fn get(&self, subsystem: Subsystem) -> &LogicalMutex<'a, L> {
		match subsystem {
			Subsystem::Symmetric => &self.sym,
			Subsystem::Asymmetric => &self.asym,
			Subsystem::Rng => &self.rng,
			Subsystem::Power => &self.power,
			Subsystem::Heap => &self.heap,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (Subsystem, &LogicalMutex<'a, L>)> + '_ {
		Subsystem::ALL.into_iter().map(move |s| (s, self.get(s)))
	}
}

/// A mutex manager plus the wired subsystem mutexes.
pub struct Platform<'a, A: Abort, L: NativeLock = TicketLock, const N: usize = POOL_SIZE> {
	manager: MutexManager<'a, A, L, N>,
	mutexes: &'a PlatformMutexes<'a, L>,
}

impl<'a, A: Abort, L: NativeLock, const N: usize> Platform<'a, A, L, N> {
	pub const fn new(pool: &'a SlotPool<L, N>, mutexes: &'a PlatformMutexes<'a, L>, abort: A) -> Self {
		Self {
			manager: MutexManager::new(pool, abort),
			mutexes,
		}
	}

	/// Initialize the five subsystem mutexes. Call once, before the first
	/// crypto operation and before any other thread touches the platform.
	pub fn init_all(&self) {
		for (subsystem, mutex) in self.mutexes.iter() {
			self.manager.init(Some(mutex));
			log::debug!("platform: {} mutex ready", subsystem.name());
		}
		log::info!("platform: mutexes registered ({} pool slots)", N);
	}

	pub fn manager(&self) -> &MutexManager<'a, A, L, N> {
		&self.manager
	}

	pub fn mutex(&self, subsystem: Subsystem) -> &LogicalMutex<'a, L> {
		self.mutexes.get(subsystem)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abort::PanicAbort;
	use crate::mutex::MutexKind;

	#[test]
	fn init_all_uses_static_slots_only() {
		let pool: SlotPool<TicketLock, 2> = SlotPool::new();
		let locks = StaticLocks::new();
		let mutexes = PlatformMutexes::wire(&locks);
		let platform = Platform::new(&pool, &mutexes, PanicAbort);

		platform.init_all();
		for (subsystem, mutex) in mutexes.iter() {
			assert_eq!(mutex.kind(), MutexKind::ValidStatic, "{:?}", subsystem);
			assert!(core::ptr::eq(mutex.static_slot().unwrap(), locks.get(subsystem)));
		}
		assert_eq!(pool.in_use(), 0);
	}

	#[test]
	fn subsystem_locks_are_independent() {
		let pool: SlotPool<TicketLock, 1> = SlotPool::new();
		let locks = StaticLocks::new();
		let mutexes = PlatformMutexes::wire(&locks);
		let platform = Platform::new(&pool, &mutexes, PanicAbort);
		platform.init_all();

		let mgr = platform.manager();
		mgr.lock(Some(platform.mutex(Subsystem::Symmetric))).unwrap();
		assert!(locks.get(Subsystem::Symmetric).is_locked());
		assert!(!locks.get(Subsystem::Rng).is_locked());
		mgr.lock(Some(platform.mutex(Subsystem::Rng))).unwrap();
		mgr.unlock(Some(platform.mutex(Subsystem::Rng)));
		mgr.unlock(Some(platform.mutex(Subsystem::Symmetric)));
		assert!(!locks.get(Subsystem::Symmetric).is_locked());
	}
}
