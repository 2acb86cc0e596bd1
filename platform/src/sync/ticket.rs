// =============================================================================
// cc3xx-platform — Ticket Lock
// =============================================================================
//
// A ticket lock provides mutual exclusion with FIFO fairness. Unlike a
// guard-based spinlock, this one exposes raw lock()/unlock() because the
// crypto library calls them as two separate platform functions.
//
// HOW IT WORKS:
//   - Two counters: `next_ticket` and `now_serving`
//   - To lock: atomically increment `next_ticket`, get your ticket number.
//     Spin until `now_serving` equals your ticket.
//   - To unlock: increment `now_serving`, which lets the next waiter proceed.
//   - Unlocked means `now_serving == next_ticket`.
//
// WHY TICKET LOCK (not test-and-set)?
//   - Fair: threads are served in arrival order (FIFO)
//   - No starvation: a crypto call waiting for the RNG lock always gets it
//   - Bounded wait proportional to the number of waiters
//
// RESET:
//   reset() makes the lock unlocked by catching `now_serving` up to
//   `next_ticket`. The counters only ever move forward, so a reset can never
//   hand out a ticket that is already in use.
//
// =============================================================================

use core::sync::atomic::{AtomicU32, Ordering};

use super::NativeLock;

/// A FIFO ticket lock with raw lock/unlock operations.
///
/// # Examples
/// ```
/// use cc3xx_platform::sync::{NativeLock, TicketLock};
///
/// static LOCK: TicketLock = TicketLock::new();
///
/// LOCK.lock();
/// assert!(LOCK.is_locked());
/// assert!(LOCK.unlock());
/// assert!(!LOCK.is_locked());
/// ```
#[derive(Debug)]
pub struct TicketLock {
    /// The next ticket to be dispensed (atomically incremented by each locker).
    next_ticket: AtomicU32,

    /// The ticket number currently being served (incremented on unlock).
    now_serving: AtomicU32,
}

impl TicketLock {
    /// Creates a new, unlocked ticket lock.
    ///
    /// This is a const fn so ticket locks can be used in statics.
    pub const fn new() -> Self {
        Self {
            next_ticket: AtomicU32::new(0),
            now_serving: AtomicU32::new(0),
        }
    }
}

impl Default for TicketLock {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeLock for TicketLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    fn lock(&self) {
        // Relaxed is fine for taking the ticket. The Acquire load in the
        // spin loop below is the synchronization point.
        let my_ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);

        // Acquire ensures we see all writes made by the previous holder.
        while self.now_serving.load(Ordering::Acquire) != my_ticket {
            core::hint::spin_loop();
        }
    }

    fn try_lock(&self) -> bool {
        let current = self.now_serving.load(Ordering::Relaxed);
        // Take the next ticket only if it is the one being served right now.
        self.next_ticket
            .compare_exchange(
                current,
                current.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    fn unlock(&self) -> bool {
        let serving = self.now_serving.load(Ordering::Relaxed);
        if serving == self.next_ticket.load(Ordering::Relaxed) {
            // Nobody holds it. Bumping `now_serving` past `next_ticket`
            // would hand the next locker a ticket that is never served.
            return false;
        }
        // Release publishes our writes to the next holder before it sees
        // the incremented counter.
        self.now_serving
            .store(serving.wrapping_add(1), Ordering::Release);
        true
    }

    fn reset(&self) {
        let next = self.next_ticket.load(Ordering::Relaxed);
        self.now_serving.store(next, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.now_serving.load(Ordering::Acquire) != self.next_ticket.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn new_lock_is_unlocked() {
        let lock = TicketLock::new();
        assert!(!lock.is_locked());
        assert!(lock.try_lock());
        assert!(lock.is_locked());
        assert!(!lock.try_lock());
        assert!(lock.unlock());
        assert!(!lock.is_locked());
    }

    #[test]
    fn unlock_of_unheld_lock_is_rejected() {
        let lock = TicketLock::new();
        assert!(!lock.unlock());
        // Still usable afterwards.
        lock.lock();
        assert!(lock.unlock());
        assert!(!lock.unlock());
    }

    #[test]
    fn reset_releases_held_lock() {
        let lock = TicketLock::new();
        lock.lock();
        assert!(lock.is_locked());
        lock.reset();
        assert!(!lock.is_locked());
        assert!(lock.try_lock());
    }

    #[test]
    fn serializes_concurrent_increments() {
        const THREADS: usize = 4;
        const ROUNDS: usize = 250;

        let lock = TicketLock::new();
        let counter = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        lock.lock();
                        // Non-atomic read-modify-write; only correct under the lock.
                        let v = counter.load(Ordering::Relaxed);
                        counter.store(v + 1, Ordering::Relaxed);
                        lock.unlock();
                    }
                });
            }
        });

        assert_eq!(counter.load(Ordering::Relaxed), THREADS * ROUNDS);
        assert!(!lock.is_locked());
    }
}
