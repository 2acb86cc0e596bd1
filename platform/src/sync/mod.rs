// =============================================================================
// cc3xx-platform — Native Lock Primitives
// =============================================================================
//
// The accelerator library never touches a lock directly. It hands us an
// opaque handle and expects lock()/unlock() to be separate calls, possibly
// from different call frames. That rules out guard-based locks at this level:
// the primitive we pool must expose raw lock and unlock operations.
//
// `NativeLock` is the seam to whatever the RTOS provides. `TicketLock` is the
// default implementation and the one used on targets without an OS mutex.
//
// Lock ordering:
//   Level 1 (innermost): pool allocation lock
//   Level 2: per-logical-mutex state lock
//   Level 3 (outermost): native lock held by a crypto subsystem
//
// Levels 1 and 2 are never held while blocking on level 3.
// =============================================================================

pub mod ticket;

pub use ticket::TicketLock;

/// A raw, statically constructible lock primitive.
///
/// Implementations must tolerate `unlock` on a lock that is not held (it
/// reports `false` and leaves the lock usable) and must allow `reset` to
/// force the lock back to the unlocked state.
pub trait NativeLock: Sync {
    /// An unlocked lock, usable in `static` and `const` contexts.
    const INIT: Self;

    /// Blocks until the lock is held by the caller.
    fn lock(&self);

    /// Takes the lock if it is free. Never blocks.
    fn try_lock(&self) -> bool;

    /// Releases the lock. Returns `false` if it was not held.
    fn unlock(&self) -> bool;

    /// Forces the lock back to its initial unlocked state.
    ///
    /// Only meaningful when no one holds or waits on the lock; the pool and
    /// the mutex manager only call it on locks they own exclusively.
    fn reset(&self);

    /// Whether the lock is currently held.
    fn is_locked(&self) -> bool;
}
