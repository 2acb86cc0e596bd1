// =============================================================================
// cc3xx-platform — Crate Root
// =============================================================================
//
// The crypto accelerator library is RTOS-agnostic. All it knows about a lock
// is an opaque handle and four functions to call on it. This crate supplies
// those four functions for systems that may or may not be able to allocate
// OS mutexes at runtime:
//
//   sync      — the native lock seam (`NativeLock`) and a ticket lock
//   pool      — a bounded pool of native locks lent out on demand
//   mutex     — the logical mutex state machine (init / lock / unlock / free)
//   abort     — the never-returning fatal path
//   flags     — the library's view of a mutex as a flag word
//   error     — recoverable error codes
//   platform  — wiring of the five subsystem mutexes at start-up
//
// #![no_std] — this runs on the same microcontroller as the accelerator.
// Tests build against std on the host.
// =============================================================================

#![no_std]

#[cfg(test)]
extern crate std;

pub mod abort;
pub mod error;
pub mod flags;
pub mod mutex;
pub mod platform;
pub mod pool;
pub mod sync;

pub use abort::{Abort, PanicAbort, RebootAbort};
pub use error::{PlatformError, PoolError};
pub use flags::MutexFlags;
pub use mutex::{LogicalMutex, MutexKind, MutexManager};
pub use platform::{Platform, PlatformMutexes, StaticLocks, Subsystem};
pub use pool::{SlotHandle, SlotPool, POOL_SIZE};
pub use sync::{NativeLock, TicketLock};
