//! Recoverable error surface of the platform layer.
//!
//! Only `lock()` and the pool's `release_slot()` report errors to their
//! caller. Everything else either succeeds or goes through the abort path.

use thiserror::Error;

/// Status code the accelerator library uses for success.
pub const SUCCESS: i32 = 0;

/// Errors returned by [`MutexManager::lock`](crate::mutex::MutexManager::lock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlatformError {
	/// The logical mutex handle was absent.
	#[error("mutex handle is null")]
	NullParam,
	/// The logical mutex has not been initialized (or was freed).
	#[error("mutex not initialized")]
	NotInitialized,
}

impl PlatformError {
	/// The numeric code the accelerator library expects for this error.
	pub const fn code(self) -> i32 {
		match self {
			PlatformError::NullParam => -0x7001,
			PlatformError::NotInitialized => -0x7016,
		}
	}

	/// Collapse a platform result into the library's status code.
	pub fn to_code(result: Result<(), PlatformError>) -> i32 {
		match result {
			Ok(()) => SUCCESS,
			Err(e) => e.code(),
		}
	}
}

/// Contract violations detected by [`SlotPool::release_slot`](crate::pool::SlotPool::release_slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
	/// The handle names a slot index past the end of the pool.
	#[error("slot {index} is outside a pool of {capacity}")]
	OutOfRange { index: usize, capacity: usize },
	/// The slot is not currently lent out.
	#[error("slot {index} is not in use")]
	NotInUse { index: usize },
	/// The slot was released and handed out again since this handle was issued.
	#[error("slot {index} handle is stale (generation {held}, current {current})")]
	StaleHandle { index: usize, held: u32, current: u32 },
}
