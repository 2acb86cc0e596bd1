// =============================================================================
// cc3xx-platform — Fatal Abort Path
// =============================================================================
//
// Some mutex misuse cannot be reported as an error code: a crypto subsystem
// that carries on without its lock would leak key material or corrupt the
// accelerator's state. Those conditions go through `Abort::abort`, which
// never returns.
//
// WHAT COUNTS AS FATAL:
//   - A null handle passed to init, unlock or free
//   - unlock on a mutex that was never initialized
//   - Pool exhaustion during init
//   - A pool slot handle the pool refuses to take back
//
// On target the handler logs the reason and reboots through power
// management. On a hosted build the handler panics instead, so the failure
// is visible to the test harness.
//
// =============================================================================

/// The unrecoverable-error channel.
///
/// Implementations must not return: they halt, reboot, or unwind.
pub trait Abort: Sync {
    fn abort(&self, reason: &str) -> !;
}

impl<A: Abort + ?Sized> Abort for &A {
    fn abort(&self, reason: &str) -> ! {
        (**self).abort(reason)
    }
}

/// Logs the reason and hands control to a platform reboot hook.
///
/// # Examples
/// ```no_run
/// use cc3xx_platform::abort::RebootAbort;
///
/// fn pm_reboot() -> ! {
///     loop {
///         core::hint::spin_loop();
///     }
/// }
///
/// static ABORT: RebootAbort = RebootAbort::new(pm_reboot);
/// ```
#[derive(Clone, Copy)]
pub struct RebootAbort {
    reboot: fn() -> !,
}

impl RebootAbort {
    pub const fn new(reboot: fn() -> !) -> Self {
        Self { reboot }
    }
}

impl Abort for RebootAbort {
    fn abort(&self, reason: &str) -> ! {
        log::error!("platform abort: {}", reason);
        (self.reboot)()
    }
}

/// Panics with the reason. For hosted builds and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicAbort;

impl Abort for PanicAbort {
    fn abort(&self, reason: &str) -> ! {
        log::error!("platform abort: {}", reason);
        panic!("platform abort: {}", reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "platform abort: Could not allocate mutex")]
    fn panic_abort_carries_reason() {
        PanicAbort.abort("Could not allocate mutex");
    }

    #[test]
    fn reboot_abort_calls_hook() {
        fn reboot() -> ! {
            panic!("rebooted")
        }
        let abort = RebootAbort::new(reboot);
        let result = std::panic::catch_unwind(|| abort.abort("mutex_free called with NULL parameter"));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"rebooted"));
    }
}
