//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, Once};

use cc3xx_platform::Abort;
use log::LevelFilter;

/// Abort handler that records each reason and then unwinds, so a test can
/// observe the fatal path without the process going down.
#[derive(Default)]
pub struct RecordingAbort {
    reasons: Mutex<Vec<String>>,
}

impl RecordingAbort {
    pub fn reasons(&self) -> Vec<String> {
        self.reasons.lock().unwrap().clone()
    }
}

impl Abort for RecordingAbort {
    fn abort(&self, reason: &str) -> ! {
        log::error!("platform abort: {}", reason);
        self.reasons.lock().unwrap().push(reason.to_owned());
        panic!("platform abort: {}", reason)
    }
}

/// Run `f`, returning `true` if it went through the abort path.
pub fn aborts(f: impl FnOnce()) -> bool {
    catch_unwind(AssertUnwindSafe(f)).is_err()
}

static LOGGER: klog::Logger<String> = klog::Logger::new(String::new(), LevelFilter::Debug);
static LOGGER_INIT: Once = Once::new();

/// Install the console logger (once per test binary).
pub fn init_logging() {
    LOGGER_INIT.call_once(|| {
        klog::init(&LOGGER).expect("logger installed twice");
    });
}

/// Whether any captured log line contains `needle`.
pub fn logged(needle: &str) -> bool {
    LOGGER.with_sink(|s| s.contains(needle))
}
