//! Optional timing instrumentation for pipeline stages.
//!
//! A [`TimingGuard`] measures a scoped operation and logs the elapsed time
//! under the `mane::telemetry` target when dropped. Guards stay inert unless
//! telemetry has been switched on via [`configure`] and the global log filter
//! admits the requested level, so the cost of a disabled guard is one atomic
//! load and an `Instant::now`.

use std::{
    borrow::Cow,
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
    time::Instant,
};

use log::{Level, LevelFilter, log, log_enabled};

const TARGET: &str = "mane::telemetry";

static ENABLED: AtomicBool = AtomicBool::new(false);
static MAX_LEVEL: AtomicU8 = AtomicU8::new(0);

fn filter_rank(filter: LevelFilter) -> u8 {
    match filter {
        LevelFilter::Off => 0,
        LevelFilter::Error => 1,
        LevelFilter::Warn => 2,
        LevelFilter::Info => 3,
        LevelFilter::Debug => 4,
        LevelFilter::Trace => 5,
    }
}

/// Switch telemetry on or off and set the most verbose admitted level.
pub fn configure(enabled: bool, level: LevelFilter) {
    ENABLED.store(enabled, Ordering::Relaxed);
    MAX_LEVEL.store(filter_rank(level), Ordering::Relaxed);
}

/// Whether a guard at `level` would currently emit.
pub fn telemetry_allows(level: Level) -> bool {
    ENABLED.load(Ordering::Relaxed)
        && filter_rank(level.to_level_filter()) <= MAX_LEVEL.load(Ordering::Relaxed)
}

/// RAII guard that logs how long its scope took when dropped.
pub struct TimingGuard {
    label: Cow<'static, str>,
    level: Level,
    start: Instant,
    active: bool,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TARGET,
                self.level,
                "{} took {:.2?}",
                self.label,
                self.start.elapsed()
            );
        }
    }
}

/// Start timing a scope, emitting at `level` when telemetry admits it.
pub fn timing_guard(label: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    let active = telemetry_allows(level) && log_enabled!(target: TARGET, level);
    TimingGuard {
        label: label.into(),
        level,
        start: Instant::now(),
        active,
    }
}
