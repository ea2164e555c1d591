//! Runtime capability detection and the process-global capability flags
//! consulted by the tree driver.
//!
//! Grounded on `original_source/.../Optimized64/KeccakP-1600-runtimeDispatch.c`,
//! which derives its function pointers from raw `cpuid`/`xgetbv` reads. This
//! crate reaches the same decision (which of P×2/P×4/P×8 is safe to use)
//! through `std::is_x86_feature_detected!` instead: no inline assembly, no
//! unsafe feature probing, and the macro itself caches its result after the
//! first call.
//!
//! The flags are a single `AtomicU8` bitset, matching the spec's framing of
//! "the only process-wide mutable state is the capability-flag tuple."

use core::sync::atomic::{AtomicU8, Ordering};

const TIMES2: u8 = 1 << 0;
const TIMES4: u8 = 1 << 1;
const TIMES8: u8 = 1 << 2;
const DETECTED: u8 = 1 << 3;

static FLAGS: AtomicU8 = AtomicU8::new(0);

#[cfg(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64")))]
fn detect() -> u8 {
    let mut bits = 0u8;
    if std::is_x86_feature_detected!("ssse3") {
        bits |= TIMES2;
    }
    if std::is_x86_feature_detected!("avx2") {
        bits |= TIMES4;
    }
    if std::is_x86_feature_detected!("avx512f") && std::is_x86_feature_detected!("avx512vl") {
        bits |= TIMES8;
    }
    bits
}

/// On non-x86 targets, or under `no_std`, there is no safe portable
/// detection mechanism available, so all widths report unavailable. The
/// tree driver correctly falls through to the scalar single-leaf path;
/// spec §9 explicitly allows this ("the detection mechanism itself is
/// platform glue").
#[cfg(not(all(feature = "std", any(target_arch = "x86", target_arch = "x86_64"))))]
fn detect() -> u8 {
    0
}

fn ensure_detected() -> u8 {
    let mut flags = FLAGS.load(Ordering::Relaxed);
    if flags & DETECTED == 0 {
        flags = detect() | DETECTED;
        FLAGS.store(flags, Ordering::Relaxed);
    }
    flags
}

/// Largest parallel width the dispatch layer currently permits, or `1` for
/// the scalar single-leaf path. The tree driver iterates widths
/// largest-first and drains each completely before stepping down, per
/// spec §4.5 / §9.
pub(crate) fn max_width() -> usize {
    let flags = ensure_detected();
    if flags & TIMES8 != 0 {
        8
    } else if flags & TIMES4 != 0 {
        4
    } else if flags & TIMES2 != 0 {
        2
    } else {
        1
    }
}

/// Whether a width-2 parallel permutation is currently enabled.
pub fn has_times2() -> bool {
    ensure_detected() & TIMES2 != 0
}

/// Whether a width-4 parallel permutation is currently enabled.
pub fn has_times4() -> bool {
    ensure_detected() & TIMES4 != 0
}

/// Whether a width-8 parallel permutation is currently enabled.
pub fn has_times8() -> bool {
    ensure_detected() & TIMES8 != 0
}

/// Disables the width-8 path (and transitively nothing below it). Returns
/// whether the flag actually changed.
///
/// Mutating capability flags while any [`crate::KangarooTwelve`] instance
/// exists is undefined behavior per spec §5/§7; the caller is responsible
/// for exclusion.
pub fn disable_avx512() -> bool {
    let before = ensure_detected();
    let after = before & !TIMES8;
    FLAGS.store(after, Ordering::Relaxed);
    before != after
}

/// Disables the width-4 path. Returns whether the flag actually changed.
pub fn disable_avx2() -> bool {
    let before = ensure_detected();
    let after = before & !TIMES4;
    FLAGS.store(after, Ordering::Relaxed);
    before != after
}

/// Disables the width-2 path. Returns whether the flag actually changed.
pub fn disable_ssse3() -> bool {
    let before = ensure_detected();
    let after = before & !TIMES2;
    FLAGS.store(after, Ordering::Relaxed);
    before != after
}

/// Restores every width to whatever the underlying hardware actually
/// supports. Returns whether any flag changed.
pub fn enable_all() -> bool {
    let before = ensure_detected();
    let after = detect() | DETECTED;
    FLAGS.store(after, Ordering::Relaxed);
    before != after
}

/// Serializes every test (in this module or elsewhere in the crate) that
/// mutates the process-global capability flags. `cargo test` runs tests on
/// multiple threads by default, and `FLAGS` is a single process-wide
/// `AtomicU8` — without this lock, one test's `disable_*`/`enable_all`
/// call can interleave with another's read-then-assert and produce
/// intermittent failures. Holding this guard across a test body makes the
/// flag mutations it performs atomic with respect to every other test
/// that also takes the lock.
#[cfg(all(test, feature = "std"))]
pub(crate) fn lock_for_test() -> std::sync::MutexGuard<'static, ()> {
    static CAPABILITY_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    CAPABILITY_TEST_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
