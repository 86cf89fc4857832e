//! Harness configuration.
//!
//! The boundary mode used by the `harness` CLI when no `--boundary` flag is
//! given comes from the `SAMPMATCH_BOUNDARY` environment variable:
//! `inclusive` (default) or `strict`. The variable is read once and cached
//! for the life of the process. The comparison library never reads it.

use std::sync::atomic::{AtomicU8, Ordering};

use sampmatch_membrane::BoundaryMode;

/// Environment variable consulted by [`boundary_mode`].
pub const BOUNDARY_ENV_VAR: &str = "SAMPMATCH_BOUNDARY";

// Atomic cache: 0=unresolved, 1=Inclusive, 2=Strict, 255=resolving.
static CACHED_MODE: AtomicU8 = AtomicU8::new(0);

const MODE_UNRESOLVED: u8 = 0;
const MODE_INCLUSIVE: u8 = 1;
const MODE_STRICT: u8 = 2;
const MODE_RESOLVING: u8 = 255;

fn mode_to_u8(mode: BoundaryMode) -> u8 {
    match mode {
        BoundaryMode::Inclusive => MODE_INCLUSIVE,
        BoundaryMode::Strict => MODE_STRICT,
    }
}

fn u8_to_mode(v: u8) -> BoundaryMode {
    match v {
        MODE_STRICT => BoundaryMode::Strict,
        _ => BoundaryMode::Inclusive,
    }
}

/// Get the configured harness boundary mode (reads env var on first call, caches thereafter).
///
/// A call that races the first resolution sees `Inclusive`, the documented default.
#[must_use]
pub fn boundary_mode() -> BoundaryMode {
    let cached = CACHED_MODE.load(Ordering::Relaxed);

    if cached != MODE_UNRESOLVED && cached != MODE_RESOLVING {
        return u8_to_mode(cached);
    }
    if cached == MODE_RESOLVING {
        return BoundaryMode::Inclusive;
    }

    if CACHED_MODE
        .compare_exchange(
            MODE_UNRESOLVED,
            MODE_RESOLVING,
            Ordering::SeqCst,
            Ordering::Relaxed,
        )
        .is_err()
    {
        let v = CACHED_MODE.load(Ordering::Relaxed);
        return if v != MODE_UNRESOLVED && v != MODE_RESOLVING {
            u8_to_mode(v)
        } else {
            BoundaryMode::Inclusive
        };
    }

    let mode = std::env::var(BOUNDARY_ENV_VAR)
        .map(|v| BoundaryMode::from_str_loose(&v))
        .unwrap_or_default();
    CACHED_MODE.store(mode_to_u8(mode), Ordering::Release);
    mode
}
