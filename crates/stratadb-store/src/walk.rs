//! Range walk driver over encoded physical-key bounds.
//!
//! The walker seeks one bound and steps toward the other. Only the seek
//! side trusts the engine's positioning; every returned key is re-tested
//! against the far bound with the same inclusive/exclusive logic, which
//! guards against off-by-one behavior in the seek primitive. The cursor
//! is a scoped value, so it is released on every exit path, including
//! visitor errors and early termination.

use crate::engine::{ScanCursor, SeekMode, StorageEngine};
use std::cmp::Ordering;
use stratadb_commons::Result;

/// Walks the engine between two encoded bounds.
///
/// When the bounds arrive reversed they are swapped; direction is
/// controlled solely by `reverse`. The visitor receives each physical key
/// plus the cursor for lazy value access, and returns `false` to stop the
/// walk early. Returns `Ok(false)` on early termination, `Ok(true)` on
/// natural exhaustion.
pub(crate) fn walk_range<F>(
    engine: &dyn StorageEngine,
    mut key_from: Vec<u8>,
    mut key_to: Vec<u8>,
    inclusive: bool,
    reverse: bool,
    mut visit: F,
) -> Result<bool>
where
    F: FnMut(&[u8], &dyn ScanCursor) -> Result<bool>,
{
    if key_from > key_to {
        std::mem::swap(&mut key_from, &mut key_to);
    }

    let (seek_key, mode) = if reverse {
        (&key_to, if inclusive { SeekMode::Le } else { SeekMode::Lt })
    } else {
        (&key_from, if inclusive { SeekMode::Ge } else { SeekMode::Gt })
    };
    let mut cursor = engine.scan(seek_key, mode)?;

    loop {
        let Some(key) = cursor.key() else { break };

        // Far-bound test: the bound not used for seeking.
        let past_far_bound = if reverse {
            match key.cmp(&key_from) {
                Ordering::Less => true,
                Ordering::Equal => !inclusive,
                Ordering::Greater => false,
            }
        } else {
            match key.cmp(&key_to) {
                Ordering::Greater => true,
                Ordering::Equal => !inclusive,
                Ordering::Less => false,
            }
        };
        if past_far_bound {
            break;
        }

        if !visit(key, cursor.as_ref())? {
            return Ok(false);
        }

        if reverse {
            cursor.step_backward();
        } else {
            cursor.step_forward();
        }
    }

    Ok(true)
}
