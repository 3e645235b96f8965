//! Adaptive batch search over paged documents.
//!
//! Pages are grouped into contiguous ranges whose serialized size stays
//! under the hard limit. The batch size is seeded from the average page
//! size, shrunk when a candidate range serializes too large, and grown or
//! tightened after each accepted range depending on how close it landed to
//! the soft target. A single page that alone exceeds the hard limit is
//! emitted anyway and logged.

use crate::error::Result;
use crate::splitting::traits::SplitLimits;
use std::ops::Range;
use tracing::{debug, warn};

/// Factor applied to the batch when a candidate range is over the hard limit.
pub const SHRINK_FACTOR: f64 = 0.7;

/// Factor applied after an accepted range well under the soft target.
pub const GROW_FACTOR: f64 = 1.5;

/// Factor applied after an accepted range close to the soft target.
pub const TIGHTEN_FACTOR: f64 = 0.9;

/// Below this fraction of the soft target the batch grows.
pub const GROW_BELOW: f64 = 0.5;

/// Above this fraction of the soft target the batch tightens.
pub const TIGHTEN_ABOVE: f64 = 0.95;

/// A document that can serialize any contiguous range of its pages alone.
pub trait PageSource {
    /// Returns the number of pages.
    fn page_count(&self) -> usize;

    /// Serializes pages `pages.start..pages.end` (0-based) as a standalone
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn render(&self, pages: Range<usize>) -> Result<Vec<u8>>;
}

/// Packs all pages of `source` into size-bounded fragments.
///
/// # Arguments
///
/// * `source` - Parsed document.
/// * `input_len` - Size of the original document, used to seed the batch.
/// * `limits` - Hard ceiling and soft target.
///
/// # Returns
///
/// Fragments covering every page exactly once, in page order. Every
/// fragment is within the hard limit unless it holds a single page.
///
/// # Errors
///
/// Propagates the first rendering failure; partial output is discarded.
pub fn pack_pages<S>(source: &S, input_len: usize, limits: SplitLimits) -> Result<Vec<Vec<u8>>>
where
    S: PageSource + ?Sized,
{
    let total = source.page_count();
    if total == 0 {
        return Ok(Vec::new());
    }

    let hard = limits.hard_limit();
    let soft = to_f64(limits.soft_target());
    let mut batch = initial_batch(soft, to_f64(input_len) / to_f64(total));
    let mut cursor = 0;
    let mut blobs = Vec::new();

    debug!(total, batch, hard, "starting page packing");

    while cursor < total {
        let end = cursor.saturating_add(batch).min(total);
        let blob = source.render(cursor..end)?;
        let size = blob.len();

        if size <= hard || batch == 1 {
            if size > hard {
                warn!(
                    page = cursor + 1,
                    size, hard, "single page exceeds the hard limit; emitting it as-is"
                );
            }
            debug!(start = cursor, end, size, "accepted page range");
            blobs.push(blob);
            cursor = end;
            batch = adapt_batch(batch, size, soft);
        } else {
            let shrunk = shrink_batch(batch);
            debug!(
                start = cursor,
                end,
                size,
                from = batch,
                to = shrunk,
                "page range over limit, shrinking batch"
            );
            batch = shrunk;
        }
    }

    Ok(blobs)
}

/// Seeds the batch: how many average-size pages fit in the soft target.
#[must_use]
pub fn initial_batch(soft_target: f64, avg_page_size: f64) -> usize {
    truncate(soft_target / avg_page_size).max(1)
}

/// Adjusts the batch after an accepted range of `size` bytes.
#[must_use]
pub fn adapt_batch(batch: usize, size: usize, soft_target: f64) -> usize {
    let size = to_f64(size);
    if size < soft_target * GROW_BELOW {
        scale(batch, GROW_FACTOR)
    } else if size > soft_target * TIGHTEN_ABOVE {
        scale(batch, TIGHTEN_FACTOR).max(1)
    } else {
        batch
    }
}

/// Shrinks the batch after an over-limit candidate, always by at least one.
#[must_use]
pub fn shrink_batch(batch: usize) -> usize {
    let mut shrunk = scale(batch, SHRINK_FACTOR);
    if shrunk >= batch {
        shrunk = batch.saturating_sub(1);
    }
    shrunk.max(1)
}

fn scale(batch: usize, factor: f64) -> usize {
    truncate(to_f64(batch) * factor)
}

#[allow(clippy::cast_precision_loss)]
const fn to_f64(value: usize) -> f64 {
    value as f64
}

// Float-to-int casts saturate; NaN maps to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn truncate(value: f64) -> usize {
    value as usize
}
