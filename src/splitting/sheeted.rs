//! Greedy bin-packing of whole sheets.
//!
//! Each sheet is serialized alone to estimate its size, then sheets are
//! packed in order into groups whose summed estimates stay under the soft
//! target. A sheet is never divided, so a group holding one oversized
//! sheet is emitted with a warning.

use crate::error::Result;
use crate::splitting::traits::SplitLimits;
use tracing::{debug, warn};

/// A workbook that can serialize any subset of its sheets as a new workbook.
pub trait SheetSource {
    /// Returns the sheet names in workbook order.
    fn sheet_names(&self) -> &[String];

    /// Serializes the sheets at `sheets` (indices into [`Self::sheet_names`],
    /// ascending) as a standalone workbook.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn render(&self, sheets: &[usize]) -> Result<Vec<u8>>;
}

/// Packs all sheets of `source` into size-bounded workbooks.
///
/// # Returns
///
/// One workbook per group; every sheet appears in exactly one group, in
/// original relative order.
///
/// # Errors
///
/// Propagates the first serialization failure.
pub fn pack_sheets<S>(source: &S, limits: SplitLimits) -> Result<Vec<Vec<u8>>>
where
    S: SheetSource + ?Sized,
{
    let soft = limits.soft_target();
    let mut blobs = Vec::new();
    let mut group: Vec<usize> = Vec::new();
    let mut running = 0usize;

    for index in 0..source.sheet_names().len() {
        let estimate = source.render(&[index])?.len();
        debug!(
            sheet = %source.sheet_names()[index],
            estimate, "estimated sheet size"
        );

        if running.saturating_add(estimate) > soft && !group.is_empty() {
            blobs.push(flush_group(source, &group, limits)?);
            group = vec![index];
            running = estimate;
        } else {
            group.push(index);
            running = running.saturating_add(estimate);
        }
    }

    if !group.is_empty() {
        blobs.push(flush_group(source, &group, limits)?);
    }

    Ok(blobs)
}

fn flush_group<S>(source: &S, group: &[usize], limits: SplitLimits) -> Result<Vec<u8>>
where
    S: SheetSource + ?Sized,
{
    let blob = source.render(group)?;
    if blob.len() > limits.hard_limit() {
        let names: Vec<&str> = group
            .iter()
            .map(|&i| source.sheet_names()[i].as_str())
            .collect();
        warn!(
            sheets = ?names,
            size = blob.len(),
            hard = limits.hard_limit(),
            "sheet group exceeds the hard limit; emitting it as-is"
        );
    }
    Ok(blob)
}
