//! Read-only sequence queries: gaps, length, range formatting

use log::debug;
use std::path::Path;

use super::parser::parse_item;
use crate::error::Result;
use crate::files::FileSystem;
use crate::types::{frame_count, SequenceReport};

/// Indices in `[start_index, upper_bound)` whose frame file is missing
pub fn gap_check<F: FileSystem + ?Sized>(
    fs: &F,
    first_item: &Path,
    upper_bound: i64,
) -> Result<Vec<i64>> {
    let desc = parse_item(first_item)?;

    let missing: Vec<i64> = (desc.start_index..upper_bound)
        .filter(|&i| !fs.is_file(&desc.frame_path(i)))
        .collect();

    debug!(
        "gap_check {:?} up to {}: {} missing",
        first_item,
        upper_bound,
        missing.len()
    );
    Ok(missing)
}

/// Index of the last frame in the unbroken run starting at `first_item`.
/// Returns `start_index - 1` when the first frame itself is missing.
pub fn sequence_length<F: FileSystem + ?Sized>(fs: &F, first_item: &Path) -> Result<i64> {
    let desc = parse_item(first_item)?;

    if !fs.exists(&desc.frame_path(desc.start_index)) {
        debug!("First frame {:?} does not exist", first_item);
        return Ok(desc.start_index - 1);
    }

    let mut last = desc.start_index;
    while let Some(next) = last.checked_add(1) {
        if !fs.exists(&desc.frame_path(next)) {
            break;
        }
        last = next;
    }
    Ok(last)
}

/// Collapse an increasing list of distinct numbers into ranges,
/// e.g. `[1, 2, 3, 5, 6, 7, 10]` -> `"1-3, 5-7, 10"`
pub fn collapse_list(items: &[i64]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = items.iter().copied();

    let Some(first) = iter.next() else {
        return String::new();
    };

    let mut run_start = first;
    let mut previous = first;
    for item in iter {
        if previous.checked_add(1) != Some(item) {
            parts.push(format_run(run_start, previous));
            run_start = item;
        }
        previous = item;
    }
    parts.push(format_run(run_start, previous));

    parts.join(", ")
}

fn format_run(lo: i64, hi: i64) -> String {
    if lo == hi {
        lo.to_string()
    } else {
        format!("{}-{}", lo, hi)
    }
}

/// Gather length and gap information for a sequence in one pass
pub fn sequence_report<F: FileSystem + ?Sized>(
    fs: &F,
    first_item: &Path,
    upper_bound: i64,
) -> Result<SequenceReport> {
    let descriptor = parse_item(first_item)?;
    let last_index = sequence_length(fs, first_item)?;
    let missing = gap_check(fs, first_item, upper_bound)?;
    let length = frame_count(descriptor.start_index, last_index);

    Ok(SequenceReport {
        first_index: descriptor.start_index,
        last_index,
        length,
        missing_ranges: collapse_list(&missing),
        missing,
        descriptor,
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}
