//! Destructive sequence operations: renumber, rename, reverse
//!
//! All operations work on the unbroken run of frames starting at the given
//! first frame. They overwrite existing files at destination paths and are not
//! transactional: a failure part way through leaves the sequence partially
//! transformed.

use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::parser::parse_item;
use super::queries::sequence_length;
use crate::config;
use crate::error::{Result, SequenceError};
use crate::files::FileSystem;
use crate::types::{frame_count, SequenceDescriptor, SequenceOperationResult};

fn move_frame<F: FileSystem + ?Sized>(fs: &F, src: &Path, dst: &Path) -> Result<()> {
    debug!("move {:?} -> {:?}", src, dst);
    fs.rename(src, dst).map_err(|e| {
        warn!("Failed to move {:?} to {:?}: {}", src, dst, e);
        SequenceError::io(src, e)
    })
}

fn copy_frame<F: FileSystem + ?Sized>(fs: &F, src: &Path, dst: &Path) -> Result<()> {
    debug!("copy {:?} -> {:?}", src, dst);
    fs.copy(src, dst).map_err(|e| {
        warn!("Failed to copy {:?} to {:?}: {}", src, dst, e);
        SequenceError::io(src, e)
    })
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Index frame `index` lands on when `start..=last` is reversed
fn mirror_index(start: i64, last: i64, index: i64) -> Result<i64> {
    index
        .checked_sub(start)
        .and_then(|from_start| last.checked_sub(from_start))
        .ok_or_else(|| {
            SequenceError::invalid_input(format!(
                "frame {} cannot be mirrored within {}-{}",
                index, start, last
            ))
        })
}

/// Check that every frame of `start..=last` shifted by `offset` is still a valid index
fn check_offset_range(start: i64, last: i64, offset: i64) -> Result<()> {
    if last < start {
        return Ok(());
    }
    match (start.checked_add(offset), last.checked_add(offset)) {
        (Some(_), Some(_)) => Ok(()),
        _ => Err(SequenceError::invalid_input(format!(
            "offset {} moves frames {}-{} out of the representable range",
            offset, start, last
        ))),
    }
}

/// Whether two directories name the same place, resolving `.`/symlinks when
/// they exist on disk
fn same_directory(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| {
        let p = if p.as_os_str().is_empty() { Path::new(".") } else { p };
        p.canonicalize().unwrap_or_else(|_| p.to_path_buf())
    };
    normalize(a) == normalize(b)
}

/// Order in which frames must be moved so that no frame lands on a path whose
/// original occupant hasn't moved yet: shifting down walks up from the start,
/// shifting up walks down from the end.
fn offset_order(first: i64, last: i64, offset: i64) -> Box<dyn Iterator<Item = i64>> {
    if offset < 0 {
        Box::new(first..=last)
    } else {
        Box::new((first..=last).rev())
    }
}

/// Renumber every frame by `offset`, optionally re-padding to a new digit width
pub fn offset_seq<F: FileSystem + ?Sized>(
    fs: &F,
    first_item: &Path,
    offset: i64,
    new_digit_width: Option<usize>,
) -> Result<SequenceOperationResult> {
    let desc = parse_item(first_item)?;
    config::validate_path(first_item)?;

    let width = new_digit_width.unwrap_or(desc.digit_width);
    let last = sequence_length(fs, first_item)?;
    check_offset_range(desc.start_index, last, offset)?;
    info!(
        "offset_seq: {:?} frames {}-{} by {} (width {} -> {})",
        first_item, desc.start_index, last, offset, desc.digit_width, width
    );

    let mut processed = 0;
    for i in offset_order(desc.start_index, last, offset) {
        let src = desc.frame_path(i);
        // In range: check_offset_range covered both ends
        let dst = desc.frame_path_in(&desc.directory, &desc.base_name, i + offset, width);
        move_frame(fs, &src, &dst)?;
        processed += 1;
    }

    info!("offset_seq: moved {} frames", processed);

    Ok(SequenceOperationResult {
        success: true,
        message: format!("Offset {} frames by {}", processed, offset),
        files_processed: processed,
        first_path: (processed > 0).then(|| {
            desc.frame_path_in(&desc.directory, &desc.base_name, desc.start_index + offset, width)
                .to_string_lossy()
                .to_string()
        }),
    })
}

/// Give every frame a new base name, keeping its number
pub fn rename_seq<F: FileSystem + ?Sized>(
    fs: &F,
    first_item: &Path,
    new_name: &str,
    new_digit_width: Option<usize>,
) -> Result<SequenceOperationResult> {
    let desc = parse_item(first_item)?;
    config::validate_path(first_item)?;

    if new_name.contains(['/', '\\']) {
        return Err(SequenceError::invalid_input(format!(
            "New name '{}' cannot contain a path separator",
            new_name
        )));
    }

    let width = new_digit_width.unwrap_or(desc.digit_width);
    let last = sequence_length(fs, first_item)?;
    info!(
        "rename_seq: {:?} frames {}-{} to '{}'",
        first_item, desc.start_index, last, new_name
    );

    for i in desc.start_index..=last {
        let src = desc.frame_path(i);
        let dst = desc.frame_path_in(&desc.directory, new_name, i, width);
        move_frame(fs, &src, &dst)?;
    }

    let processed = frame_count(desc.start_index, last);
    info!("rename_seq: renamed {} frames", processed);

    Ok(SequenceOperationResult {
        success: true,
        message: format!("Renamed {} frames to '{}'", processed, new_name),
        files_processed: processed,
        first_path: (processed > 0).then(|| {
            desc.frame_path_in(&desc.directory, new_name, desc.start_index, width)
                .to_string_lossy()
                .to_string()
        }),
    })
}

/// Reverse frame order. With `write_to` the reversed sequence is copied into
/// that directory and the source is left alone; otherwise frames are swapped
/// in place. `write_to` must differ from the sequence's own directory, since
/// copying over frames that haven't been read yet would scramble the source.
pub fn reverse_seq<F: FileSystem + ?Sized>(
    fs: &F,
    first_item: &Path,
    write_to: Option<&Path>,
) -> Result<SequenceOperationResult> {
    let desc = parse_item(first_item)?;
    let last = sequence_length(fs, first_item)?;

    if last < desc.start_index {
        warn!("reverse_seq: first frame {:?} does not exist", first_item);
        return Ok(SequenceOperationResult {
            success: true,
            message: "No frames to reverse".to_string(),
            files_processed: 0,
            first_path: None,
        });
    }

    match write_to {
        Some(out_dir) => reverse_into(fs, &desc, last, out_dir),
        None => reverse_in_place(fs, &desc, last),
    }
}

fn reverse_into<F: FileSystem + ?Sized>(
    fs: &F,
    desc: &SequenceDescriptor,
    last: i64,
    out_dir: &Path,
) -> Result<SequenceOperationResult> {
    config::validate_path(out_dir)?;
    if same_directory(out_dir, &desc.directory) {
        return Err(SequenceError::invalid_input(format!(
            "Output directory '{}' is the source directory; reverse in place instead",
            out_dir.display()
        )));
    }
    info!(
        "reverse_seq: copying frames {}-{} reversed into {:?}",
        desc.start_index, last, out_dir
    );

    if !fs.exists(out_dir) {
        debug!("Creating output directory {:?}", out_dir);
        fs.create_dir_all(out_dir)
            .map_err(|e| SequenceError::io(out_dir, e))?;
    }

    for i in desc.start_index..=last {
        let mirrored = mirror_index(desc.start_index, last, i)?;
        let src = desc.frame_path(i);
        let dst = desc.frame_path_in(out_dir, &desc.base_name, mirrored, desc.digit_width);
        copy_frame(fs, &src, &dst)?;
    }

    let processed = frame_count(desc.start_index, last);
    info!("reverse_seq: copied {} frames", processed);

    Ok(SequenceOperationResult {
        success: true,
        message: format!("Copied {} reversed frames to '{}'", processed, out_dir.display()),
        files_processed: processed,
        first_path: Some(
            desc.frame_path_in(out_dir, &desc.base_name, desc.start_index, desc.digit_width)
                .to_string_lossy()
                .to_string(),
        ),
    })
}

fn reverse_in_place<F: FileSystem + ?Sized>(
    fs: &F,
    desc: &SequenceDescriptor,
    last: i64,
) -> Result<SequenceOperationResult> {
    config::validate_path(&desc.frame_path(desc.start_index))?;
    let swap_suffix = config::get_config()?.swap_suffix;
    info!(
        "reverse_seq: reversing frames {}-{} in place",
        desc.start_index, last
    );

    let half = (i128::from(last) - i128::from(desc.start_index)) / 2;
    let midpoint = i64::try_from(i128::from(desc.start_index) + half)
        .map_err(|_| SequenceError::invalid_input("Sequence range too large to reverse"))?;
    let mut swaps = 0;
    for i in desc.start_index..=midpoint {
        let mirrored = mirror_index(desc.start_index, last, i)?;
        // Middle frame of an odd-length run stays put
        if mirrored == i {
            continue;
        }
        let src = desc.frame_path(i);
        let dst = desc.frame_path(mirrored);
        let temp = with_suffix(&dst, &swap_suffix);

        move_frame(fs, &dst, &temp)?;
        move_frame(fs, &src, &dst)?;
        move_frame(fs, &temp, &src)?;
        swaps += 1;
    }

    info!("reverse_seq: performed {} swaps", swaps);

    Ok(SequenceOperationResult {
        success: true,
        message: format!("Reversed {} frames in place", frame_count(desc.start_index, last)),
        files_processed: frame_count(desc.start_index, last),
        first_path: Some(desc.frame_path(desc.start_index).to_string_lossy().to_string()),
    })
}
