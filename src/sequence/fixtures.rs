//! Synthetic sequence generation
//!
//! Writes `<name>.<padded index>.txt` files whose content is the index, with
//! optional holes. Used to build test fixtures.

use log::debug;
use rand::Rng;
use std::path::Path;

use crate::error::{Result, SequenceError};
use crate::files::FileSystem;
use crate::types::{pad_index, FixtureSequence};

fn prepare_dir<F: FileSystem + ?Sized>(fs: &F, directory: &Path, num_files: i64) -> Result<()> {
    if num_files <= 0 {
        return Err(SequenceError::invalid_input(format!(
            "num_files must be a positive integer, got {}",
            num_files
        )));
    }
    if !fs.is_dir(directory) {
        fs.create_dir_all(directory)
            .map_err(|e| SequenceError::io(directory, e))?;
    }
    Ok(())
}

fn write_frame<F: FileSystem + ?Sized>(
    fs: &F,
    directory: &Path,
    name: &str,
    index: i64,
    num_digits: usize,
    made: &mut FixtureSequence,
) -> Result<()> {
    let path = directory.join(format!("{}.{}.txt", name, pad_index(index, num_digits)));
    fs.write(&path, index.to_string().as_bytes())
        .map_err(|e| SequenceError::io(&path, e))?;
    made.made.push(path);
    Ok(())
}

/// Complete sequence `first_num..=num_files`
pub fn make_seq<F: FileSystem + ?Sized>(
    fs: &F,
    directory: &Path,
    name: &str,
    num_files: i64,
    num_digits: usize,
    first_num: i64,
) -> Result<FixtureSequence> {
    prepare_dir(fs, directory, num_files)?;

    let mut result = FixtureSequence::default();
    for i in first_num..=num_files {
        write_frame(fs, directory, name, i, num_digits, &mut result)?;
    }

    debug!("make_seq: wrote {} files to {:?}", result.made.len(), directory);
    Ok(result)
}

/// Sequence `first_num..=num_files` where each frame is skipped with
/// probability `miss_ratio`
#[allow(clippy::too_many_arguments)]
pub fn make_seq_withholes<F: FileSystem + ?Sized, R: Rng>(
    fs: &F,
    directory: &Path,
    name: &str,
    num_files: i64,
    miss_ratio: f64,
    num_digits: usize,
    first_num: i64,
    rng: &mut R,
) -> Result<FixtureSequence> {
    prepare_dir(fs, directory, num_files)?;

    let mut result = FixtureSequence::default();
    for i in first_num..=num_files {
        if rng.gen::<f64>() >= miss_ratio {
            write_frame(fs, directory, name, i, num_digits, &mut result)?;
        } else {
            result.missed.push(i);
        }
    }

    debug!(
        "make_seq_withholes: wrote {} files, skipped {}",
        result.made.len(),
        result.missed.len()
    );
    Ok(result)
}

/// Sequence `1..=num_files` with every prime index left out
pub fn make_seq_primeholes<F: FileSystem + ?Sized>(
    fs: &F,
    directory: &Path,
    name: &str,
    num_files: i64,
    num_digits: usize,
) -> Result<FixtureSequence> {
    prepare_dir(fs, directory, num_files)?;

    let mut result = FixtureSequence::default();
    for (i, prime) in (1..).zip(prime_sieve(num_files as usize)) {
        if prime {
            result.missed.push(i);
        } else {
            write_frame(fs, directory, name, i, num_digits, &mut result)?;
        }
    }

    debug!(
        "make_seq_primeholes: wrote {} files, skipped {} primes",
        result.made.len(),
        result.missed.len()
    );
    Ok(result)
}

/// Sieve of Eratosthenes; entry `n - 1` tells whether `n` is prime
fn prime_sieve(limit: usize) -> Vec<bool> {
    let mut sieve = vec![true; limit];
    if let Some(one) = sieve.first_mut() {
        *one = false;
    }

    let mut n = 2;
    while n * n <= limit {
        if sieve[n - 1] {
            for multiple in (n * n..=limit).step_by(n) {
                sieve[multiple - 1] = false;
            }
        }
        n += 1;
    }
    sieve
}
