//! Loot selection for successful hacks.

use heist_common::StolenFile;
use heist_common::constants::{FALLBACK_HAUL_GB, FILE_POOL, FILES_PER_HAUL};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Files exfiltrated by one successful hack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Haul {
    pub files: Vec<StolenFile>,
    /// GB actually credited (after any defense boost)
    pub total_gb: u64,
}

/// Sample distinct files from the pool.
///
/// The haul is the sum of their sizes, or a random fallback amount if
/// that sum is zero.
pub fn sample_haul(rng: &mut impl Rng) -> Haul {
    let files: Vec<StolenFile> = FILE_POOL
        .choose_multiple(rng, FILES_PER_HAUL)
        .map(|(name, size_gb)| StolenFile {
            name: (*name).to_string(),
            size_gb: *size_gb,
        })
        .collect();

    let mut total_gb: u64 = files.iter().map(|f| f.size_gb).sum();
    if total_gb == 0 {
        total_gb = rng.random_range(FALLBACK_HAUL_GB);
    }

    Haul { files, total_gb }
}

/// Apply the defense boost multiplier. Halves round to even, never below 1 GB.
pub fn reduce_for_boost(size_gb: u64, multiplier: f64) -> u64 {
    let reduced = (size_gb as f64 * multiplier).round_ties_even();
    if reduced < 1.0 { 1 } else { reduced as u64 }
}
