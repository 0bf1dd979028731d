//! Line-level diff between two body snapshots.
//!
//! Computes a longest-common-subsequence edit script and reports which lines
//! of the *latest* sequence are inserted or changed relative to baseline.
//! Deleted baseline lines have no latest-side position and are not reported;
//! a latest that is a pure subsequence match of baseline therefore diffs
//! clean even when the fingerprints disagree.

use serde::Serialize;

/// Upper bound on the LCS table size.
///
/// Beyond this the middle sections no longer fit a quadratic table; every
/// remaining latest-side line is reported as changed instead, which
/// over-reports but never under-reports.
const MAX_LCS_CELLS: usize = 25_000_000;

/// One segment of the review layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReviewSegment {
    /// A maximal run of contiguous changed lines, in latest-document order.
    Block {
        /// The changed lines, verbatim
        lines: Vec<String>,
    },
    /// Marker for at least one untouched line between two blocks.
    Separator,
}

/// Indices of latest-side lines that are inserted or changed, ascending.
#[must_use]
pub fn changed_latest_indices(baseline: &[String], latest: &[String]) -> Vec<usize> {
    let prefix = baseline
        .iter()
        .zip(latest.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let max_suffix = baseline.len().min(latest.len()) - prefix;
    let suffix = baseline[prefix..]
        .iter()
        .rev()
        .zip(latest[prefix..].iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &baseline[prefix..baseline.len() - suffix];
    let new_mid = &latest[prefix..latest.len() - suffix];

    if new_mid.is_empty() {
        return Vec::new();
    }

    let matched = if old_mid.is_empty() {
        vec![false; new_mid.len()]
    } else if old_mid.len().saturating_mul(new_mid.len()) > MAX_LCS_CELLS {
        vec![false; new_mid.len()]
    } else {
        lcs_matched(old_mid, new_mid)
    };

    matched
        .iter()
        .enumerate()
        .filter(|(_, is_matched)| !**is_matched)
        .map(|(j, _)| prefix + j)
        .collect()
}

/// For each line of `new`, whether it participates in the LCS with `old`.
fn lcs_matched(old: &[String], new: &[String]) -> Vec<bool> {
    let n = old.len();
    let m = new.len();

    // table[i][j] = LCS length of old[i..] and new[j..]
    let mut table = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if old[i] == new[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut matched = vec![false; m];
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            matched[j] = true;
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    matched
}

/// Group changed line indices into blocks with separators at discontinuities.
///
/// Adjacent changed indices share a block; any gap of untouched lines
/// between two blocks yields exactly one separator regardless of gap size.
#[must_use]
pub fn group_blocks(latest: &[String], changed: &[usize]) -> Vec<ReviewSegment> {
    let mut segments = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut previous: Option<usize> = None;

    for &index in changed {
        if let Some(prev) = previous {
            if index != prev + 1 {
                segments.push(ReviewSegment::Block {
                    lines: std::mem::take(&mut current),
                });
                segments.push(ReviewSegment::Separator);
            }
        }
        current.push(latest[index].clone());
        previous = Some(index);
    }

    if !current.is_empty() {
        segments.push(ReviewSegment::Block { lines: current });
    }

    segments
}
