//! Similar-pair search over a precomputed similarity matrix
//!
//! Works on any square similarity matrix, whether it came from rating columns
//! or from some other item representation.

use crate::matrix::check_index;
use ndarray::Array2;
use recsys_core::{Axis, RecsysError, Result};
use serde::Serialize;

/// Two distinct items and their similarity, with `first < second`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarPair {
    pub first: usize,
    pub second: usize,
    pub similarity: f64,
}

fn ensure_square(similarity: &Array2<f64>) -> Result<usize> {
    let (rows, cols) = similarity.dim();
    if rows != cols {
        return Err(RecsysError::DimensionMismatch {
            expected: rows,
            actual_rows: rows,
            actual_cols: cols,
        });
    }
    Ok(rows)
}

/// Find the most similar pair of distinct items
///
/// With `ceiling`, pairs whose similarity is at or above it are treated as
/// duplicates and skipped. If every pair is a duplicate, the best pair overall
/// is returned instead. A non-duplicate pair is still preferred when its
/// similarity is 0 or negative. Ties go to the first pair in row-major order.
/// Returns `None` for fewer than two items.
pub fn most_similar_pair(similarity: &Array2<f64>, ceiling: Option<f64>) -> Result<Option<SimilarPair>> {
    let num_items = ensure_square(similarity)?;

    let mut best: Option<SimilarPair> = None;
    let mut best_below_ceiling: Option<SimilarPair> = None;

    for first in 0..num_items {
        for second in (first + 1)..num_items {
            let pair = SimilarPair {
                first,
                second,
                similarity: similarity[[first, second]],
            };

            if best.map_or(true, |b| pair.similarity > b.similarity) {
                best = Some(pair);
            }

            let duplicate = ceiling.map_or(false, |c| pair.similarity >= c);
            if !duplicate && best_below_ceiling.map_or(true, |b| pair.similarity > b.similarity) {
                best_below_ceiling = Some(pair);
            }
        }
    }

    Ok(best_below_ceiling.or(best))
}

/// The `k` items most similar to `item`, excluding itself
///
/// Sorted by descending similarity, ties by ascending index.
pub fn similar_items(similarity: &Array2<f64>, item: usize, k: usize) -> Result<Vec<(usize, f64)>> {
    let num_items = ensure_square(similarity)?;
    check_index(Axis::Item, item, num_items)?;

    let row = similarity.row(item);
    let mut neighbours: Vec<(usize, f64)> = row
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != item)
        .map(|(other, &sim)| (other, sim))
        .collect();

    neighbours.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    neighbours.truncate(k);

    Ok(neighbours)
}
