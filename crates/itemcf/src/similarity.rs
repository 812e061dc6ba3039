//! Item-item cosine similarity
//!
//! Each item is represented by its column of per-user ratings. Two items are
//! similar when the same users rated both of them in similar proportions.

use crate::matrix::{check_index, validate_ratings};
use ndarray::Array2;
use recsys_core::{cosine_similarity, Axis, Result};
use tracing::{debug, warn};

/// Compute the `I x I` cosine similarity matrix between item columns
///
/// The result is exactly symmetric. The diagonal is 1 for every item that
/// someone rated; an item with an all-zero column gets an all-zero row and
/// column, diagonal included, since cosine similarity is undefined for a zero
/// vector.
///
/// # Errors
///
/// Returns `InvalidShape` if the matrix is empty in either dimension or
/// contains NaN or infinite values.
pub fn compute_item_similarity(ratings: &Array2<f64>) -> Result<Array2<f64>> {
    validate_ratings(&ratings.view())?;

    let num_items = ratings.ncols();
    let (scaled, column_max) = scale_columns(ratings);

    // Gram matrix: gram[[i, j]] = dot(column i, column j)
    let gram = scaled.t().dot(&scaled);
    let norms: Vec<f64> = (0..num_items).map(|i| gram[[i, i]].sqrt()).collect();

    let mut similarity = Array2::<f64>::zeros((num_items, num_items));
    let mut zero_columns = Vec::new();

    for i in 0..num_items {
        if column_max[i] == 0.0 {
            zero_columns.push(i);
            continue;
        }

        similarity[[i, i]] = 1.0;

        for j in (i + 1)..num_items {
            if column_max[j] == 0.0 {
                continue;
            }
            // Clamp rounding noise so the result stays a valid cosine
            let sim = (gram[[i, j]] / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            similarity[[i, j]] = sim;
            similarity[[j, i]] = sim;
        }
    }

    if !zero_columns.is_empty() {
        warn!(
            items = ?zero_columns,
            "Items without any rating have zero similarity to everything"
        );
    }

    debug!(
        users = ratings.nrows(),
        items = num_items,
        "Computed item-item similarity"
    );

    Ok(similarity)
}

/// Divide every column by its largest absolute value
///
/// Cosine is scale invariant, and a scaled non-zero column has an entry of
/// magnitude 1, so its squared norm can neither underflow to 0 nor overflow.
/// All-zero columns are left as they are and reported with a max of 0.
fn scale_columns(ratings: &Array2<f64>) -> (Array2<f64>, Vec<f64>) {
    let mut scaled = ratings.to_owned();
    let mut column_max = Vec::with_capacity(ratings.ncols());

    for mut column in scaled.columns_mut() {
        let max = column.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max > 0.0 {
            column.mapv_inplace(|v| v / max);
        }
        column_max.push(max);
    }

    (scaled, column_max)
}

/// Cosine similarity of a single pair of item columns
///
/// Agrees with the corresponding entry of `compute_item_similarity` up to
/// rounding; use it when only one pair is needed.
pub fn item_pair_similarity(ratings: &Array2<f64>, a: usize, b: usize) -> Result<f64> {
    validate_ratings(&ratings.view())?;
    check_index(Axis::Item, a, ratings.ncols())?;
    check_index(Axis::Item, b, ratings.ncols())?;

    let column_a = ratings.column(a).to_vec();
    let column_b = ratings.column(b).to_vec();
    Ok(cosine_similarity(&column_a, &column_b))
}
