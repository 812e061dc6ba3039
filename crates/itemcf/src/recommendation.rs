//! Item-based collaborative filtering recommendations
//!
//! A candidate item's predicted score is the similarity-weighted sum of the
//! target user's ratings:
//!
//! ```text
//! score[j] = sum_i ratings[user][i] * similarity[i][j]
//! ```
//!
//! Items the user already rated are never recommended.

use crate::matrix::{check_index, validate_ratings, RatingMatrix};
use crate::pairs::{most_similar_pair, similar_items, SimilarPair};
use crate::similarity::compute_item_similarity;
use ndarray::{Array1, Array2};
use recsys_core::{Axis, RecsysError, Result};
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Score reported for items the user already rated
pub const RATED_ITEM_SCORE: f64 = -1.0;

/// Ranked recommendations for one user
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub user: usize,
    /// Unrated item indices, best first, ties by ascending index
    pub ranked: Vec<usize>,
    /// One score per item; rated items carry `RATED_ITEM_SCORE`
    pub scores: Array1<f64>,
}

impl Recommendation {
    /// Ranked items paired with their scores
    pub fn top(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.ranked.iter().map(move |&item| (item, self.scores[item]))
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Recommend up to `top_k` unrated items for `user_id`
///
/// Rated items (rating > 0) are removed from the candidate set before ranking,
/// so ordering never depends on the sentinel written into `scores`. Fewer than
/// `top_k` items come back when the user has rated almost everything.
///
/// # Errors
///
/// - `InvalidShape` if `ratings` is empty or holds non-finite values
/// - `InvalidIndex` if `user_id` is out of range
/// - `DimensionMismatch` if `similarity` is not `I x I` for `I` items
pub fn recommend_items(
    user_id: usize,
    ratings: &Array2<f64>,
    similarity: &Array2<f64>,
    top_k: NonZeroUsize,
) -> Result<Recommendation> {
    validate_ratings(&ratings.view())?;

    let (num_users, num_items) = ratings.dim();
    check_index(Axis::User, user_id, num_users)?;

    if similarity.dim() != (num_items, num_items) {
        return Err(RecsysError::DimensionMismatch {
            expected: num_items,
            actual_rows: similarity.nrows(),
            actual_cols: similarity.ncols(),
        });
    }

    let user_ratings = ratings.row(user_id);
    let mut scores = user_ratings.dot(similarity);

    let mut candidates = Vec::with_capacity(num_items);
    for (item, (&rating, score)) in user_ratings.iter().zip(scores.iter_mut()).enumerate() {
        if rating > 0.0 {
            *score = RATED_ITEM_SCORE;
        } else {
            candidates.push(item);
        }
    }

    candidates.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    candidates.truncate(top_k.get());

    if candidates.is_empty() {
        warn!(user = user_id, "User has rated every item, nothing to recommend");
    }

    debug!(
        user = user_id,
        top_k = top_k.get(),
        returned = candidates.len(),
        "Scored recommendations"
    );

    Ok(Recommendation {
        user: user_id,
        ranked: candidates,
        scores,
    })
}

/// Rating matrix bundled with its cached item similarity
///
/// The similarity matrix is derived once in `fit` and reused for every query.
#[derive(Debug, Clone)]
pub struct ItemBasedRecommender {
    matrix: RatingMatrix,
    similarity: Array2<f64>,
}

impl ItemBasedRecommender {
    pub fn fit(matrix: RatingMatrix) -> Result<Self> {
        let similarity = compute_item_similarity(matrix.ratings())?;
        Ok(Self { matrix, similarity })
    }

    pub fn matrix(&self) -> &RatingMatrix {
        &self.matrix
    }

    pub fn similarity(&self) -> &Array2<f64> {
        &self.similarity
    }

    pub fn recommend(&self, user: usize, top_k: NonZeroUsize) -> Result<Recommendation> {
        recommend_items(user, self.matrix.ratings(), &self.similarity, top_k)
    }

    /// Recommend for a user given by name or index
    pub fn recommend_for(&self, user: &str, top_k: NonZeroUsize) -> Result<Recommendation> {
        let user = self.matrix.resolve_user(user)?;
        self.recommend(user, top_k)
    }

    /// Items most similar to `item`, best first
    pub fn similar_items(&self, item: usize, k: usize) -> Result<Vec<(usize, f64)>> {
        similar_items(&self.similarity, item, k)
    }

    /// Most similar pair of distinct items, skipping near-duplicates at or
    /// above `ceiling` when given
    pub fn most_similar_pair(&self, ceiling: Option<f64>) -> Result<Option<SimilarPair>> {
        most_similar_pair(&self.similarity, ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn picks() -> Array2<f64> {
        array![
            [1.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 1.0, 1.0],
        ]
    }

    #[test]
    fn test_recommend_picks_user_zero() {
        let ratings = picks();
        let sim = compute_item_similarity(&ratings).unwrap();
        let rec = recommend_items(0, &ratings, &sim, k(2)).unwrap();

        assert_eq!(rec.ranked, vec![2, 3]);
        assert_eq!(rec.scores[0], RATED_ITEM_SCORE);
        assert_eq!(rec.scores[1], RATED_ITEM_SCORE);
        assert!((rec.scores[2] - 1.0).abs() < 1e-9);
        assert!((rec.scores[3] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn test_top_k_larger_than_candidates() {
        let ratings = picks();
        let sim = compute_item_similarity(&ratings).unwrap();

        // User 2 rated items 1, 2 and 3
        let rec = recommend_items(2, &ratings, &sim, k(10)).unwrap();
        assert_eq!(rec.ranked, vec![0]);
        assert!((rec.scores[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_user_rated_everything() {
        let ratings = array![[1.0, 2.0], [0.0, 3.0]];
        let sim = compute_item_similarity(&ratings).unwrap();
        let rec = recommend_items(0, &ratings, &sim, k(3)).unwrap();
        assert!(rec.is_empty());
        assert_eq!(rec.scores, array![RATED_ITEM_SCORE, RATED_ITEM_SCORE]);
    }

    #[test]
    fn test_ties_break_by_ascending_index() {
        // Items 1, 2 and 3 are unrated and each similar to item 0 in the same way
        let ratings = array![[1.0, 0.0, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0]];
        let sim = compute_item_similarity(&ratings).unwrap();
        let rec = recommend_items(0, &ratings, &sim, k(3)).unwrap();
        assert_eq!(rec.ranked, vec![1, 2, 3]);
    }

    #[test]
    fn test_scores_below_sentinel_still_rank() {
        // A hand-built similarity with negative entries; the sentinel must not
        // push a rated item into the ranking.
        let ratings = array![[2.0, 0.0, 0.0]];
        let sim = array![[1.0, -0.9, -0.4], [-0.9, 1.0, 0.0], [-0.4, 0.0, 1.0]];
        let rec = recommend_items(0, &ratings, &sim, k(3)).unwrap();
        assert_eq!(rec.ranked, vec![2, 1]);
        assert!((rec.scores[1] + 1.8).abs() < 1e-9);
        assert!((rec.scores[2] + 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_user_index() {
        let ratings = picks();
        let sim = compute_item_similarity(&ratings).unwrap();
        assert!(matches!(
            recommend_items(3, &ratings, &sim, k(1)),
            Err(RecsysError::InvalidIndex {
                kind: Axis::User,
                index: 3,
                len: 3
            })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let ratings = picks();
        let sim = Array2::<f64>::eye(3);
        assert!(matches!(
            recommend_items(0, &ratings, &sim, k(1)),
            Err(RecsysError::DimensionMismatch {
                expected: 4,
                actual_rows: 3,
                actual_cols: 3
            })
        ));

        let sim = Array2::<f64>::zeros((4, 3));
        assert!(matches!(
            recommend_items(0, &ratings, &sim, k(1)),
            Err(RecsysError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_recommender_caches_similarity() {
        let matrix = RatingMatrix::from_rows(&[
            vec![1.0, 1.0, 0.0, 0.0],
            vec![1.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0, 1.0, 1.0],
        ])
        .unwrap();
        let recommender = ItemBasedRecommender::fit(matrix).unwrap();

        assert_eq!(recommender.similarity().dim(), (4, 4));

        let by_name = recommender.recommend_for("user 1", k(2)).unwrap();
        let by_index = recommender.recommend(1, k(2)).unwrap();
        assert_eq!(by_name, by_index);
        assert_eq!(by_index.ranked, vec![1, 3]);

        let top: Vec<(usize, f64)> = by_index.top().collect();
        assert_eq!(top.len(), 2);
        assert!((top[0].1 - 1.0).abs() < 1e-9);
        assert!((top[1].1 - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
    }
}
