//! Item-based collaborative filtering
//!
//! Computes item-item cosine similarity from a dense user-by-item rating
//! matrix and ranks unrated items for a user by the similarity-weighted sum of
//! that user's ratings.
//!
//! ```
//! use ndarray::array;
//! use recsys_itemcf::{compute_item_similarity, recommend_items};
//! use std::num::NonZeroUsize;
//!
//! let ratings = array![
//!     [1.0, 1.0, 0.0, 0.0],
//!     [1.0, 0.0, 1.0, 0.0],
//!     [0.0, 1.0, 1.0, 1.0],
//! ];
//! let similarity = compute_item_similarity(&ratings)?;
//! let rec = recommend_items(0, &ratings, &similarity, NonZeroUsize::new(2).unwrap())?;
//! assert_eq!(rec.ranked, vec![2, 3]);
//! # Ok::<(), recsys_core::RecsysError>(())
//! ```

pub mod dataset;
pub mod matrix;
pub mod pairs;
pub mod recommendation;
pub mod report;
pub mod similarity;

// Re-export key types
pub use dataset::RatingDataset;
pub use matrix::{validate_ratings, RatingMatrix};
pub use pairs::{most_similar_pair, similar_items, SimilarPair};
pub use recommendation::{recommend_items, ItemBasedRecommender, Recommendation, RATED_ITEM_SCORE};
pub use similarity::{compute_item_similarity, item_pair_similarity};
