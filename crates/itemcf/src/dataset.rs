//! JSON rating datasets
//!
//! A dataset carries the rating rows together with the user names and item
//! titles that label them:
//!
//! ```json
//! {
//!   "name": "picks",
//!   "users": ["User 0", "User 1"],
//!   "items": ["A", "B"],
//!   "ratings": [[1, 0], [0, 1]]
//! }
//! ```
//!
//! `users` and `items` may be omitted, in which case positions are used as
//! labels.

use crate::matrix::{default_labels, rows_to_array, RatingMatrix};
use recsys_core::{Axis, RecsysError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingDataset {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub items: Vec<String>,
    pub ratings: Vec<Vec<f64>>,
}

impl RatingDataset {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RecsysError::Dataset {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Read and parse a dataset file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| RecsysError::Dataset {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let dataset: RatingDataset =
            serde_json::from_str(&contents).map_err(|e| RecsysError::Dataset {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        info!(
            path = %path.display(),
            name = dataset.name.as_deref().unwrap_or("unnamed"),
            users = dataset.ratings.len(),
            "Loaded rating dataset"
        );

        Ok(dataset)
    }

    /// Validate the rows and labels and build a rating matrix
    pub fn into_matrix(self) -> Result<RatingMatrix> {
        let ratings = rows_to_array(&self.ratings)?;

        let users = if self.users.is_empty() {
            default_labels(Axis::User, ratings.nrows())
        } else {
            self.users
        };
        let items = if self.items.is_empty() {
            default_labels(Axis::Item, ratings.ncols())
        } else {
            self.items
        };

        RatingMatrix::with_labels(ratings, users, items)
    }
}
