//! Dense user-by-item rating matrix
//!
//! Rows are users, columns are items. A value of 0 means "no interaction";
//! anything greater than 0 is an explicit rating. Row and column positions map
//! to user names and item titles through parallel label lists.

use ndarray::{Array2, ArrayView1, ArrayView2};
use recsys_core::{Axis, RecsysError, Result};
use tracing::debug;

/// Check that a rating matrix is non-empty and holds only finite values
pub fn validate_ratings(ratings: &ArrayView2<'_, f64>) -> Result<()> {
    let (num_users, num_items) = ratings.dim();

    if num_users == 0 {
        return Err(RecsysError::invalid_shape("rating matrix has no users"));
    }
    if num_items == 0 {
        return Err(RecsysError::invalid_shape("rating matrix has no items"));
    }

    if let Some(((user, item), value)) = ratings.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(RecsysError::invalid_shape(format!(
            "non-finite rating {} at user {}, item {}",
            value, user, item
        )));
    }

    Ok(())
}

/// Immutable rating matrix with user and item labels
#[derive(Debug, Clone, PartialEq)]
pub struct RatingMatrix {
    ratings: Array2<f64>,
    users: Vec<String>,
    items: Vec<String>,
}

impl RatingMatrix {
    /// Wrap a rating matrix, labelling users and items by position
    pub fn new(ratings: Array2<f64>) -> Result<Self> {
        let users = default_labels(Axis::User, ratings.nrows());
        let items = default_labels(Axis::Item, ratings.ncols());
        Self::with_labels(ratings, users, items)
    }

    pub fn with_labels(ratings: Array2<f64>, users: Vec<String>, items: Vec<String>) -> Result<Self> {
        validate_ratings(&ratings.view())?;

        if users.len() != ratings.nrows() {
            return Err(RecsysError::invalid_shape(format!(
                "{} user labels for {} rating rows",
                users.len(),
                ratings.nrows()
            )));
        }
        if items.len() != ratings.ncols() {
            return Err(RecsysError::invalid_shape(format!(
                "{} item labels for {} rating columns",
                items.len(),
                ratings.ncols()
            )));
        }

        debug!(
            users = ratings.nrows(),
            items = ratings.ncols(),
            "Rating matrix loaded"
        );

        Ok(Self {
            ratings,
            users,
            items,
        })
    }

    /// Build from row vectors, rejecting ragged input
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        Self::new(rows_to_array(rows)?)
    }

    pub fn ratings(&self) -> &Array2<f64> {
        &self.ratings
    }

    pub fn num_users(&self) -> usize {
        self.ratings.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.ratings.ncols()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn user_name(&self, user: usize) -> Option<&str> {
        self.users.get(user).map(String::as_str)
    }

    pub fn item_name(&self, item: usize) -> Option<&str> {
        self.items.get(item).map(String::as_str)
    }

    pub fn user_ratings(&self, user: usize) -> Result<ArrayView1<'_, f64>> {
        check_index(Axis::User, user, self.num_users())?;
        Ok(self.ratings.row(user))
    }

    /// Indices of items the user has interacted with
    pub fn rated_items(&self, user: usize) -> Result<Vec<usize>> {
        Ok(self
            .user_ratings(user)?
            .iter()
            .enumerate()
            .filter(|(_, &rating)| rating > 0.0)
            .map(|(item, _)| item)
            .collect())
    }

    /// Resolve a user by exact name (case-insensitive) or by numeric index
    pub fn resolve_user(&self, key: &str) -> Result<usize> {
        resolve_label(Axis::User, &self.users, key)
    }

    /// Resolve an item by exact title (case-insensitive) or by numeric index
    pub fn resolve_item(&self, key: &str) -> Result<usize> {
        resolve_label(Axis::Item, &self.items, key)
    }
}

/// Positional labels such as "user 0", "user 1", ...
pub(crate) fn default_labels(kind: Axis, len: usize) -> Vec<String> {
    (0..len).map(|i| format!("{} {}", kind, i)).collect()
}

pub(crate) fn check_index(kind: Axis, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(RecsysError::InvalidIndex { kind, index, len });
    }
    Ok(())
}

pub(crate) fn rows_to_array(rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let num_items = rows.first().map(Vec::len).unwrap_or(0);

    if let Some((user, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != num_items) {
        return Err(RecsysError::invalid_shape(format!(
            "row {} has {} ratings, expected {}",
            user,
            row.len(),
            num_items
        )));
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), num_items), flat)
        .map_err(|e| RecsysError::invalid_shape(e.to_string()))
}

fn resolve_label(kind: Axis, labels: &[String], key: &str) -> Result<usize> {
    let key = key.trim();

    if let Some(index) = labels.iter().position(|l| l.eq_ignore_ascii_case(key)) {
        return Ok(index);
    }

    match key.parse::<usize>() {
        Ok(index) => {
            check_index(kind, index, labels.len())?;
            Ok(index)
        }
        Err(_) => Err(RecsysError::UnknownLabel {
            kind,
            label: key.to_string(),
        }),
    }
}
