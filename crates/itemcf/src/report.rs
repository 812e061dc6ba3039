//! Plain-text rendering of similarity matrices and recommendations, and CSV
//! export of the similarity matrix
//!
//! Scores are printed with four decimals.

use crate::matrix::RatingMatrix;
use crate::pairs::SimilarPair;
use crate::recommendation::Recommendation;
use ndarray::Array2;
use recsys_core::{RecsysError, Result};
use std::fmt;
use std::path::Path;
use tracing::info;

fn item_label(matrix: &RatingMatrix, item: usize) -> &str {
    matrix.item_name(item).unwrap_or("?")
}

struct SimilarityTable<'a> {
    matrix: &'a RatingMatrix,
    similarity: &'a Array2<f64>,
}

impl fmt::Display for SimilarityTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Item-Item Similarity Matrix (cosine):")?;

        write!(f, "        ")?;
        for j in 0..self.similarity.ncols() {
            write!(f, "{:>8}", format!("[{}]", j))?;
        }
        writeln!(f)?;

        for (i, row) in self.similarity.outer_iter().enumerate() {
            write!(f, "{:>8}", format!("[{}]", i))?;
            for value in row.iter() {
                write!(f, "{:>8.4}", value)?;
            }
            writeln!(f, "  {}", item_label(self.matrix, i))?;
        }
        Ok(())
    }
}

struct RecommendationReport<'a> {
    matrix: &'a RatingMatrix,
    recommendation: &'a Recommendation,
}

impl fmt::Display for RecommendationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self.recommendation.user;
        let user_name = self.matrix.user_name(user).unwrap_or("?");

        writeln!(f, "Target user: {} - {}", user, user_name)?;

        let ratings: Vec<String> = self
            .matrix
            .ratings()
            .row(user)
            .iter()
            .map(|r| r.to_string())
            .collect();
        writeln!(f, "User ratings: [{}]", ratings.join(", "))?;

        writeln!(f, "\nPredicted scores for all items (after CF):")?;
        for (item, score) in self.recommendation.scores.iter().enumerate() {
            writeln!(
                f,
                "  Item {}: {} -> score = {:.4}",
                item,
                item_label(self.matrix, item),
                score
            )?;
        }

        writeln!(
            f,
            "\nTop-{} recommended items for {}:",
            self.recommendation.ranked.len(),
            user_name
        )?;
        if self.recommendation.is_empty() {
            writeln!(f, "  (no unrated items left)")?;
        }
        for (item, score) in self.recommendation.top() {
            writeln!(
                f,
                "  -> Item {}: {} (score = {:.4})",
                item,
                item_label(self.matrix, item),
                score
            )?;
        }
        Ok(())
    }
}

struct PairReport<'a> {
    matrix: &'a RatingMatrix,
    heading: &'a str,
    pair: Option<&'a SimilarPair>,
}

impl fmt::Display for PairReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.heading)?;

        let Some(pair) = self.pair else {
            return writeln!(f, "Need at least two items to form a pair");
        };

        writeln!(
            f,
            "Item A (index {}): {}",
            pair.first,
            item_label(self.matrix, pair.first)
        )?;
        writeln!(
            f,
            "Item B (index {}): {}",
            pair.second,
            item_label(self.matrix, pair.second)
        )?;
        writeln!(f, "Cosine similarity: {:.4}", pair.similarity)
    }
}

struct NeighbourList<'a> {
    matrix: &'a RatingMatrix,
    item: usize,
    neighbours: &'a [(usize, f64)],
}

impl fmt::Display for NeighbourList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Items most similar to {}:", item_label(self.matrix, self.item))?;
        for (other, similarity) in self.neighbours {
            writeln!(
                f,
                "  -> Item {}: {} (similarity = {:.4})",
                other,
                item_label(self.matrix, *other),
                similarity
            )?;
        }
        Ok(())
    }
}

pub fn render_similarity(matrix: &RatingMatrix, similarity: &Array2<f64>) -> String {
    SimilarityTable { matrix, similarity }.to_string()
}

pub fn render_recommendation(matrix: &RatingMatrix, recommendation: &Recommendation) -> String {
    RecommendationReport {
        matrix,
        recommendation,
    }
    .to_string()
}

pub fn render_pair(matrix: &RatingMatrix, heading: &str, pair: Option<&SimilarPair>) -> String {
    PairReport {
        matrix,
        heading,
        pair,
    }
    .to_string()
}

pub fn render_neighbours(matrix: &RatingMatrix, item: usize, neighbours: &[(usize, f64)]) -> String {
    NeighbourList {
        matrix,
        item,
        neighbours,
    }
    .to_string()
}

fn export_error(path: &Path, err: impl fmt::Display) -> RecsysError {
    RecsysError::Export {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Write the similarity matrix as CSV, labelled by item title on both axes
///
/// The first header cell is `item`; values are written at full precision.
///
/// # Errors
///
/// `DimensionMismatch` if the matrix is not `items x items`, `Export` if the
/// file cannot be created or written.
pub fn write_similarity_csv(
    matrix: &RatingMatrix,
    similarity: &Array2<f64>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let num_items = matrix.num_items();
    let (rows, cols) = similarity.dim();
    if rows != num_items || cols != num_items {
        return Err(RecsysError::DimensionMismatch {
            expected: num_items,
            actual_rows: rows,
            actual_cols: cols,
        });
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| export_error(path, e))?;

    let header = std::iter::once("item").chain(matrix.items().iter().map(String::as_str));
    writer
        .write_record(header)
        .map_err(|e| export_error(path, e))?;

    for (i, row) in similarity.outer_iter().enumerate() {
        let record = std::iter::once(item_label(matrix, i).to_string())
            .chain(row.iter().map(|value| value.to_string()));
        writer
            .write_record(record)
            .map_err(|e| export_error(path, e))?;
    }

    writer.flush().map_err(|e| export_error(path, e))?;

    info!(path = %path.display(), items = num_items, "Wrote similarity matrix");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::ItemBasedRecommender;
    use ndarray::array;
    use std::num::NonZeroUsize;

    fn recommender() -> ItemBasedRecommender {
        let matrix = RatingMatrix::with_labels(
            array![[1.0, 1.0, 0.0, 0.0], [1.0, 0.0, 1.0, 0.0], [0.0, 1.0, 1.0, 1.0]],
            vec!["Ana".into(), "Bogdan".into(), "Carmen".into()],
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
        )
        .unwrap();
        ItemBasedRecommender::fit(matrix).unwrap()
    }

    #[test]
    fn test_render_recommendation() {
        let recommender = recommender();
        let rec = recommender
            .recommend(0, NonZeroUsize::new(2).unwrap())
            .unwrap();
        let text = render_recommendation(recommender.matrix(), &rec);

        assert!(text.contains("Target user: 0 - Ana"));
        assert!(text.contains("User ratings: [1, 1, 0, 0]"));
        assert!(text.contains("  Item 0: A -> score = -1.0000"));
        assert!(text.contains("  Item 3: D -> score = 0.7071"));
        assert!(text.contains("Top-2 recommended items for Ana:"));

        let first = text.find("-> Item 2: C (score = 1.0000)").unwrap();
        let second = text.find("-> Item 3: D (score = 0.7071)").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_recommendation_when_nothing_left() {
        let recommender = recommender();
        let rec = recommender
            .recommend(2, NonZeroUsize::new(5).unwrap())
            .unwrap();
        let text = render_recommendation(recommender.matrix(), &rec);
        assert!(text.contains("Top-1 recommended items for Carmen:"));
        assert!(!text.contains("no unrated items"));
    }

    #[test]
    fn test_render_similarity() {
        let recommender = recommender();
        let text = render_similarity(recommender.matrix(), recommender.similarity());
        assert!(text.starts_with("Item-Item Similarity Matrix (cosine):\n"));
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("  1.0000  0.5000  0.5000  0.0000  A"));
    }

    #[test]
    fn test_write_similarity_csv() {
        let recommender = recommender();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("similarity_matrix.csv");

        write_similarity_csv(recommender.matrix(), recommender.similarity(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, vec!["item", "A", "B", "C", "D"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 4);
        assert_eq!(&records[0][0], "A");
        assert_eq!(&records[3][0], "D");

        for (i, record) in records.iter().enumerate() {
            for j in 0..4 {
                let value: f64 = record[j + 1].parse().unwrap();
                assert_eq!(value, recommender.similarity()[[i, j]]);
            }
        }
    }

    #[test]
    fn test_write_similarity_csv_errors() {
        let recommender = recommender();
        let dir = tempfile::tempdir().unwrap();

        let missing_dir = dir.path().join("missing").join("similarity.csv");
        assert!(matches!(
            write_similarity_csv(recommender.matrix(), recommender.similarity(), &missing_dir),
            Err(RecsysError::Export { .. })
        ));

        let wrong_size = Array2::<f64>::zeros((3, 3));
        assert!(matches!(
            write_similarity_csv(recommender.matrix(), &wrong_size, dir.path().join("x.csv")),
            Err(RecsysError::DimensionMismatch { expected: 4, .. })
        ));
    }

    #[test]
    fn test_render_pair_and_neighbours() {
        let recommender = recommender();
        let pair = recommender.most_similar_pair(None).unwrap();
        let text = render_pair(recommender.matrix(), "Most similar pair", pair.as_ref());
        assert!(text.contains("Item A (index 1): B"));
        assert!(text.contains("Item B (index 3): D"));
        assert!(text.contains("Cosine similarity: 0.7071"));

        let neighbours = recommender.similar_items(3, 2).unwrap();
        let text = render_neighbours(recommender.matrix(), 3, &neighbours);
        assert!(text.contains("-> Item 1: B (similarity = 0.7071)"));
        assert!(text.contains("-> Item 2: C (similarity = 0.7071)"));
    }
}
