//! Vector math helpers over plain slices

/// Dot product of two equal-length vectors
///
/// Extra elements of the longer slice are ignored.
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn max_abs(a: &[f64]) -> f64 {
    a.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}

/// Euclidean norm
///
/// Computed on the vector scaled by its largest magnitude, so tiny or huge
/// entries do not underflow to 0 or overflow while squaring.
pub fn l2_norm(a: &[f64]) -> f64 {
    let scale = max_abs(a);
    if scale == 0.0 {
        return 0.0;
    }
    scale * a.iter().map(|x| (x / scale).powi(2)).sum::<f64>().sqrt()
}

/// Cosine similarity, defined as 0 when either vector has zero norm or the
/// lengths differ
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 {
        return 0.0;
    }

    let unit_a: Vec<f64> = a.iter().map(|x| x / scale_a).collect();
    let unit_b: Vec<f64> = b.iter().map(|x| x / scale_b).collect();
    let norm_a = l2_norm(&unit_a);
    let norm_b = l2_norm(&unit_b);

    (dot_product(&unit_a, &unit_b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
