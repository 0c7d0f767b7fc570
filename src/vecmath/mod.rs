// ============================================
// SEMALIGN - Vector Math Utilities
// ============================================

use crate::error::{AnalysisError, Result};

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// Calculate cosine similarity between two vectors.
///
/// Errors on length mismatch and on a zero-norm operand; a zero-magnitude
/// vector here means a provider returned garbage and must fail the run
/// rather than score as 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() || a.is_empty() {
        return Err(AnalysisError::DegenerateMath(format!(
            "cosine similarity over mismatched vectors ({} vs {})",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(AnalysisError::DegenerateMath(
            "cosine similarity with zero-magnitude vector".into(),
        ));
    }

    Ok(dot_product / (norm_a * norm_b))
}

/// Normalize a vector to unit length in place. Errors on zero norm.
pub fn normalize(v: &mut [f32]) -> Result<()> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Err(AnalysisError::DegenerateMath(
            "cannot normalize zero-magnitude vector".into(),
        ));
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    Ok(())
}

/// Weighted centroid of a set of embeddings: componentwise sum of
/// `embedding * weight`, L2-normalized to a unit vector.
///
/// Requires at least one entry with weight > 0 and equal-length embeddings.
/// A weight of zero contributes nothing but is not an error.
pub fn weighted_centroid(entries: &[(Embedding, f32)]) -> Result<Embedding> {
    let dimension = entries
        .first()
        .map(|(e, _)| e.len())
        .filter(|&d| d > 0)
        .ok_or_else(|| {
            AnalysisError::DegenerateMath("centroid of empty embedding set".into())
        })?;

    let total_weight: f32 = entries.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return Err(AnalysisError::DegenerateMath(
            "centroid requires at least one positive weight".into(),
        ));
    }

    let mut sum = vec![0.0f32; dimension];
    for (embedding, weight) in entries {
        if embedding.len() != dimension {
            return Err(AnalysisError::DegenerateMath(format!(
                "centroid over mixed dimensions ({} vs {})",
                embedding.len(),
                dimension
            )));
        }
        for (acc, value) in sum.iter_mut().zip(embedding.iter()) {
            *acc += value * weight;
        }
    }

    normalize(&mut sum)?;
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!(sim.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-1.0, -2.0, -3.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_bounds() {
        let a = vec![0.3, -0.7, 0.64, 0.12];
        let b = vec![-0.9, 0.2, 0.4, 0.88];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_cosine_similarity_zero_vector_fails() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            cosine_similarity(&a, &b),
            Err(AnalysisError::DegenerateMath(_))
        ));
    }

    #[test]
    fn test_cosine_similarity_length_mismatch_fails() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(cosine_similarity(&a, &b).is_err());
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_zero_fails() {
        let mut v = vec![0.0, 0.0];
        assert!(normalize(&mut v).is_err());
    }

    #[test]
    fn test_weighted_centroid_is_unit_length() {
        let entries = vec![
            (vec![1.0, 0.0, 0.0], 3.0),
            (vec![0.0, 1.0, 0.0], 1.0),
            (vec![0.5, 0.5, 0.5], 2.0),
        ];
        let centroid = weighted_centroid(&entries).unwrap();
        let norm: f32 = centroid.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_weighted_centroid_weight_pulls_direction() {
        // Heavy weight on the x axis should dominate the direction
        let entries = vec![(vec![1.0, 0.0], 10.0), (vec![0.0, 1.0], 0.1)];
        let centroid = weighted_centroid(&entries).unwrap();
        assert!(centroid[0] > centroid[1]);
    }

    #[test]
    fn test_weighted_centroid_zero_weight_ignored() {
        let entries = vec![(vec![1.0, 0.0], 1.0), (vec![0.0, 1.0], 0.0)];
        let centroid = weighted_centroid(&entries).unwrap();
        assert!((centroid[0] - 1.0).abs() < 0.0001);
        assert!(centroid[1].abs() < 0.0001);
    }

    #[test]
    fn test_weighted_centroid_all_zero_weights_fails() {
        let entries = vec![(vec![1.0, 0.0], 0.0), (vec![0.0, 1.0], 0.0)];
        assert!(weighted_centroid(&entries).is_err());
    }

    #[test]
    fn test_weighted_centroid_empty_fails() {
        assert!(weighted_centroid(&[]).is_err());
    }

    #[test]
    fn test_weighted_centroid_mixed_dimensions_fails() {
        let entries = vec![(vec![1.0, 0.0], 1.0), (vec![0.0, 1.0, 2.0], 1.0)];
        assert!(weighted_centroid(&entries).is_err());
    }
}
