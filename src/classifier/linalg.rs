//! Dense vector helpers.

use crate::error::{Result, ScutumError};

/// Inner product of two vectors of equal length.
pub fn dot(left: &[f64], right: &[f64]) -> Result<f64> {
    if left.len() != right.len() {
        return Err(ScutumError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(left.iter().zip(right).map(|(a, b)| a * b).sum())
}

/// Euclidean norm of a non-empty vector.
pub fn norm(vector: &[f64]) -> Result<f64> {
    if vector.is_empty() {
        return Err(ScutumError::EmptyVector);
    }
    Ok(vector.iter().map(|v| v * v).sum::<f64>().sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0);
        assert!(matches!(
            dot(&[1.0], &[1.0, 2.0]),
            Err(ScutumError::DimensionMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[3.0, 4.0]).unwrap(), 5.0);
        assert_eq!(norm(&[0.0, 0.0]).unwrap(), 0.0);
        assert!(matches!(norm(&[]), Err(ScutumError::EmptyVector)));
    }
}
