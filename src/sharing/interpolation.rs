use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::{Point, ReconstructionError};

/// Evaluates at x = 0 the unique polynomial of degree < `points.len()` passing through `points`.
///
/// For every point i the Lagrange term is
/// ```text
/// y_i * Π_{j≠i} (-x_j) / Π_{j≠i} (x_i - x_j)
/// ```
/// Terms are accumulated as exact rationals, the caller decides what a non-integral sum means.
pub fn interpolate_at_zero(points: &[Point]) -> Result<BigRational, ReconstructionError> {
    let mut sum = BigRational::zero();

    for (i, point) in points.iter().enumerate() {
        let mut numerator = point.y().clone();
        let mut denominator = BigInt::one();

        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            if point.x() == other.x() {
                return Err(ReconstructionError::DuplicateAbscissa(point.x().clone()));
            }
            numerator *= -other.x();
            denominator *= point.x() - other.x();
        }

        // Keep the denominator positive
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }

        sum += BigRational::new(numerator, denominator);
    }

    Ok(sum)
}
