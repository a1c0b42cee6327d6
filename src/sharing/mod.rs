use std::collections::BTreeMap;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod decoding;
mod interpolation;

pub use decoding::{DecodeError, MAX_RADIX, MIN_RADIX, decode};
pub use interpolation::interpolate_at_zero;

/// A point (x, y) on the sharing polynomial, x being the ordinal of the share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    x: BigInt,
    y: BigInt,
}

impl Point {
    pub fn new(x: BigInt, y: BigInt) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> &BigInt {
        &self.x
    }

    pub fn y(&self) -> &BigInt {
        &self.y
    }
}

/// A share as it is transmitted, a numeral and the radix it is written in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedShare {
    pub value: String,
    pub base: String,
}

impl EncodedShare {
    pub fn new(value: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            base: base.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReconstructionRequest {
    /// Number of points needed for a polynomial of degree `threshold - 1`
    pub threshold: u32,
    /// Encoded shares by ordinal, the ordinal being the x coordinate
    pub entries: BTreeMap<u32, EncodedShare>,
}

impl ReconstructionRequest {
    pub fn new(threshold: u32, entries: BTreeMap<u32, EncodedShare>) -> Self {
        Self { threshold, entries }
    }
}

#[derive(Debug, Error)]
pub enum ReconstructionError {
    #[error("threshold must be at least one")]
    InvalidThreshold,
    #[error("share {ordinal} could not be decoded: {source}")]
    Decode {
        ordinal: u32,
        #[source]
        source: DecodeError,
    },
    #[error("not enough points to interpolate: threshold is {threshold}, {available} available")]
    InsufficientPoints { threshold: u32, available: usize },
    #[error("two points share the abscissa {0}")]
    DuplicateAbscissa(BigInt),
    #[error("points do not lie on an integer polynomial, value at zero is {numerator}/{denominator}")]
    NonIntegralSecret {
        numerator: BigInt,
        denominator: BigInt,
    },
}

/// Collects the points used for reconstruction.
///
/// Ordinals `1..=threshold` are visited in ascending order. A missing ordinal is skipped,
/// it is never replaced by a later entry, hence fewer than `threshold` points may be returned.
pub fn collect_points(request: &ReconstructionRequest) -> Result<Vec<Point>, ReconstructionError> {
    if request.threshold == 0 {
        return Ok(vec![]);
    }

    let mut points = Vec::with_capacity(request.entries.len().min(request.threshold as usize));
    let mut expected = 1;
    for (&ordinal, share) in request.entries.range(1..=request.threshold) {
        if ordinal > expected {
            debug!(
                from = expected,
                to = ordinal - 1,
                "no share registered for ordinals, skipping them"
            );
        }
        expected = ordinal.saturating_add(1);

        let y = decode(&share.value, &share.base)
            .map_err(|source| ReconstructionError::Decode { ordinal, source })?;
        points.push(Point::new(BigInt::from(ordinal), y));
    }
    Ok(points)
}

/// Recovers the secret, i.e. the value at x = 0 of the polynomial going through the
/// first `threshold` shares of the request.
pub fn reconstruct(request: &ReconstructionRequest) -> Result<BigInt, ReconstructionError> {
    if request.threshold == 0 {
        return Err(ReconstructionError::InvalidThreshold);
    }

    let points = collect_points(request)?;
    // A single point is enough for a constant polynomial
    let required = request.threshold.min(2) as usize;
    if points.len() < required {
        return Err(ReconstructionError::InsufficientPoints {
            threshold: request.threshold,
            available: points.len(),
        });
    }
    debug!(
        threshold = request.threshold,
        points = points.len(),
        "interpolating secret"
    );

    let secret = interpolate_at_zero(&points)?;
    if !secret.is_integer() {
        let (numerator, denominator) = secret.into_raw();
        return Err(ReconstructionError::NonIntegralSecret {
            numerator,
            denominator,
        });
    }

    Ok(secret.to_integer())
}
