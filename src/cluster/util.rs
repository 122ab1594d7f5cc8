use crate::error::{Error, Result};

/// Check that `data` is a non-empty set of finite points sharing one dimension.
///
/// Returns the dimension.
pub(crate) fn validate_points(data: &[Vec<f32>]) -> Result<usize> {
    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for point in data {
        if point.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: point.len(),
            });
        }
        if point.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "contains non-finite values",
            });
        }
    }
    Ok(d)
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}

/// Median of `values`, averaging the two middle elements for even lengths.
///
/// Sorts `values` in place. Returns `None` when empty.
pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some(0.5 * (values[mid - 1] + values[mid]))
    }
}

/// Index of the largest value among `candidates`, keeping the first one seen on ties.
///
/// Callers iterate in ascending index order, so ties resolve to the lowest index.
pub(crate) fn argmax_by<I>(candidates: I, score: impl Fn(usize) -> f64) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut best: Option<(usize, f64)> = None;
    for k in candidates {
        let v = score(k);
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((k, v)),
        }
    }
    best.map(|(k, _)| k)
}
