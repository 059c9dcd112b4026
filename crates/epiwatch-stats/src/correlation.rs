/// Pearson product-moment correlation coefficient between two paired series.
///
/// Only pairs where both values are present take part in the computation
/// (pairwise-complete). Returns `None` when fewer than two complete pairs
/// remain or when either series has zero variance.
///
/// # Examples
///
/// ```
/// use epiwatch_stats::correlation::pearson;
///
/// let xs = [Some(0.0), Some(50.0), None];
/// let ys = [Some(10.0), Some(15.0), Some(99.0)];
/// assert_eq!(pearson(xs, ys), Some(1.0));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson<X, Y>(xs: X, ys: Y) -> Option<f64>
where
    X: IntoIterator<Item = Option<f64>>,
    Y: IntoIterator<Item = Option<f64>>,
{
    let pairs = xs
        .into_iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect::<Vec<_>>();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}
