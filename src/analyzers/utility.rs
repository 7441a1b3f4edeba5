/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Ordinary least-squares line through a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fits `y = slope * x + intercept`.
///
/// Returns `None` when fewer than two distinct `x` values exist. `x` is
/// centred on its mean before fitting, so calendar years do not cost
/// precision. R² is 1.0 when `y` is constant (the fit is exact).
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LineFit> {
    if points.len() < 2 {
        return None;
    }

    let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
    let x_mean = mean(&xs);
    let y_mean = mean(&ys);

    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let ss_tot: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    Some(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let fit = linear_fit(&[(2000.0, 1.0), (2001.0, 3.0), (2002.0, 5.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - (1.0 - 2.0 * 2000.0)).abs() < 1e-6);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_noisy_points() {
        // Least squares through (0,1) (1,3) (2,2): slope 0.5, intercept 1.5.
        let fit = linear_fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)]).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 1.5).abs() < 1e-12);
        // ss_tot = 2, ss_res = 1.5
        assert!((fit.r_squared - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_constant_y() {
        let fit = linear_fit(&[(2010.0, 4.0), (2011.0, 4.0)]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[]).is_none());
        assert!(linear_fit(&[(2010.0, 3.0)]).is_none());
        assert!(linear_fit(&[(2010.0, 3.0), (2010.0, 5.0)]).is_none());
    }
}
