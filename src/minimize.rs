use crate::error::MinimizerError;

/// Result of golden section search
#[derive(Debug, Clone)]
pub struct GoldenResult {
    pub xmin: f64,
    pub fmin: f64,
    pub iters: usize,
}

pub struct Golden<F>
where
    F: Fn(f64) -> f64,
{
    f: F,
    iters: usize,
}

impl<F> Golden<F>
where
    F: Fn(f64) -> f64,
{
    /// Golden ratio constant (φ - 1)
    const GOLDEN_RATIO: f64 = 0.618_033_988_749_895;

    pub fn new(f: F) -> Self {
        Golden { f, iters: 0 }
    }

    pub fn iters(&self) -> usize {
        self.iters
    }

    /// Golden section search for the minimum of a unimodal function
    ///
    /// # Arguments
    /// * `a` - Left bracket boundary
    /// * `b` - Right bracket boundary
    /// * `tol` - Convergence tolerance on the bracket width (default: 1e-6)
    /// * `max_iters` - Maximum iterations (default: 100)
    ///
    /// # Errors
    /// * `InvalidBracket` if a >= b
    /// * `InvalidTolerance` if tolerance <= 0
    /// * `MaxIterationsExceeded` if convergence not reached
    pub fn golden_section_search(
        &mut self,
        a: f64,
        b: f64,
        tol: Option<f64>,
        max_iters: Option<usize>,
    ) -> Result<GoldenResult, MinimizerError> {
        let tol = tol.unwrap_or(1e-6);
        let max_iter = max_iters.unwrap_or(100);

        if a >= b {
            return Err(MinimizerError::InvalidBracket);
        }
        if tol <= 0.0 {
            return Err(MinimizerError::InvalidTolerance);
        }

        let mut x1 = a;
        let mut x4 = b;
        let mut x2 = x1 + (1.0 - Self::GOLDEN_RATIO) * (x4 - x1);
        let mut x3 = x1 + Self::GOLDEN_RATIO * (x4 - x1);
        let mut f2 = (self.f)(x2);
        let mut f3 = (self.f)(x3);

        self.iters = 0;
        while (x4 - x1).abs() > tol {
            if self.iters >= max_iter {
                return Err(MinimizerError::MaxIterationsExceeded);
            }
            self.iters += 1;

            if f2 < f3 {
                // Minimum is in [x1, x3]
                x4 = x3;
                x3 = x2;
                f3 = f2;
                x2 = x1 + (1.0 - Self::GOLDEN_RATIO) * (x4 - x1);
                f2 = (self.f)(x2);
            } else {
                // Minimum is in [x2, x4]
                x1 = x2;
                x2 = x3;
                f2 = f3;
                x3 = x1 + Self::GOLDEN_RATIO * (x4 - x1);
                f3 = (self.f)(x3);
            }
        }

        let (xmin, fmin) = if f2 < f3 { (x2, f2) } else { (x3, f3) };
        Ok(GoldenResult {
            xmin,
            fmin,
            iters: self.iters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn golden_parabola() {
        let mut golden = Golden::new(|x: f64| (x - 2.0).powi(2) + 1.0);
        let res = golden.golden_section_search(0.0, 5.0, Some(1e-8), None).unwrap();
        assert_relative_eq!(res.xmin, 2.0, epsilon = 1e-6);
        assert_relative_eq!(res.fmin, 1.0, epsilon = 1e-10);
        assert_eq!(res.iters, golden.iters());
    }

    #[test]
    fn golden_errors() {
        let mut golden = Golden::new(|x: f64| x * x);
        assert_eq!(
            golden.golden_section_search(1.0, -1.0, None, None).unwrap_err(),
            MinimizerError::InvalidBracket
        );
        assert_eq!(
            golden.golden_section_search(-1.0, 1.0, Some(0.0), None).unwrap_err(),
            MinimizerError::InvalidTolerance
        );
        assert_eq!(
            golden.golden_section_search(-1.0, 1.0, Some(1e-12), Some(3)).unwrap_err(),
            MinimizerError::MaxIterationsExceeded
        );
    }
}
