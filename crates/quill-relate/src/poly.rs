//! Bivariate polynomial relations between two series.

use num_traits::Zero;
use quill_num::Rational;
use quill_series::{Error, Result, Series};

use crate::evidence::Evidence;
use crate::matrix::{monomial_series, rational_matrix, rational_null_space, row_count, row_window};

/// A polynomial `P` with `P(x, y) = 0` over the checked window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialRelation {
    /// Coefficient of `x^i y^j` at index `i * (deg_y + 1) + j`.
    pub coefficients: Vec<Rational>,
    /// Degree bound in the first series.
    pub deg_x: i64,
    /// Degree bound in the second series.
    pub deg_y: i64,
    /// How the relation was checked.
    pub evidence: Evidence,
}

impl PolynomialRelation {
    /// The coefficient of `x^i y^j`.
    #[must_use]
    pub fn coeff(&self, i: i64, j: i64) -> Rational {
        if i < 0 || i > self.deg_x || j < 0 || j > self.deg_y {
            return Rational::from(0);
        }
        let idx = usize::try_from(i * (self.deg_y + 1) + j);
        idx.map_or_else(|_| Rational::from(0), |k| self.coefficients[k].clone())
    }
}

/// Searches for a polynomial relation `P(x, y) = 0` with degrees at most
/// `deg_x` and `deg_y`; candidates are the grid monomials `x^i y^j`.
///
/// `Ok(None)` when the grid admits no relation over the window.
///
/// # Errors
///
/// `MalformedParameter` for negative degrees or topshift; `DivisionByZero`
/// if a grid monomial cannot be formed.
pub fn findpoly(
    x: &Series,
    y: &Series,
    deg_x: i64,
    deg_y: i64,
    topshift: i64,
) -> Result<Option<PolynomialRelation>> {
    if deg_x < 0 || deg_y < 0 {
        return Err(Error::MalformedParameter(format!(
            "degrees must be nonnegative, got ({deg_x}, {deg_y})"
        )));
    }
    if topshift < 0 {
        return Err(Error::MalformedParameter(format!(
            "topshift must be nonnegative, got {topshift}"
        )));
    }

    let pair = [x, y];
    let mut values = Vec::new();
    for i in 0..=deg_x {
        for j in 0..=deg_y {
            values.push(monomial_series(&pair, &[i, j])?);
        }
    }
    let candidates: Vec<&Series> = values.iter().collect();

    let (start, end) = row_window(&candidates);
    let Some(rows) = row_count(candidates.len(), topshift, start, end) else {
        return Ok(None);
    };
    let matrix = rational_matrix(&candidates, start, rows);
    let null_space = rational_null_space(&matrix);
    log::debug!(
        "findpoly: grid ({}, {}), {} rows, {} null vectors",
        deg_x + 1,
        deg_y + 1,
        rows,
        null_space.len()
    );

    Ok(null_space
        .into_iter()
        .find(|v| v.iter().any(|c| !c.is_zero()))
        .map(|coefficients| PolynomialRelation {
            coefficients,
            deg_x,
            deg_y,
            evidence: Evidence::Numeric { terms_checked: rows },
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_expr::Session;
    use quill_series::arithmetic;
    use quill_series::gen::{partition_gf, theta3};

    const TRUNC: i64 = 40;

    fn assert_relation_holds(rel: &PolynomialRelation, x: &Series, y: &Series) {
        let mut acc = Series::zero(x.variable(), x.truncation().min(y.truncation()));
        for i in 0..=rel.deg_x {
            for j in 0..=rel.deg_y {
                let c = rel.coeff(i, j);
                if c == Rational::from(0) {
                    continue;
                }
                let term = monomial_series(&[x, y], &[i, j]).unwrap();
                acc = arithmetic::add(&acc, &arithmetic::scalar_mul(&c, &term));
            }
        }
        assert!(acc.is_zero(), "relation does not annihilate the pair");
    }

    #[test]
    fn test_findpoly_algebraic_pair() {
        // y = x^2 satisfies the grid relation x^2 - y = 0.
        let mut session = Session::new();
        let x = partition_gf(&mut session, TRUNC);
        let y = arithmetic::mul(&x, &x);
        let rel = findpoly(&x, &y, 2, 1, 5).unwrap().unwrap();
        assert_relation_holds(&rel, &x, &y);
    }

    #[test]
    fn test_findpoly_linear_pair() {
        let mut session = Session::new();
        let x = theta3(&mut session, TRUNC);
        let y = arithmetic::scalar_mul(&Rational::from_i64(3, 2), &x);
        let rel = findpoly(&x, &y, 1, 1, 6).unwrap().unwrap();
        assert_relation_holds(&rel, &x, &y);
    }

    #[test]
    fn test_findpoly_no_small_relation() {
        let mut session = Session::new();
        let x = partition_gf(&mut session, TRUNC);
        let y = theta3(&mut session, TRUNC);
        assert!(findpoly(&x, &y, 1, 1, 10).unwrap().is_none());
    }

    #[test]
    fn test_findpoly_bad_parameters() {
        let one = Series::one(0, TRUNC);
        assert!(findpoly(&one, &one, -1, 0, 0).is_err());
        assert!(findpoly(&one, &one, 0, 0, -1).is_err());
    }

    #[test]
    fn test_coeff_out_of_range() {
        let rel = PolynomialRelation {
            coefficients: vec![Rational::from(1); 4],
            deg_x: 1,
            deg_y: 1,
            evidence: Evidence::Numeric { terms_checked: 4 },
        };
        assert_eq!(rel.coeff(2, 0), Rational::from(0));
        assert_eq!(rel.coeff(-1, 0), Rational::from(0));
        assert_eq!(rel.coeff(1, 1), Rational::from(1));
    }
}
