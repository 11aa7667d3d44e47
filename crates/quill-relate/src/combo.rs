//! Expressing a target series in terms of candidate series.

use num_traits::Zero;
use quill_num::Rational;
use quill_rings::ModP;
use quill_series::{Error, Result, Series};

use crate::evidence::Evidence;
use crate::matrix::{
    modular_matrix, modular_null_space, monomial_series, monomials_of_degree,
    monomials_up_to_degree, rational_matrix, rational_null_space, row_count, row_window,
    with_prime_retry,
};

/// A linear combination `f = sum c_i basis_i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearCombination {
    /// One coefficient per basis series, in input order.
    pub coefficients: Vec<Rational>,
    /// How the combination was checked.
    pub evidence: Evidence,
}

/// A polynomial combination `f = sum c_m prod basis_i^{m_i}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonomialCombination {
    /// Exponent tuples, lexicographic; parallel to `coefficients`.
    pub monomials: Vec<Vec<i64>>,
    /// One coefficient per monomial.
    pub coefficients: Vec<Rational>,
    /// How the combination was checked.
    pub evidence: Evidence,
}

/// A linear combination with coefficients in Z/pZ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModularCombination {
    /// One residue per basis series.
    pub coefficients: Vec<ModP>,
    /// How the combination was checked.
    pub evidence: Evidence,
}

/// A polynomial combination with coefficients in Z/pZ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModularMonomialCombination {
    /// Exponent tuples, lexicographic; parallel to `coefficients`.
    pub monomials: Vec<Vec<i64>>,
    /// One residue per monomial.
    pub coefficients: Vec<ModP>,
    /// How the combination was checked.
    pub evidence: Evidence,
}

fn check_topshift(topshift: i64) -> Result<()> {
    if topshift < 0 {
        return Err(Error::MalformedParameter(format!(
            "topshift must be nonnegative, got {topshift}"
        )));
    }
    Ok(())
}

fn check_degree(degree: i64) -> Result<()> {
    if degree < 0 {
        return Err(Error::MalformedParameter(format!(
            "degree must be nonnegative, got {degree}"
        )));
    }
    Ok(())
}

fn check_prime(p: i64) -> Result<()> {
    if p < 2 {
        return Err(Error::MalformedParameter(format!(
            "modulus must be a prime >= 2, got {p}"
        )));
    }
    Ok(())
}

/// Finds rationals `c_i` with `f = sum c_i basis_i`, checked on a coefficient
/// window of `basis.len() + 1 + topshift` rows.
///
/// `Ok(None)` when no null vector involves the target column.
///
/// # Errors
///
/// `MalformedParameter` for a negative topshift.
pub fn findlincombo(
    f: &Series,
    basis: &[&Series],
    topshift: i64,
) -> Result<Option<LinearCombination>> {
    check_topshift(topshift)?;
    if basis.is_empty() {
        return Ok(f.is_zero().then(|| LinearCombination {
            coefficients: Vec::new(),
            evidence: Evidence::Numeric { terms_checked: 0 },
        }));
    }

    let mut candidates: Vec<&Series> = Vec::with_capacity(basis.len() + 1);
    candidates.push(f);
    candidates.extend_from_slice(basis);
    Ok(target_combination(&candidates, topshift))
}

/// Shared tail for the target-column searches: null space of the candidate
/// matrix, first vector with a nonzero leading component, coefficients are
/// the negated normalized rest.
fn target_combination(candidates: &[&Series], topshift: i64) -> Option<LinearCombination> {
    let (start, end) = row_window(candidates);
    let rows = row_count(candidates.len(), topshift, start, end)?;
    let matrix = rational_matrix(candidates, start, rows);
    let null_space = rational_null_space(&matrix);
    log::debug!(
        "target combination: {} candidates, {} rows, {} null vectors",
        candidates.len(),
        rows,
        null_space.len()
    );

    for v in &null_space {
        if !v[0].is_zero() {
            let inv = v[0].recip();
            let coefficients = v[1..].iter().map(|c| -(c * &inv)).collect();
            return Some(LinearCombination {
                coefficients,
                evidence: Evidence::Numeric {
                    terms_checked: rows,
                },
            });
        }
    }
    None
}

/// Finds a homogeneous degree-`degree` polynomial in the basis matching `f`.
///
/// # Errors
///
/// `MalformedParameter` for a negative degree or topshift; `DivisionByZero`
/// if a monomial cannot be formed.
pub fn findhomcombo(
    f: &Series,
    basis: &[&Series],
    degree: i64,
    topshift: i64,
) -> Result<Option<MonomialCombination>> {
    check_degree(degree)?;
    let monomials = monomials_of_degree(basis.len(), degree);
    monomial_combination(f, basis, monomials, topshift)
}

/// Finds a polynomial of total degree at most `degree` in the basis matching
/// `f`; the constant monomial is included.
///
/// # Errors
///
/// Same as [`findhomcombo`].
pub fn findnonhomcombo(
    f: &Series,
    basis: &[&Series],
    degree: i64,
    topshift: i64,
) -> Result<Option<MonomialCombination>> {
    check_degree(degree)?;
    let monomials = monomials_up_to_degree(basis.len(), degree);
    monomial_combination(f, basis, monomials, topshift)
}

fn monomial_combination(
    f: &Series,
    basis: &[&Series],
    monomials: Vec<Vec<i64>>,
    topshift: i64,
) -> Result<Option<MonomialCombination>> {
    check_topshift(topshift)?;
    if monomials.is_empty() {
        return Ok(None);
    }

    let monomial_values: Vec<Series> = monomials
        .iter()
        .map(|exps| monomial_series(basis, exps))
        .collect::<Result<_>>()?;

    let mut candidates: Vec<&Series> = Vec::with_capacity(monomial_values.len() + 1);
    candidates.push(f);
    candidates.extend(monomial_values.iter());

    Ok(target_combination(&candidates, topshift).map(|combo| MonomialCombination {
        monomials,
        coefficients: combo.coefficients,
        evidence: combo.evidence,
    }))
}

/// [`findlincombo`] with all arithmetic in Z/pZ.
///
/// When `p` divides a clearing denominator the search retries with the next
/// primes (bounded); the returned residues carry the prime actually used.
///
/// # Errors
///
/// `MalformedParameter` for a bad prime or topshift; `DivisionByZero` when
/// every retried prime divides a coefficient denominator.
pub fn findlincombomodp(
    f: &Series,
    basis: &[&Series],
    p: i64,
    topshift: i64,
) -> Result<Option<ModularCombination>> {
    check_prime(p)?;
    check_topshift(topshift)?;
    if basis.is_empty() {
        return Ok(f.is_zero().then(|| ModularCombination {
            coefficients: Vec::new(),
            evidence: Evidence::Numeric { terms_checked: 0 },
        }));
    }

    let mut candidates: Vec<&Series> = Vec::with_capacity(basis.len() + 1);
    candidates.push(f);
    candidates.extend_from_slice(basis);
    with_prime_retry(p, |q| modular_target_combination(&candidates, q, topshift))
        .map(|opt| opt.map(|(coefficients, rows)| ModularCombination {
            coefficients,
            evidence: Evidence::Numeric { terms_checked: rows },
        }))
}

/// [`findhomcombo`] with all arithmetic in Z/pZ.
///
/// # Errors
///
/// Same as [`findlincombomodp`], plus a negative degree.
pub fn findhomcombomodp(
    f: &Series,
    basis: &[&Series],
    p: i64,
    degree: i64,
    topshift: i64,
) -> Result<Option<ModularMonomialCombination>> {
    check_prime(p)?;
    check_degree(degree)?;
    check_topshift(topshift)?;
    let monomials = monomials_of_degree(basis.len(), degree);
    if monomials.is_empty() {
        return Ok(None);
    }

    let monomial_values: Vec<Series> = monomials
        .iter()
        .map(|exps| monomial_series(basis, exps))
        .collect::<Result<_>>()?;

    let mut candidates: Vec<&Series> = Vec::with_capacity(monomial_values.len() + 1);
    candidates.push(f);
    candidates.extend(monomial_values.iter());

    Ok(
        with_prime_retry(p, |q| modular_target_combination(&candidates, q, topshift))?.map(
            |(coefficients, rows)| ModularMonomialCombination {
                monomials,
                coefficients,
                evidence: Evidence::Numeric { terms_checked: rows },
            },
        ),
    )
}

fn modular_target_combination(
    candidates: &[&Series],
    p: i64,
    topshift: i64,
) -> Result<Option<(Vec<ModP>, usize)>> {
    let (start, end) = row_window(candidates);
    let Some(rows) = row_count(candidates.len(), topshift, start, end) else {
        return Ok(None);
    };
    let matrix = modular_matrix(candidates, start, rows, p)?;
    let null_space = modular_null_space(&matrix, p);

    for v in &null_space {
        if v[0].value() != 0 {
            let inv = match quill_num::mod_inv(v[0].value(), p) {
                Some(i) => ModP::new(i, p),
                None => continue,
            };
            let coefficients = v[1..].iter().map(|&c| -(c * inv)).collect();
            return Ok(Some((coefficients, rows)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_expr::Session;
    use quill_series::arithmetic;
    use quill_series::gen::{distinct_parts_gf, odd_parts_gf, partition_gf, theta3, theta4};

    const TRUNC: i64 = 30;

    #[test]
    fn test_findlincombo_euler_theorem() {
        // Partitions into odd parts = partitions into distinct parts.
        let mut session = Session::new();
        let odd = odd_parts_gf(&mut session, TRUNC);
        let distinct = distinct_parts_gf(&mut session, TRUNC);
        let combo = findlincombo(&odd, &[&distinct], 2).unwrap().unwrap();
        assert_eq!(combo.coefficients, vec![Rational::from(1)]);
        assert!(matches!(combo.evidence, Evidence::Numeric { .. }));
    }

    #[test]
    fn test_findlincombo_weighted_sum() {
        let mut session = Session::new();
        let p = partition_gf(&mut session, TRUNC);
        let d = distinct_parts_gf(&mut session, TRUNC);
        // target = 3p - 1/2 d
        let target = arithmetic::sub(
            &arithmetic::scalar_mul(&Rational::from(3), &p),
            &arithmetic::scalar_mul(&Rational::from_i64(1, 2), &d),
        );
        let combo = findlincombo(&target, &[&p, &d], 3).unwrap().unwrap();
        assert_eq!(
            combo.coefficients,
            vec![Rational::from(3), Rational::from_i64(-1, 2)]
        );
    }

    #[test]
    fn test_findlincombo_no_relation() {
        let mut session = Session::new();
        let p = partition_gf(&mut session, TRUNC);
        let d = distinct_parts_gf(&mut session, TRUNC);
        assert!(findlincombo(&p, &[&d], 4).unwrap().is_none());
    }

    #[test]
    fn test_findlincombo_empty_basis() {
        let zero = Series::zero(0, TRUNC);
        let combo = findlincombo(&zero, &[], 0).unwrap().unwrap();
        assert!(combo.coefficients.is_empty());

        let one = Series::one(0, TRUNC);
        assert!(findlincombo(&one, &[], 0).unwrap().is_none());
    }

    #[test]
    fn test_findhomcombo_jacobi_squares() {
        // theta3^4 = theta4^4 + theta2^4; here check the degree-2 identity
        // theta3(q)^2 = theta4(q)^2 + (theta3^2 - theta4^2) trivially via a
        // constructed target: target = t3^2 + 2 t3 t4.
        let mut session = Session::new();
        let t3 = theta3(&mut session, TRUNC);
        let t4 = theta4(&mut session, TRUNC);
        let t3sq = arithmetic::mul(&t3, &t3);
        let cross = arithmetic::scalar_mul(&Rational::from(2), &arithmetic::mul(&t3, &t4));
        let target = arithmetic::add(&t3sq, &cross);

        let combo = findhomcombo(&target, &[&t3, &t4], 2, 2).unwrap().unwrap();
        // Monomials in lex order: [0,2], [1,1], [2,0]
        assert_eq!(combo.monomials, vec![vec![0, 2], vec![1, 1], vec![2, 0]]);
        assert_eq!(
            combo.coefficients,
            vec![Rational::from(0), Rational::from(2), Rational::from(1)]
        );
    }

    #[test]
    fn test_findnonhomcombo_includes_constant() {
        let mut session = Session::new();
        let p = partition_gf(&mut session, TRUNC);
        // target = 5 + 2p
        let five = Series::constant(p.variable(), Rational::from(5), TRUNC);
        let target = arithmetic::add(&five, &arithmetic::scalar_mul(&Rational::from(2), &p));
        let combo = findnonhomcombo(&target, &[&p], 1, 3).unwrap().unwrap();
        assert_eq!(combo.monomials, vec![vec![0], vec![1]]);
        assert_eq!(combo.coefficients, vec![Rational::from(5), Rational::from(2)]);
    }

    #[test]
    fn test_findlincombomodp() {
        let mut session = Session::new();
        let p_gf = partition_gf(&mut session, TRUNC);
        let d = distinct_parts_gf(&mut session, TRUNC);
        // target = 4p + 6d; mod 7 the coefficients are 4 and 6.
        let target = arithmetic::add(
            &arithmetic::scalar_mul(&Rational::from(4), &p_gf),
            &arithmetic::scalar_mul(&Rational::from(6), &d),
        );
        let combo = findlincombomodp(&target, &[&p_gf, &d], 7, 3)
            .unwrap()
            .unwrap();
        assert_eq!(
            combo.coefficients,
            vec![ModP::new(4, 7), ModP::new(6, 7)]
        );
    }

    #[test]
    fn test_findlincombomodp_retries_degenerate_prime() {
        // The target's denominator is divisible by the requested prime, so
        // the search must fall back to the next prime rather than fail.
        let one = Series::one(0, TRUNC);
        let target = arithmetic::scalar_mul(&Rational::from_i64(1, 7), &one);
        let combo = findlincombomodp(&target, &[&one], 7, 2).unwrap().unwrap();
        assert_eq!(combo.coefficients.len(), 1);
        assert_eq!(combo.coefficients[0].prime(), 11);
        // 1/7 mod 11 is 8.
        assert_eq!(combo.coefficients[0].value(), 8);
    }

    #[test]
    fn test_bad_parameters() {
        let one = Series::one(0, TRUNC);
        assert!(findlincombo(&one, &[&one], -1).is_err());
        assert!(findhomcombo(&one, &[&one], -2, 0).is_err());
        assert!(findlincombomodp(&one, &[&one], 1, 0).is_err());
    }
}
