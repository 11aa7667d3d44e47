//! Polynomial relations among a set of series, and independence probing.

use quill_num::Rational;
use quill_rings::ModP;
use quill_series::{Error, Result, Series};

use crate::evidence::Evidence;
use crate::matrix::{
    modular_matrix, modular_null_space, monomial_series, monomials_of_degree,
    monomials_up_to_degree, rational_matrix, rational_null_space, row_count, row_window,
    with_prime_retry,
};

/// The polynomial relations found among a set of series.
///
/// Each entry of `relations` pairs with `monomials` positionally: the relation
/// asserts `sum_j relations[i][j] * prod_k series[k]^{monomials[j][k]} = 0`
/// over the checked window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationSet {
    /// Exponent tuples, lexicographic.
    pub monomials: Vec<Vec<i64>>,
    /// One coefficient vector per independent relation.
    pub relations: Vec<Vec<Rational>>,
    /// How the relations were checked.
    pub evidence: Evidence,
}

impl RelationSet {
    /// True when no relation was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// [`RelationSet`] with coefficients in Z/pZ.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModularRelationSet {
    /// Exponent tuples, lexicographic.
    pub monomials: Vec<Vec<i64>>,
    /// One residue vector per independent relation.
    pub relations: Vec<Vec<ModP>>,
    /// How the relations were checked.
    pub evidence: Evidence,
}

impl ModularRelationSet {
    /// True when no relation was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

fn check_search_params(degree: i64, topshift: i64) -> Result<()> {
    if degree < 0 {
        return Err(Error::MalformedParameter(format!(
            "degree must be nonnegative, got {degree}"
        )));
    }
    if topshift < 0 {
        return Err(Error::MalformedParameter(format!(
            "topshift must be nonnegative, got {topshift}"
        )));
    }
    Ok(())
}

/// Finds homogeneous degree-`degree` polynomial relations among the series.
///
/// An empty [`RelationSet`] means no relation survived the coefficient check.
///
/// # Errors
///
/// `MalformedParameter` for a negative degree or topshift; `DivisionByZero`
/// if a monomial cannot be formed.
pub fn findhom(series: &[&Series], degree: i64, topshift: i64) -> Result<RelationSet> {
    check_search_params(degree, topshift)?;
    let monomials = monomials_of_degree(series.len(), degree);
    relation_set(series, monomials, topshift)
}

/// Finds polynomial relations of total degree at most `degree`, constant
/// monomial included.
///
/// # Errors
///
/// Same as [`findhom`].
pub fn findnonhom(series: &[&Series], degree: i64, topshift: i64) -> Result<RelationSet> {
    check_search_params(degree, topshift)?;
    let monomials = monomials_up_to_degree(series.len(), degree);
    relation_set(series, monomials, topshift)
}

fn relation_set(
    series: &[&Series],
    monomials: Vec<Vec<i64>>,
    topshift: i64,
) -> Result<RelationSet> {
    if monomials.is_empty() {
        return Ok(RelationSet {
            monomials,
            relations: Vec::new(),
            evidence: Evidence::Numeric { terms_checked: 0 },
        });
    }
    let values: Vec<Series> = monomials
        .iter()
        .map(|exps| monomial_series(series, exps))
        .collect::<Result<_>>()?;
    let candidates: Vec<&Series> = values.iter().collect();

    let (start, end) = row_window(&candidates);
    let Some(rows) = row_count(candidates.len(), topshift, start, end) else {
        return Ok(RelationSet {
            monomials,
            relations: Vec::new(),
            evidence: Evidence::Numeric { terms_checked: 0 },
        });
    };
    let matrix = rational_matrix(&candidates, start, rows);
    let relations = rational_null_space(&matrix);
    log::debug!(
        "relation search: {} monomials, {} rows, {} relations",
        monomials.len(),
        rows,
        relations.len()
    );
    Ok(RelationSet {
        monomials,
        relations,
        evidence: Evidence::Numeric { terms_checked: rows },
    })
}

/// [`findhom`] with all arithmetic in Z/pZ.
///
/// When `p` divides a clearing denominator the search retries with the next
/// primes (bounded); the returned residues carry the prime actually used.
///
/// # Errors
///
/// Same as [`findhom`], plus a composite or undersized modulus, or
/// `DivisionByZero` when every retried prime divides a coefficient
/// denominator.
pub fn findhommodp(
    series: &[&Series],
    p: i64,
    degree: i64,
    topshift: i64,
) -> Result<ModularRelationSet> {
    if p < 2 {
        return Err(Error::MalformedParameter(format!(
            "modulus must be a prime >= 2, got {p}"
        )));
    }
    check_search_params(degree, topshift)?;
    let monomials = monomials_of_degree(series.len(), degree);
    if monomials.is_empty() {
        return Ok(ModularRelationSet {
            monomials,
            relations: Vec::new(),
            evidence: Evidence::Numeric { terms_checked: 0 },
        });
    }
    let values: Vec<Series> = monomials
        .iter()
        .map(|exps| monomial_series(series, exps))
        .collect::<Result<_>>()?;
    let candidates: Vec<&Series> = values.iter().collect();

    let (start, end) = row_window(&candidates);
    let Some(rows) = row_count(candidates.len(), topshift, start, end) else {
        return Ok(ModularRelationSet {
            monomials,
            relations: Vec::new(),
            evidence: Evidence::Numeric { terms_checked: 0 },
        });
    };
    let relations = with_prime_retry(p, |q| {
        let matrix = modular_matrix(&candidates, start, rows, q)?;
        Ok(modular_null_space(&matrix, q))
    })?;
    Ok(ModularRelationSet {
        monomials,
        relations,
        evidence: Evidence::Numeric { terms_checked: rows },
    })
}

/// Indices of a maximal linearly independent subset of the series, found as
/// the pivot columns of the row-reduced coefficient matrix.
///
/// # Errors
///
/// `MalformedParameter` for a negative topshift.
pub fn findmaxind(series: &[&Series], topshift: i64) -> Result<Vec<usize>> {
    if topshift < 0 {
        return Err(Error::MalformedParameter(format!(
            "topshift must be nonnegative, got {topshift}"
        )));
    }
    if series.is_empty() {
        return Ok(Vec::new());
    }
    let (start, end) = row_window(series);
    let Some(rows) = row_count(series.len(), topshift, start, end) else {
        return Ok(Vec::new());
    };
    let mut matrix = rational_matrix(series, start, rows);
    Ok(matrix.rref())
}
