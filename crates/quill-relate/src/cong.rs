//! Partition-style congruence search over arithmetic progressions.

use rayon::prelude::*;

use quill_num::Integer;
use quill_series::gen::sift;
use quill_series::{Error, Result, Series};

/// A congruence `coeff(modulus * n + residue) = 0 mod prime` holding for
/// every coefficient below the truncation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Congruence {
    /// The progression step.
    pub modulus: i64,
    /// The progression offset, in `0..modulus`.
    pub residue: i64,
    /// The prime dividing every checked coefficient.
    pub prime: i64,
}

/// Sifts `f` along every residue class of every listed modulus and reports
/// the classes whose coefficients are all divisible by one of the listed
/// primes. Composite list entries still act as progression steps; only the
/// prime entries are tried as divisors.
///
/// Classes the truncation cannot certify, and classes that vanish entirely,
/// are skipped. Results are sorted by (modulus, residue, prime).
///
/// # Errors
///
/// `MalformedParameter` when the list is empty or contains an entry below 2.
pub fn findcong(f: &Series, moduli: &[i64]) -> Result<Vec<Congruence>> {
    if moduli.is_empty() {
        return Err(Error::MalformedParameter(
            "findcong needs at least one modulus".into(),
        ));
    }
    if let Some(&bad) = moduli.iter().find(|&&m| m < 2) {
        return Err(Error::MalformedParameter(format!(
            "findcong moduli must be at least 2, got {bad}"
        )));
    }
    let primes: Vec<i64> = moduli.iter().copied().filter(|&p| is_prime(p)).collect();

    let classes: Vec<(i64, i64)> = moduli
        .iter()
        .flat_map(|&m| (0..m).map(move |r| (m, r)))
        .collect();
    log::debug!(
        "findcong: {} residue classes, {} candidate primes",
        classes.len(),
        primes.len()
    );

    let mut found: Vec<Congruence> = classes
        .par_iter()
        .flat_map_iter(|&(modulus, residue)| {
            let sifted = sift(f, modulus, residue).ok();
            let hits: Vec<Congruence> = match sifted {
                Some(s) if s.iter().next().is_some() => primes
                    .iter()
                    .filter(|&&prime| divides_all(&s, prime))
                    .map(|&prime| Congruence {
                        modulus,
                        residue,
                        prime,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            hits.into_iter()
        })
        .collect();
    found.sort_unstable();
    Ok(found)
}

/// True when every stored coefficient is an integer multiple of p.
fn divides_all(s: &Series, p: i64) -> bool {
    let p_int = Integer::new(p);
    s.iter().all(|(_, c)| {
        c.numerator().divisible_by(&p_int) && !c.denominator().divisible_by(&p_int)
    })
}

fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}
