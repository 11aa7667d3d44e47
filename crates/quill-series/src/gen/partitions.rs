//! Partition counting and partition-family generating functions.

use quill_expr::Session;
use quill_num::arith::pentagonal;
use quill_num::{Integer, Rational};

use crate::arithmetic;
use crate::error::{Error, Result};
use crate::series::Series;

use super::{euler_product, step_product};

/// The number of partitions of `n`, by Euler's pentagonal number recurrence.
///
/// Returns 0 for negative `n`.
#[must_use]
pub fn partition_count(n: i64) -> Integer {
    if n < 0 {
        return Integer::new(0);
    }
    let n = n as usize;
    let mut table: Vec<Integer> = Vec::with_capacity(n + 1);
    table.push(Integer::new(1));
    for m in 1..=n as i64 {
        let mut acc = Integer::new(0);
        let mut k = 1;
        loop {
            let g1 = pentagonal(k);
            let g2 = pentagonal(-k);
            if g1 > m && g2 > m {
                break;
            }
            let sign = k % 2 == 1;
            for g in [g1, g2] {
                if g <= m {
                    let prev = &table[(m - g) as usize];
                    acc = if sign { acc + prev } else { acc - prev };
                }
            }
            k += 1;
        }
        table.push(acc);
    }
    table.pop().unwrap_or_else(|| Integer::new(1))
}

/// The partition generating function `1/(q; q)_inf`.
///
/// # Panics
///
/// Panics if `truncation < 1`.
#[must_use]
pub fn partition_gf(session: &mut Session, truncation: i64) -> Series {
    let variable = session.q_symbol();
    let euler = euler_product(variable, truncation);
    // Euler's product has constant term 1, so inversion cannot fail.
    arithmetic::invert(&euler).unwrap_or_else(|_| Series::one(variable, truncation))
}

/// The generating function for partitions into distinct parts,
/// `(-q; q)_inf = prod_{n>=1} (1 + q^n)`.
#[must_use]
pub fn distinct_parts_gf(session: &mut Session, truncation: i64) -> Series {
    let variable = session.q_symbol();
    step_product(&Rational::from(-1), 1, 1, variable, truncation)
}

/// The generating function for partitions into odd parts,
/// `1/(q; q^2)_inf`.
#[must_use]
pub fn odd_parts_gf(session: &mut Session, truncation: i64) -> Series {
    let variable = session.q_symbol();
    let odd = step_product(&Rational::from(1), 1, 2, variable, truncation);
    arithmetic::invert(&odd).unwrap_or_else(|_| Series::one(variable, truncation))
}

/// The generating function for partitions with parts at most `bound`,
/// `1/(q; q)_bound`.
///
/// # Errors
///
/// `MalformedParameter` for a negative bound. A bound of zero gives the
/// constant series 1 (only the empty partition).
pub fn bounded_parts_gf(session: &mut Session, bound: i64, truncation: i64) -> Result<Series> {
    let variable = session.q_symbol();
    if bound < 0 {
        return Err(Error::MalformedParameter(format!(
            "part bound must be nonnegative, got {bound}"
        )));
    }
    let mut result = Series::one(variable, truncation);
    for k in 1..=bound {
        if k >= truncation {
            break;
        }
        let mut factor = Series::one(variable, truncation);
        factor.add_coeff(k, &Rational::from(-1));
        // (1 - q^k) has constant term 1.
        let inv = arithmetic::invert(&factor)?;
        result = arithmetic::mul(&result, &inv);
    }
    Ok(result)
}
