//! Classical Jacobi theta functions as q-series.

use quill_expr::Session;
use quill_num::Rational;

use crate::arithmetic;
use crate::series::Series;

use super::step_product;

/// theta2 expressed in `X = q^{1/4}`:
///
/// `theta2(q) = 2*X * prod_{n>=1} (1 - X^{8n}) (1 + X^{8n})^2`.
///
/// The returned series is in the eighth-root variable so every exponent stays
/// an integer; the caller reads exponent `4k + 1` for the q^{k + 1/4} term.
#[must_use]
pub fn theta2(session: &mut Session, truncation: i64) -> Series {
    let variable = session.q_symbol();
    let minus_one = Rational::from(-1);
    let one = Rational::from(1);
    let even = step_product(&one, 8, 8, variable, truncation);
    let plus = step_product(&minus_one, 8, 8, variable, truncation);
    let prod = arithmetic::mul(&even, &arithmetic::mul(&plus, &plus));
    arithmetic::scalar_mul(&Rational::from(2), &arithmetic::shift(&prod, 1))
        .truncated(truncation)
}

/// theta3(q) = sum_{n in Z} q^{n^2} = (q^2; q^2)_inf (-q; q^2)_inf^2.
#[must_use]
pub fn theta3(session: &mut Session, truncation: i64) -> Series {
    let variable = session.q_symbol();
    let even = step_product(&Rational::from(1), 2, 2, variable, truncation);
    let plus = step_product(&Rational::from(-1), 1, 2, variable, truncation);
    arithmetic::mul(&even, &arithmetic::mul(&plus, &plus))
}

/// theta4(q) = sum_{n in Z} (-1)^n q^{n^2} = (q^2; q^2)_inf (q; q^2)_inf^2.
#[must_use]
pub fn theta4(session: &mut Session, truncation: i64) -> Series {
    let variable = session.q_symbol();
    let even = step_product(&Rational::from(1), 2, 2, variable, truncation);
    let minus = step_product(&Rational::from(1), 1, 2, variable, truncation);
    arithmetic::mul(&even, &arithmetic::mul(&minus, &minus))
}
