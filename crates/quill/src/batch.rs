//! Parallel batch evaluation of generators.
//!
//! A parameter scan is an embarrassingly parallel map: every evaluation is
//! independent and returns a fresh value. Each worker gets its own
//! [`Session`] (sessions have a single logical writer), and results come back
//! in input order regardless of completion order. Sessions intern symbols
//! deterministically, so every result series carries the same q symbol.

use quill_expr::Session;
use quill_series::{Result, Series};
use rayon::prelude::*;

/// Evaluates `generator` over every parameter tuple in parallel.
///
/// Per-tuple failures stay in their slot; one bad tuple does not poison the
/// rest of the scan.
pub fn batch_scan<P, F>(params: &[P], generator: F) -> Vec<Result<Series>>
where
    P: Sync,
    F: Fn(&mut Session, &P) -> Result<Series> + Sync,
{
    params
        .par_iter()
        .map(|p| {
            let mut session = Session::new();
            generator(&mut session, p)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_series::gen::etaq;

    const TRUNC: i64 = 30;

    #[test]
    fn test_batch_matches_sequential() {
        let params: Vec<(i64, i64)> = vec![(1, 1), (2, 2), (1, 5), (4, 5), (3, 3)];
        let batched = batch_scan(&params, |session, &(b, t)| etaq(session, b, t, TRUNC));

        let mut session = Session::new();
        for (&(b, t), result) in params.iter().zip(&batched) {
            let expected = etaq(&mut session, b, t, TRUNC).unwrap();
            assert_eq!(result.as_ref().unwrap(), &expected);
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        // Heavier truncations first, so completion order differs from input
        // order under any scheduling.
        let params: Vec<i64> = vec![200, 5, 120, 10];
        let results = batch_scan(&params, |session, &t| etaq(session, 1, 1, t));
        for (&t, result) in params.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap().truncation(), t);
        }
    }

    #[test]
    fn test_bad_tuple_stays_in_slot() {
        // t = 0 is malformed; its neighbors still evaluate.
        let params: Vec<(i64, i64)> = vec![(1, 1), (1, 0), (2, 2)];
        let results = batch_scan(&params, |session, &(b, t)| etaq(session, b, t, TRUNC));
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
