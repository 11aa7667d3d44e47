//! Dense matrices over an exact field.
//!
//! Row-major storage; the null-space routine is the workhorse behind all of
//! the `find*` relation searches.

use std::ops::{Index, IndexMut};

use quill_rings::Field;

/// A dense matrix over an exact field, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMatrix<F> {
    rows: usize,
    cols: usize,
    data: Vec<F>,
}

impl<F: Field> DenseMatrix<F> {
    /// Builds a matrix from row vectors.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty, or the rows have unequal lengths.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<F>>) -> Self {
        assert!(!rows.is_empty(), "matrix needs at least one row");
        let cols = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "rows must have equal length"
        );
        let nrows = rows.len();
        let data = rows.into_iter().flatten().collect();
        Self {
            rows: nrows,
            cols,
            data,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Reduces the matrix in place to reduced row echelon form.
    ///
    /// Returns the pivot columns in order.
    pub fn rref(&mut self) -> Vec<usize> {
        let mut pivot_cols = Vec::new();
        let mut pivot_row = 0;

        for col in 0..self.cols {
            if pivot_row >= self.rows {
                break;
            }

            // Find a row with a nonzero entry at or below the pivot row.
            let found = (pivot_row..self.rows).find(|&r| !self[(r, col)].is_zero());
            let Some(some_row) = found else {
                continue;
            };

            if some_row != pivot_row {
                self.swap_rows(some_row, pivot_row);
            }

            // Scale the pivot row so the pivot becomes 1.
            let pivot_val = self[(pivot_row, col)].clone();
            if !pivot_val.is_one() {
                for j in 0..self.cols {
                    let v = self[(pivot_row, j)].clone();
                    self[(pivot_row, j)] = v.field_div(&pivot_val);
                }
            }

            // Eliminate every other entry in this column.
            for row in 0..self.rows {
                if row == pivot_row || self[(row, col)].is_zero() {
                    continue;
                }
                let factor = self[(row, col)].clone();
                for j in 0..self.cols {
                    let sub = factor.clone() * self[(pivot_row, j)].clone();
                    let v = self[(row, j)].clone();
                    self[(row, j)] = v - sub;
                }
            }

            pivot_cols.push(col);
            pivot_row += 1;
        }

        pivot_cols
    }

    /// The rank of the matrix.
    #[must_use]
    pub fn rank(&self) -> usize {
        let mut work = self.clone();
        work.rref().len()
    }

    /// Computes a basis of the null space (kernel).
    ///
    /// `zero` and `one` are exemplar field elements; for Z/pZ they carry the
    /// modulus. Returns one basis vector per free column; an empty result
    /// means the kernel is trivial.
    #[must_use]
    pub fn null_space(&self, zero: &F, one: &F) -> Vec<Vec<F>> {
        let mut work = self.clone();
        let pivot_cols = work.rref();

        let is_pivot = {
            let mut flags = vec![false; self.cols];
            for &c in &pivot_cols {
                flags[c] = true;
            }
            flags
        };
        let free_cols: Vec<usize> = (0..self.cols).filter(|&c| !is_pivot[c]).collect();

        if free_cols.is_empty() {
            return Vec::new();
        }

        let mut basis = Vec::with_capacity(free_cols.len());
        for &fc in &free_cols {
            let mut v = vec![zero.clone(); self.cols];
            v[fc] = one.clone();
            // In RREF, row i has its pivot in pivot_cols[i]; the pivot-column
            // entry of the basis vector is the negated coefficient at the
            // free column.
            for (row, &pc) in pivot_cols.iter().enumerate() {
                v[pc] = -work[(row, fc)].clone();
            }
            basis.push(v);
        }

        basis
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }
}

impl<F> Index<(usize, usize)> for DenseMatrix<F> {
    type Output = F;

    fn index(&self, (row, col): (usize, usize)) -> &F {
        &self.data[row * self.cols + col]
    }
}

impl<F> IndexMut<(usize, usize)> for DenseMatrix<F> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut F {
        &mut self.data[row * self.cols + col]
    }
}
