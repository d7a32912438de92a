//! Sparse input batches.
//!
//! Burn has no sparse matmul primitive, so sparse-flagged layers consume a
//! padded COO encoding of the batch and compute the product as a gather over
//! weight rows followed by a weighted sum.

use burn::tensor::{backend::Backend, Int, Tensor};

/// A sparse batch of row vectors in padded COO form.
///
/// Every row stores up to `nnz` (column index, value) pairs; shorter rows are
/// padded with index 0 and value 0.0, which contributes nothing to the
/// product.
#[derive(Debug, Clone)]
pub struct SparseBatch<B: Backend> {
    /// Flattened column indices, shape [batch * nnz].
    indices: Tensor<B, 1, Int>,
    /// Values, shape [batch, nnz].
    values: Tensor<B, 2>,
    batch: usize,
    nnz: usize,
    dim: usize,
}

impl<B: Backend> SparseBatch<B> {
    /// Builds a sparse batch from per-row `(column, value)` pairs.
    ///
    /// `dim` is the dense width of a row; every column index must be below
    /// it.
    ///
    /// # Panics
    ///
    /// Panics if a column index is out of range.
    pub fn from_rows(rows: &[Vec<(usize, f32)>], dim: usize, device: &B::Device) -> Self {
        let batch = rows.len();
        let nnz = rows.iter().map(|r| r.len()).max().unwrap_or(0).max(1);

        let mut indices = Vec::with_capacity(batch * nnz);
        let mut values = Vec::with_capacity(batch * nnz);
        for row in rows {
            for &(col, val) in row {
                assert!(col < dim, "Column index {} out of range for dim {}", col, dim);
                indices.push(col as i32);
                values.push(val);
            }
            for _ in row.len()..nnz {
                indices.push(0);
                values.push(0.0);
            }
        }

        let indices = Tensor::<B, 1, Int>::from_ints(indices.as_slice(), device);
        let values =
            Tensor::<B, 1>::from_floats(values.as_slice(), device).reshape([batch, nnz]);

        Self {
            indices,
            values,
            batch,
            nnz,
            dim,
        }
    }

    /// Number of rows in the batch.
    pub fn batch_size(&self) -> usize {
        self.batch
    }

    /// Dense width of a row.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Computes the product of this batch with a dense `[dim, dim_out]`
    /// weight matrix, yielding `[batch, dim_out]`.
    ///
    /// Weight rows are gathered by column index and summed with the stored
    /// values as coefficients; padding entries select row 0 with weight 0.
    pub fn matmul(&self, weight: Tensor<B, 2>) -> Tensor<B, 2> {
        let dim_out = weight.dims()[1];
        let rows = weight
            .select(0, self.indices.clone())
            .reshape([self.batch, self.nnz, dim_out]);
        let coeffs = self.values.clone().reshape([self.batch, self.nnz, 1]);
        (rows * coeffs)
            .sum_dim(1)
            .reshape([self.batch, dim_out])
    }

    /// Materializes the batch as a dense tensor. Mostly useful in tests.
    pub fn to_dense(&self) -> Tensor<B, 2> {
        let device = self.values.device();
        let mut identity = vec![0.0f32; self.dim * self.dim];
        for i in 0..self.dim {
            identity[i * self.dim + i] = 1.0;
        }
        let identity =
            Tensor::<B, 1>::from_floats(identity.as_slice(), &device).reshape([self.dim, self.dim]);
        self.matmul(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_sparse_matmul_matches_dense() {
        let device = <TestBackend as Backend>::Device::default();

        // Rows: [0, 2.0, 0, 1.0] and [3.0, 0, 0, 0]
        let rows = vec![vec![(1, 2.0), (3, 1.0)], vec![(0, 3.0)]];
        let sparse = SparseBatch::<TestBackend>::from_rows(&rows, 4, &device);

        let weight = Tensor::<TestBackend, 2>::from_floats(
            [
                [1.0, 0.0],
                [0.0, 1.0],
                [1.0, 1.0],
                [2.0, -1.0],
            ],
            &device,
        );

        let dense = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 2.0, 0.0, 1.0], [3.0, 0.0, 0.0, 0.0]],
            &device,
        );

        let sparse_result: Vec<f32> = sparse.matmul(weight.clone()).to_data().to_vec().unwrap();
        let dense_result: Vec<f32> = dense.matmul(weight).to_data().to_vec().unwrap();

        assert_eq!(sparse_result.len(), dense_result.len());
        for (s, d) in sparse_result.iter().zip(dense_result.iter()) {
            assert!((s - d).abs() < 1e-6, "sparse={}, dense={}", s, d);
        }
    }

    #[test]
    fn test_empty_rows_contribute_nothing() {
        let device = <TestBackend as Backend>::Device::default();

        let rows = vec![vec![], vec![(1, 1.0)]];
        let sparse = SparseBatch::<TestBackend>::from_rows(&rows, 2, &device);

        let weight = Tensor::<TestBackend, 2>::from_floats([[5.0], [7.0]], &device);
        let result: Vec<f32> = sparse.matmul(weight).to_data().to_vec().unwrap();

        assert!((result[0] - 0.0).abs() < 1e-6);
        assert!((result[1] - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_dense() {
        let device = <TestBackend as Backend>::Device::default();

        let rows = vec![vec![(0, 1.5), (2, -2.0)]];
        let sparse = SparseBatch::<TestBackend>::from_rows(&rows, 3, &device);

        let dense: Vec<f32> = sparse.to_dense().to_data().to_vec().unwrap();
        assert_eq!(dense.len(), 3);
        assert!((dense[0] - 1.5).abs() < 1e-6);
        assert!((dense[1] - 0.0).abs() < 1e-6);
        assert!((dense[2] - (-2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_batch_size_and_dim() {
        let device = <TestBackend as Backend>::Device::default();
        let sparse =
            SparseBatch::<TestBackend>::from_rows(&[vec![(0, 1.0)], vec![]], 6, &device);
        assert_eq!(sparse.batch_size(), 2);
        assert_eq!(sparse.dim(), 6);
    }
}
