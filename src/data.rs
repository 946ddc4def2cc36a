//! Data
//!
//! Feature matrices and document pools consumed by the importance evaluator.
use crate::errors::InfluenceError;
use crate::utils::validate_len;

/// Contiguous Column Major Matrix data container.
///
/// Rows are documents, columns are features. Values of one feature are stored
/// next to each other, so binarizing a split only touches a single column.
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix.
    ///
    /// * `data` - Column major values, `rows * cols` long.
    /// * `rows` - Number of documents.
    /// * `cols` - Number of features.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix { data, rows, cols }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[j * self.rows + i]
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// Check the backing slice holds exactly `rows * cols` values.
    pub fn validate(&self) -> Result<(), InfluenceError> {
        validate_len("matrix data", self.rows * self.cols, self.data.len())
    }
}

/// A set of documents: features, targets and optional weights.
pub struct Pool<'a> {
    pub data: Matrix<'a, f64>,
    pub target: &'a [f64],
    pub weight: Option<&'a [f64]>,
}

impl<'a> Pool<'a> {
    pub fn new(data: Matrix<'a, f64>, target: &'a [f64], weight: Option<&'a [f64]>) -> Result<Self, InfluenceError> {
        data.validate()?;
        validate_len("target", data.rows, target.len())?;
        if let Some(w) = weight {
            validate_len("weight", data.rows, w.len())?;
        }
        Ok(Pool { data, target, weight })
    }

    /// Number of documents in the pool.
    pub fn doc_count(&self) -> usize {
        self.data.rows
    }

    /// Weight of a document, 1 when the pool is unweighted.
    #[inline]
    pub fn doc_weight(&self, doc: usize) -> f64 {
        match self.weight {
            Some(w) => w[doc],
            None => 1.0,
        }
    }
}
