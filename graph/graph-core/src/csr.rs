//! Compressed sparse row storage for edge weights.

/// A row-major CSR matrix of `f32` edge weights.
///
/// Standard three-array layout: `outer` holds `rows + 1` row pointers,
/// `inner` the column index and `data` the weight of each nonzero.
/// Index arrays are `i32` to match the interop contract with host
/// tooling.
///
/// # Example
///
/// ```
/// use graph_core::Csr;
///
/// let csr = Csr::from_triplets(3, 3, vec![(0, 1, 2.5), (0, 2, 1.0), (1, 2, 0.5)]);
/// assert_eq!(csr.nnz(), 3);
/// assert_eq!(csr.get(0, 2), Some(1.0));
/// assert_eq!(csr.get(2, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Csr {
    rows: usize,
    cols: usize,
    outer: Vec<i32>,
    inner: Vec<i32>,
    data: Vec<f32>,
}

impl Default for Csr {
    fn default() -> Self {
        Self::empty(0, 0)
    }
}

/// Borrowed view of a CSR's arrays, in the layout host tooling maps
/// directly onto its own sparse-matrix types.
///
/// `outer` has length `rows + 1`; `inner` and `data` have length `nnz`.
/// The view stays valid until the graph is next mutated or dropped.
#[derive(Debug, Clone, Copy)]
pub struct CsrView<'a> {
    /// Number of stored nonzeros.
    pub nnz: i32,
    /// Number of rows.
    pub rows: i32,
    /// Number of columns.
    pub cols: i32,
    /// Nonzero values, row by row.
    pub data: &'a [f32],
    /// Row pointers into `inner`/`data`.
    pub outer: &'a [i32],
    /// Column index of each nonzero.
    pub inner: &'a [i32],
}

impl Csr {
    /// Create an empty matrix of the given shape.
    #[must_use]
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            outer: vec![0; rows + 1],
            inner: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build a matrix from (row, col, value) triplets.
    ///
    /// Duplicate (row, col) pairs collapse to the **last** value in
    /// insertion order. Triplets whose row or column fall outside the
    /// shape are ignored.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    // Truncation: graphs beyond i32 rows/nnz are outside the interop contract
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(u32, u32, f32)>) -> Self {
        triplets.retain(|&(r, c, _)| (r as usize) < rows && (c as usize) < cols);
        // Stable sort keeps insertion order within equal keys, so the last
        // element of each duplicate run is the last written
        triplets.sort_by_key(|&(r, c, _)| (r, c));

        let mut merged: Vec<(u32, u32, f32)> = Vec::with_capacity(triplets.len());
        for t in triplets {
            match merged.last_mut() {
                Some(last) if last.0 == t.0 && last.1 == t.1 => last.2 = t.2,
                _ => merged.push(t),
            }
        }

        let mut outer = Vec::with_capacity(rows + 1);
        let mut inner = Vec::with_capacity(merged.len());
        let mut data = Vec::with_capacity(merged.len());

        let mut cursor = 0usize;
        outer.push(0);
        for row in 0..rows {
            while cursor < merged.len() && merged[cursor].0 as usize == row {
                inner.push(merged[cursor].1 as i32);
                data.push(merged[cursor].2);
                cursor += 1;
            }
            outer.push(inner.len() as i32);
        }

        Self {
            rows,
            cols,
            outer,
            inner,
            data,
        }
    }

    /// Number of stored nonzeros.
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The column indices and values of one row.
    ///
    /// Returns empty slices for out-of-range rows.
    #[must_use]
    pub fn row(&self, row: usize) -> (&[i32], &[f32]) {
        if row >= self.rows {
            return (&[], &[]);
        }
        #[allow(clippy::cast_sign_loss)]
        // Sign loss: outer entries are cursor positions, never negative
        let (start, end) = (self.outer[row] as usize, self.outer[row + 1] as usize);
        (&self.inner[start..end], &self.data[start..end])
    }

    /// Look up the value at (row, col).
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<f32> {
        let (cols, vals) = self.row(row as usize);
        #[allow(clippy::cast_possible_wrap)]
        // Wrap: column ids beyond i32 are outside the interop contract
        let target = col as i32;
        cols.binary_search(&target).ok().map(|i| vals[i])
    }

    /// Returns `true` if (row, col) holds a stored value.
    #[inline]
    #[must_use]
    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.get(row, col).is_some()
    }

    /// Enumerate all stored entries as (row, col, value) triplets.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Truncation/sign: rows and columns originate from u32 ids
    pub fn to_triplets(&self) -> Vec<(u32, u32, f32)> {
        let mut triplets = Vec::with_capacity(self.nnz());
        for row in 0..self.rows {
            let (cols, vals) = self.row(row);
            for (&col, &val) in cols.iter().zip(vals) {
                triplets.push((row as u32, col as u32, val));
            }
        }
        triplets
    }

    /// Grow the matrix to a new shape, keeping all stored entries.
    ///
    /// Shrinking below the current shape is a no-op on the affected
    /// dimension.
    pub fn grow(&mut self, rows: usize, cols: usize) {
        if rows > self.rows {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            // Truncation: nnz beyond i32 is outside the interop contract
            let last = self.inner.len() as i32;
            self.outer.resize(rows + 1, last);
            self.rows = rows;
        }
        if cols > self.cols {
            self.cols = cols;
        }
    }

    /// Borrow the raw arrays for export.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    // Truncation: sizes beyond i32 are outside the interop contract
    pub fn view(&self) -> CsrView<'_> {
        CsrView {
            nnz: self.nnz() as i32,
            rows: self.rows as i32,
            cols: self.cols as i32,
            data: &self.data,
            outer: &self.outer,
            inner: &self.inner,
        }
    }
}
