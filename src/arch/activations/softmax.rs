use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use super::act_fn::PAR_THRESHOLD;
use crate::scalar::Scalar;

/// Row-wise softmax. Each row is shifted by its largest real part before exponentiating, which
/// leaves the result untouched (the shift cancels out) but keeps `exp` from overflowing.
pub fn forward<T: Scalar>(z: ArrayView2<T>) -> Array2<T> {
    let mut y = Array2::zeros(z.raw_dim());
    let min_rows = rows_per_task(z.ncols());

    y.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(z.axis_iter(Axis(0)))
        .with_min_len(min_rows)
        .for_each(|(y, z)| normalize(y, z));

    y
}

/// Softmax's Jacobian-vector product against the upstream gradient `d`.
///
/// Every output of a row depends on every input of that row, so for each row
/// `g_j = y_j * (d_j - sum_k d_k * y_k)`.
pub fn backward<T: Scalar>(y: ArrayView2<T>, mut d: Array2<T>) -> Array2<T> {
    let min_rows = rows_per_task(y.ncols());

    d.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(y.axis_iter(Axis(0)))
        .with_min_len(min_rows)
        .for_each(|(mut d, y)| {
            let weighted = d.dot(&y);
            d.zip_mut_with(&y, |d, &y| *d = y * (*d - weighted));
        });

    d
}

fn normalize<T: Scalar>(mut y: ArrayViewMut1<T>, z: ArrayView1<T>) {
    let max = z.iter().map(|x| x.re()).fold(f64::NEG_INFINITY, f64::max);
    let shift = T::from_f64(max);

    y.zip_mut_with(&z, |y, &z| *y = (z - shift).exp());
    let sum = y.sum();
    y.mapv_inplace(|e| e / sum);
}

/// Small batches stay on a single task.
fn rows_per_task(ncols: usize) -> usize {
    (PAR_THRESHOLD / ncols.max(1)).max(1)
}
