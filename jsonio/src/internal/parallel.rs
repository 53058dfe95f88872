use crate::prelude::*;
use rayon::prelude::*;

/// Arrays shorter than this are combined on the calling thread.
pub const PARALLEL_MIN_LEN: usize = 4096;

#[inline(always)]
pub fn parallel<A: Send, B: Send>(
    a: impl FnOnce() -> A + Send,
    b: impl FnOnce() -> B + Send,
    options: &impl CombineOptions) -> (A, B) {
    if options.parallel() {
        rayon::join(a, b)
    } else {
        (a(), b())
    }
}

/// Maps pairs of equally long slices, in parallel for long slices when `parallel` is set.
pub fn zip_map<A: Sync, B: Sync, R: Send>(xs: &[A], ys: &[B], parallel: bool, f: impl Fn(&A, &B) -> R + Sync + Send) -> Vec<R> {
    debug_assert_eq!(xs.len(), ys.len());
    if parallel && xs.len() >= PARALLEL_MIN_LEN {
        xs.par_iter().zip(ys).map(|(x, y)| f(x, y)).collect()
    } else {
        xs.iter().zip(ys).map(|(x, y)| f(x, y)).collect()
    }
}

/// Like [`zip_map`], for a fallible `f` that also wants the index. The first error in
/// index order wins when run sequentially; in parallel it is one of the errors.
pub fn try_zip_map<A: Sync, B: Sync, R: Send, E: Send>(
    xs: &[A],
    ys: &[B],
    parallel: bool,
    f: impl Fn(usize, &A, &B) -> Result<R, E> + Sync + Send,
) -> Result<Vec<R>, E> {
    debug_assert_eq!(xs.len(), ys.len());
    if parallel && xs.len() >= PARALLEL_MIN_LEN {
        xs.par_iter().zip(ys).enumerate().map(|(i, (x, y))| f(i, x, y)).collect()
    } else {
        xs.iter().zip(ys).enumerate().map(|(i, (x, y))| f(i, x, y)).collect()
    }
}
