//! Data-parallel helpers that fall back to sequential iteration when the
//! `parallel` feature is off.

/// Map `$f` over the elements of `$items` and collect in input order.
///
/// The target is inferred from the call site, so collecting into
/// `Result<Vec<_>, _>` stops at the first error.
macro_rules! par_map {
    ($items:expr, $f:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            $items.par_iter().map($f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            $items.iter().map($f).collect()
        }
    }};
}
