use ndarray::{Array3, Array4, ArrayView3, ArrayView4, Axis};
use rayon::prelude::*;

use crate::{MlErr, Result};

/// Where the samples of a batch get evaluated.
///
/// Injected into the builders instead of being read from some global context, so that every
/// model carries the device it was built for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// One sample after the other on the calling thread.
    #[default]
    Cpu,
    /// Samples spread over rayon's global thread pool.
    Parallel,
}

impl Device {
    /// Applies `f` to every sample of the batch `x` and stacks the results back together.
    ///
    /// # Arguments
    /// * `x` - A batch shaped `[batch, channels, height, width]`.
    /// * `f` - The per sample computation.
    ///
    /// # Returns
    /// The stacked outputs or the first error produced by `f`.
    pub(crate) fn map_samples<F>(&self, x: ArrayView4<f32>, f: F) -> Result<Array4<f32>>
    where
        F: Fn(ArrayView3<f32>) -> Result<Array3<f32>> + Sync,
    {
        if x.len_of(Axis(0)) == 0 {
            return Err(MlErr::EmptyBatch);
        }

        let samples: Vec<Array3<f32>> = match self {
            Device::Cpu => x.outer_iter().map(&f).collect::<Result<_>>()?,
            Device::Parallel => x.outer_iter().into_par_iter().map(&f).collect::<Result<_>>()?,
        };

        let views: Vec<_> = samples.iter().map(|s| s.view()).collect();
        Ok(ndarray::stack(Axis(0), &views)?)
    }
}
