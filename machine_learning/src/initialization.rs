use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    Result,
    arch::{Model, Sequential, layers::Layer},
};

const WEIGHTS_MEAN: f32 = 0.0;
const SCALES_MEAN: f32 = 1.0;
const STD_DEV: f32 = 0.02;

/// Generates a fresh set of parameters for `model` following the DCGAN initialization: every
/// (transposed) convolution weight is sampled from `N(0, 0.02)` and every batch normalization
/// scale from `N(1, 0.02)`, biases and shifts start at zero.
///
/// # Arguments
/// * `model` - The model the parameters are generated for.
/// * `rng` - A random number generator.
///
/// # Returns
/// A vec of exactly `model.size()` parameters, laid out in the order the model reads them.
pub fn initialize_weights<R: Rng + ?Sized>(model: &Sequential, rng: &mut R) -> Result<Vec<f32>> {
    let weights = Normal::new(WEIGHTS_MEAN, STD_DEV)?;
    let scales = Normal::new(SCALES_MEAN, STD_DEV)?;

    fn push_zeros(params: &mut Vec<f32>, n: usize) {
        params.resize(params.len() + n, 0.0);
    }

    let mut params = Vec::with_capacity(model.size());

    for layer in model.layers() {
        match layer {
            Layer::Conv(l) => {
                params.extend(weights.sample_iter(&mut *rng).take(l.weights_size()));
                push_zeros(&mut params, l.bias_size());
            }
            Layer::ConvTranspose(l) => {
                params.extend(weights.sample_iter(&mut *rng).take(l.weights_size()));
                push_zeros(&mut params, l.bias_size());
            }
            Layer::BatchNorm(l) => {
                params.extend(scales.sample_iter(&mut *rng).take(l.channels()));
                push_zeros(&mut params, l.channels());
            }
            Layer::Act(_) => {}
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Device, LayerSpec};
    use rand::{SeedableRng, rngs::StdRng};

    fn model() -> Sequential {
        Sequential::new(
            [
                LayerSpec::up((4, 8), 1, 0).with_bias(false).with_norm(true),
                LayerSpec::up((8, 3), 2, 1),
            ],
            Device::Cpu,
        )
    }

    #[test]
    fn generates_one_param_per_slot() {
        let model = model();
        let params = initialize_weights(&model, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(params.len(), model.size());
    }

    #[test]
    fn follows_the_layout_of_the_layers() {
        let model = model();
        let params = initialize_weights(&model, &mut StdRng::seed_from_u64(42)).unwrap();

        let (stem, rest) = params.split_at(4 * 8 * 16);
        let (scales, rest) = rest.split_at(8);
        let (shifts, rest) = rest.split_at(8);
        let (last, biases) = rest.split_at(8 * 3 * 16);

        assert!(stem.iter().all(|w| w.abs() < 0.2));
        assert!(scales.iter().all(|s| (s - 1.0).abs() < 0.2));
        assert!(shifts.iter().all(|&s| s == 0.0));
        assert!(last.iter().any(|&w| w != 0.0));
        assert_eq!(biases.len(), 3);
        assert!(biases.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn same_seed_same_params() {
        let model = model();
        let a = initialize_weights(&model, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = initialize_weights(&model, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(a, b);
    }
}
