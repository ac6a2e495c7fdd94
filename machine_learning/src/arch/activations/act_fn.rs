use super::{LeakyRelu, Sigmoid, Tanh};

/// An elementwise nonlinearity applied after a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActFn {
    LeakyRelu(LeakyRelu),
    Tanh(Tanh),
    Sigmoid(Sigmoid),
}

impl ActFn {
    pub fn leaky_relu(slope: f32) -> Self {
        Self::LeakyRelu(LeakyRelu::new(slope))
    }

    pub fn tanh() -> Self {
        Self::Tanh(Tanh::new())
    }

    pub fn sigmoid(amp: f32) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            Self::LeakyRelu(a) => a.f(x),
            Self::Tanh(a) => a.f(x),
            Self::Sigmoid(a) => a.f(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaky_relu_keeps_a_fraction_of_negatives() {
        let act_fn = ActFn::leaky_relu(0.2);

        assert_eq!(act_fn.f(3.0), 3.0);
        assert_eq!(act_fn.f(0.0), 0.0);
        assert!((act_fn.f(-5.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn tanh_is_bounded_and_symmetric() {
        let act_fn = ActFn::tanh();

        assert_eq!(act_fn.f(0.0), 0.0);
        assert!((act_fn.f(2.0) + act_fn.f(-2.0)).abs() < 1e-6);
        assert!(act_fn.f(50.0) <= 1.0);
        assert!(act_fn.f(-50.0) >= -1.0);
    }

    #[test]
    fn sigmoid_is_bounded_by_amp() {
        let act_fn = ActFn::sigmoid(2.0);

        assert!((act_fn.f(0.0) - 1.0).abs() < 1e-6);
        assert!(act_fn.f(50.0) <= 2.0);
        assert!(act_fn.f(-50.0) >= 0.0);
    }
}
