use crate::Result;

/// A model evaluated against a flat slice of externally owned parameters.
pub trait Model {
    /// Input type consumed by the model.
    type Input<'a>;

    /// Output type produced by the model.
    type Output;

    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Makes a forward pass through the model.
    ///
    /// # Arguments
    /// * `params` - The model's parameters, exactly `size()` of them.
    /// * `x` - The input batch.
    ///
    /// # Returns
    /// The output for the given batch or an error if the shapes don't line up.
    fn forward(&self, params: &[f32], x: Self::Input<'_>) -> Result<Self::Output>;
}
