/// Rectifier that lets a `slope` fraction of negative inputs through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeakyRelu {
    slope: f32,
}

impl Default for LeakyRelu {
    fn default() -> Self {
        Self { slope: 0.2 }
    }
}

impl LeakyRelu {
    pub fn new(slope: f32) -> Self {
        Self { slope }
    }

    pub fn slope(&self) -> f32 {
        self.slope
    }

    pub fn f(&self, z: f32) -> f32 {
        if z >= 0. { z } else { self.slope * z }
    }
}
