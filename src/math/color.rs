use cgmath::BaseFloat;

/// A RGBA `Color`. Each color component is a floating point value
/// with a range from 0 to 1.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color<S> {
    pub r: S,
    pub g: S,
    pub b: S,
    pub a: S,
}

impl<S: BaseFloat> Color<S> {
    pub fn new(r: S, g: S, b: S, a: S) -> Self {
        Color { r, g, b, a }
    }

    pub fn rgba(&self) -> [S; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl<S: BaseFloat> Color<S> {
    /// The dark gray used to clear the screen by default.
    pub fn charcoal() -> Self {
        let two = S::one() + S::one();
        let quarter = S::one() / (two * two);
        Color::new(quarter, quarter, quarter, S::one())
    }

    pub fn red() -> Self {
        Color::new(S::one(), S::zero(), S::zero(), S::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charcoal() {
        assert_eq!(Color::<f32>::charcoal().rgba(), [0.25, 0.25, 0.25, 1.0]);
    }
}
