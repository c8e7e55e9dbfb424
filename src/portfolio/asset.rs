//! An asset is what the portfolio tracks a share of.
//! Mostly here for type safety around the display name.

use core::fmt::{self, Debug};
use std::fmt::Display;

/// Display name of a tracked asset, unique within an allocation
#[derive(Clone, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Debug)]
pub struct AssetName(String);

impl From<&str> for AssetName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AssetName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// RGBA color as Chart.js takes it: byte channels plus a unit-interval alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS string form, e.g. `rgba(0, 0, 255, 0.2)`
    #[must_use]
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// Alpha-composited over a white background, the way a browser canvas
    /// shows the translucent slice fills.
    #[must_use]
    pub fn over_white(&self) -> (u8, u8, u8) {
        let blend = |c: u8| -> u8 {
            let c = f32::from(c).mul_add(self.a, 255.0 * (1.0 - self.a));
            c.round().clamp(0.0, 255.0) as u8
        };
        (blend(self.r), blend(self.g), blend(self.b))
    }
}

/// Fill and border colors of one pie slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceColor {
    pub fill: Rgba,
    pub border: Rgba,
}

impl SliceColor {
    /// Chart.js convention for the default mix: a translucent fill and an
    /// opaque border sharing the same channels.
    #[must_use]
    pub const fn translucent(r: u8, g: u8, b: u8) -> Self {
        Self {
            fill: Rgba::new(r, g, b, 0.2),
            border: Rgba::new(r, g, b, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_form() {
        assert_eq!(Rgba::new(128, 0, 128, 0.2).css(), "rgba(128, 0, 128, 0.2)");
        assert_eq!(Rgba::new(0, 0, 255, 1.0).css(), "rgba(0, 0, 255, 1)");
    }

    #[test]
    fn test_over_white() {
        // Fully opaque keeps the channels, fully transparent is white
        assert_eq!(Rgba::new(10, 20, 30, 1.0).over_white(), (10, 20, 30));
        assert_eq!(Rgba::new(10, 20, 30, 0.0).over_white(), (255, 255, 255));
    }
}
