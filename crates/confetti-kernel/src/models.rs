//! Palette models: colors, sizes and shapes a particle can be spawned with.

use confetti_common::{ConfettiError, ConfettiResult};
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Packed ARGB color.
///
/// Serialises as a `#RRGGBB` or `#AARRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    /// Opaque red.
    pub const RED: Self = Self(0xFFFF_0000);
    /// Opaque green.
    pub const GREEN: Self = Self(0xFF00_FF00);
    /// Opaque blue.
    pub const BLUE: Self = Self(0xFF00_00FF);
    /// Opaque yellow.
    pub const YELLOW: Self = Self(0xFFFF_FF00);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self(0xFFFF_00FF);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Builds an opaque color from its channels.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    /// Builds a color from its channels.
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Normalised RGBA, handy for GPU-side hosts.
    #[must_use]
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            f32::from(self.red()) / 255.0,
            f32::from(self.green()) / 255.0,
            f32::from(self.blue()) / 255.0,
            f32::from(self.alpha()) / 255.0,
        ]
    }

    /// Parses `#RRGGBB` or `#AARRGGBB` (the `#` is optional).
    pub fn from_hex(text: &str) -> ConfettiResult<Self> {
        let digits = text.trim().trim_start_matches('#');
        let value = u32::from_str_radix(digits, 16)
            .map_err(|e| ConfettiError::invalid("color", format!("{text:?}: {e}")))?;
        match digits.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(ConfettiError::invalid(
                "color",
                format!("{text:?} must have 6 or 8 hex digits"),
            )),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfettiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        format!("#{:08X}", color.0)
    }
}

/// Particle dimensions and the mass gravity is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Edge length (or diameter) in surface units.
    pub size: f32,
    /// Mass; heavier particles accelerate more slowly.
    #[serde(default = "Size::default_mass")]
    pub mass: f32,
}

impl Default for Size {
    fn default() -> Self {
        Self::SMALL
    }
}

impl Size {
    /// 6 units.
    pub const SMALL: Self = Self {
        size: 6.0,
        mass: 5.0,
    };
    /// 8 units.
    pub const MEDIUM: Self = Self {
        size: 8.0,
        mass: 5.0,
    };
    /// 10 units.
    pub const LARGE: Self = Self {
        size: 10.0,
        mass: 5.0,
    };

    const fn default_mass() -> f32 {
        5.0
    }

    /// Creates a size, rejecting non-positive or non-finite values.
    pub fn new(size: f32, mass: f32) -> ConfettiResult<Self> {
        let this = Self { size, mass };
        this.validate()?;
        Ok(this)
    }

    /// Checks that both size and mass are positive and finite.
    pub fn validate(&self) -> ConfettiResult<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfettiError::invalid(
                "sizes",
                format!("size {} must be positive", self.size),
            ));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfettiError::invalid(
                "sizes",
                format!("mass {} must be positive", self.mass),
            ));
        }
        Ok(())
    }
}

/// Outline a particle is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Rectangle / square.
    #[default]
    Rect,
    /// Circle.
    Circle,
}

/// The color, size and shape sets particles are drawn from.
///
/// Every set is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    sizes: Vec<Size>,
    shapes: Vec<Shape>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![Color::RED],
            sizes: vec![Size::SMALL],
            shapes: vec![Shape::Rect],
        }
    }
}

impl Palette {
    /// Builds a palette, validating every set.
    pub fn new(
        colors: impl IntoIterator<Item = Color>,
        sizes: impl IntoIterator<Item = Size>,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> ConfettiResult<Self> {
        let mut palette = Self::default();
        palette.set_colors(colors)?;
        palette.set_sizes(sizes)?;
        palette.set_shapes(shapes)?;
        Ok(palette)
    }

    /// Replaces the color set.
    pub fn set_colors(&mut self, colors: impl IntoIterator<Item = Color>) -> ConfettiResult<()> {
        self.colors = non_empty("colors", colors)?;
        Ok(())
    }

    /// Replaces the size set.
    pub fn set_sizes(&mut self, sizes: impl IntoIterator<Item = Size>) -> ConfettiResult<()> {
        let sizes = non_empty("sizes", sizes)?;
        sizes.iter().try_for_each(Size::validate)?;
        self.sizes = sizes;
        Ok(())
    }

    /// Replaces the shape set.
    pub fn set_shapes(&mut self, shapes: impl IntoIterator<Item = Shape>) -> ConfettiResult<()> {
        self.shapes = non_empty("shapes", shapes)?;
        Ok(())
    }

    /// Configured colors.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Configured sizes.
    #[must_use]
    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    /// Configured shapes.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Picks one color, size and shape, each independently and uniformly.
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> (Color, Size, Shape) {
        (
            self.colors[rng.next_index(self.colors.len())],
            self.sizes[rng.next_index(self.sizes.len())],
            self.shapes[rng.next_index(self.shapes.len())],
        )
    }
}

fn non_empty<T>(field: &'static str, values: impl IntoIterator<Item = T>) -> ConfettiResult<Vec<T>> {
    let values: Vec<T> = values.into_iter().collect();
    if values.is_empty() {
        Err(ConfettiError::invalid(field, "at least one value is required"))
    } else {
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceSource;

    #[test]
    fn test_color_channels() {
        let color = Color::from_argb(0x80, 0x12, 0x34, 0x56);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0x12);
        assert_eq!(color.green(), 0x34);
        assert_eq!(color.blue(), 0x56);
        assert_eq!(Color::from_rgb(255, 0, 0), Color::RED);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Ok(Color::RED));
        assert_eq!(Color::from_hex("80FFFFFF"), Ok(Color(0x80FF_FFFF)));
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert_eq!(String::from(Color::BLUE), "#FF0000FF");
    }

    #[test]
    fn test_color_rgba_f32() {
        let rgba = Color::RED.to_rgba_f32();
        assert!((rgba[0] - 1.0).abs() < f32::EPSILON);
        assert!(rgba[1].abs() < f32::EPSILON);
        assert!((rgba[3] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_size_validation() {
        assert!(Size::new(4.0, 1.0).is_ok());
        assert!(Size::new(0.0, 1.0).is_err());
        assert!(Size::new(4.0, 0.0).is_err());
        assert!(Size::new(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_palette_defaults() {
        let palette = Palette::default();
        assert_eq!(palette.colors(), &[Color::RED]);
        assert_eq!(palette.sizes(), &[Size::SMALL]);
        assert_eq!(palette.shapes(), &[Shape::Rect]);
    }

    #[test]
    fn test_empty_palette_rejected_and_unchanged() {
        let mut palette = Palette::default();
        let err = palette.set_colors(Vec::new()).expect_err("empty colors");
        assert!(matches!(
            err,
            ConfettiError::InvalidConfiguration { field: "colors", .. }
        ));
        assert_eq!(palette.colors(), &[Color::RED]);
        assert!(palette.set_shapes([]).is_err());
        assert!(palette.set_sizes([Size { size: 1.0, mass: -1.0 }]).is_err());
        assert_eq!(palette.sizes(), &[Size::SMALL]);
    }

    #[test]
    fn test_pick_draws_each_set_independently() {
        let palette = Palette::new(
            [Color::RED, Color::GREEN],
            [Size::SMALL, Size::LARGE],
            [Shape::Rect, Shape::Circle],
        )
        .expect("valid palette");
        let mut rng = SequenceSource::new([0.9, 0.1, 0.9]);
        assert_eq!(palette.pick(&mut rng), (Color::GREEN, Size::SMALL, Shape::Circle));
    }
}
