use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const GRAY: Self = Self(40, 40, 40);

    pub fn saturating_add(self, other: Self) -> Self {
        let Self(r, g, b) = self;
        Self(r.saturating_add(other.0), g.saturating_add(other.1), b.saturating_add(other.2))
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

impl From<[u8; 3]> for Color {
    fn from(rgb: [u8; 3]) -> Self {
        Self(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        [color.0, color.1, color.2]
    }
}

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        Rgb888::new(color.0, color.1, color.2)
    }
}

impl From<Rgb888> for Color {
    fn from(color: Rgb888) -> Self {
        Self(color.r(), color.g(), color.b())
    }
}

/// Packed RGB888 frame, row-major
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u8; width * height * 3] }
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        let mut surface = Self::new(width, height);
        for pixel in surface.pixels.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[color.0, color.1, color.2]);
        }
        surface
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 3)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.index(x, y)?;
        Some(Color(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Out of bound pixels are silently clipped
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + 3].copy_from_slice(&[color.0, color.1, color.2]);
        }
    }

    /// Nearest-neighbour resample
    pub fn resize(&self, width: usize, height: usize) -> Surface {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut resized = Surface::new(width, height);
        if self.width == 0 || self.height == 0 {
            return resized;
        }
        for y in 0..height {
            let sy = y * self.height / height;
            for x in 0..width {
                let sx = x * self.width / width;
                let (s, d) = ((sy * self.width + sx) * 3, (y * width + x) * 3);
                resized.pixels[d..d + 3].copy_from_slice(&self.pixels[s..s + 3]);
            }
        }
        resized
    }

    fn merge(&mut self, src: &Surface, x: i32, y: i32, f: impl Fn(Color, Color) -> Color) {
        for sy in 0..src.height as i32 {
            for sx in 0..src.width as i32 {
                let (dx, dy) = (x + sx, y + sy);
                if let (Some(dst), Some(color)) = (self.get(dx, dy), src.get(sx, sy)) {
                    self.set(dx, dy, f(dst, color));
                }
            }
        }
    }

    /// Copies `src` with its top-left corner at (x, y)
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) {
        self.merge(src, x, y, |_, color| color)
    }

    /// Saturating additive merge, black in `src` leaves the target untouched
    pub fn add(&mut self, src: &Surface, x: i32, y: i32) {
        self.merge(src, x, y, |dst, color| dst.saturating_add(color))
    }

    /// `self = overlay * alpha + self * (1 - alpha)` over the common area
    pub fn blend(&mut self, overlay: &Surface, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let width = self.width.min(overlay.width);
        for y in 0..self.height.min(overlay.height) {
            let (d, o) = (y * self.width * 3, y * overlay.width * 3);
            let dst = &mut self.pixels[d..d + width * 3];
            for (dst, src) in dst.iter_mut().zip(&overlay.pixels[o..o + width * 3]) {
                let value = *src as f32 * alpha + *dst as f32 * (1.0 - alpha);
                *dst = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Surface {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.into());
        }
        Ok(())
    }
}

mod test {
    #[test]
    fn test_set_and_clip() {
        use super::{Color, Surface};

        let mut surface = Surface::new(4, 3);
        surface.set(1, 2, Color::WHITE);
        surface.set(-1, 0, Color::WHITE);
        surface.set(4, 0, Color::WHITE);
        assert_eq!(surface.get(1, 2), Some(Color::WHITE));
        assert_eq!(surface.get(4, 0), None);
        assert_eq!(surface.as_bytes().iter().filter(|&&b| b != 0).count(), 3);
    }

    #[test]
    fn test_resize() {
        use super::{Color, Surface};

        let mut surface = Surface::new(2, 2);
        surface.set(1, 1, Color::WHITE);
        let resized = surface.resize(4, 4);
        assert_eq!(resized.get(0, 0), Some(Color::BLACK));
        assert_eq!(resized.get(2, 2), Some(Color::WHITE));
        assert_eq!(resized.get(3, 3), Some(Color::WHITE));
        assert_eq!(resized.get(1, 2), Some(Color::BLACK));
    }

    #[test]
    fn test_add_and_blend() {
        use super::{Color, Surface};

        let mut base = Surface::filled(2, 1, Color(200, 10, 0));
        let overlay = Surface::filled(1, 1, Color(100, 10, 0));
        base.add(&overlay, 1, 0);
        assert_eq!(base.get(0, 0), Some(Color(200, 10, 0)));
        assert_eq!(base.get(1, 0), Some(Color(255, 20, 0)));

        let mut base = Surface::filled(2, 2, Color(0, 0, 0));
        base.blend(&Surface::filled(2, 2, Color(200, 100, 50)), 0.5);
        assert_eq!(base.get(1, 1), Some(Color(100, 50, 25)));
        base.blend(&Surface::filled(2, 2, Color::WHITE), 0.0);
        assert_eq!(base.get(0, 0), Some(Color(100, 50, 25)));
    }

    #[test]
    fn test_color_deserialize() {
        use embedded_graphics::pixelcolor::Rgb888;

        use super::Color;

        let color: Color = serde_json::from_str("[0, 255, 16]").unwrap();
        assert_eq!(color, Color(0, 255, 16));
        assert_eq!(Color::from(Rgb888::from(color)), color);
    }
}
