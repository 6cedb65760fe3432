use core::fmt::Write;

use embedded_graphics::prelude::*;
use heapless::String;
use nalgebra::{Rotation2, Vector2};

use super::style::{self, fill};
use super::surface::{Color, Surface};

pub const DEFAULT_PIXELS_PER_DEGREE: f32 = 4.0;
const LADDER_STEP: usize = 10;
// Beyond a half turn the ladder is off any viewport anyway
const PITCH_LIMIT: f32 = 180.0;
const LONG_TICK: i32 = 48; // half length
const SHORT_TICK: i32 = 24;
const WING_SPAN: i32 = 40;
const WING_GAP: i32 = 12;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HorizonMode {
    /// Ladder fills the viewport rectangle and is added onto the picture
    Full,
    /// Ladder is masked into a black instrument face
    Disc { radius: i32 },
}

impl Default for HorizonMode {
    fn default() -> Self {
        Self::Full
    }
}

/// Artificial horizon with pitch ladder, aircraft reference and roll indicator
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Horizon {
    pub mode: HorizonMode,
    pub pixels_per_degree: f32,
    pub line_width: i32,
    pub margin: i32,
    pub color: Color,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            mode: HorizonMode::Full,
            pixels_per_degree: DEFAULT_PIXELS_PER_DEGREE,
            line_width: 2,
            margin: 20,
            color: Color::GREEN,
        }
    }
}

/// Inverse-mapped nearest-neighbour rotation about the buffer center,
/// positive degrees turn the picture counter-clockwise on screen.
pub fn rotate(overlay: &Surface, degrees: f32) -> Surface {
    if degrees == 0.0 {
        return overlay.clone();
    }
    let (width, height) = (overlay.width(), overlay.height());
    let center = Vector2::new((width / 2) as f32, (height / 2) as f32);
    let rotation = Rotation2::new(degrees.to_radians());
    let mut rotated = Surface::new(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let source = rotation * (Vector2::new(x as f32, y as f32) - center) + center;
            if let Some(color) = overlay.get(source.x.round() as i32, source.y.round() as i32) {
                if !color.is_black() {
                    rotated.set(x, y, color);
                }
            }
        }
    }
    rotated
}

impl Horizon {
    pub fn new(mode: HorizonMode, pixels_per_degree: f32, color: Color) -> Self {
        Self { mode, pixels_per_degree, color, ..Default::default() }
    }

    /// Rows the ladder moves up, pitch is clamped to a half turn either way
    pub fn pitch_shift(&self, pitch: f32) -> i32 {
        let pitch = if pitch.is_nan() { 0.0 } else { pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT) };
        (pitch * self.pixels_per_degree).round() as i32
    }

    /// Horizon line and ladder ticks around the buffer center, shifted up by `pitch_shift`
    fn draw_ladder(&self, overlay: &mut Surface, pitch_shift: i32) {
        let (width, height) = (overlay.width() as i32, overlay.height() as i32);
        let (cx, cy) = (width / 2, height / 2);
        let horizon = style::rect(0, cy.saturating_sub(pitch_shift), width, self.line_width);
        horizon.into_styled(fill(self.color)).draw(overlay).ok();

        let label_offset = style::text_height(1) / 2;
        for degree in (-90i32..=90).step_by(LADDER_STEP) {
            if degree == 0 {
                continue;
            }
            let rise = (degree as f32 * self.pixels_per_degree).round() as i32;
            let y = cy.saturating_sub(rise).saturating_sub(pitch_shift);
            if y < 0 || y >= height {
                continue;
            }
            let long = degree % 20 == 0;
            let half = if long { LONG_TICK } else { SHORT_TICK };
            style::line(overlay, (cx - half, y), (cx + half, y), self.color);
            if long {
                let mut label: String<4> = String::new();
                write!(label, "{}", degree.abs()).ok();
                style::text(overlay, cx + half + 4, y - label_offset, &label, self.color, 1);
            }
        }
    }

    fn draw_aircraft(&self, overlay: &mut Surface, cx: i32, cy: i32) {
        style::line(overlay, (cx - WING_SPAN, cy), (cx - WING_GAP, cy), self.color);
        style::line(overlay, (cx + WING_GAP, cy), (cx + WING_SPAN, cy), self.color);
        style::line(overlay, (cx, cy), (cx, cy + WING_GAP / 2), self.color);
    }

    /// Roll indicator column, `sin(roll) * (width / 2 - margin)` off the center
    pub fn roll_tick(&self, roll: f32, width: i32) -> i32 {
        let reach = (width / 2 - self.margin) as f32;
        width / 2 + (roll.to_radians().sin() * reach).round() as i32
    }

    pub fn render(
        &self,
        surface: &mut Surface,
        roll: f32,
        pitch: f32,
        center_x: i32,
        center_y: i32,
        viewport_width: i32,
        viewport_height: i32,
    ) {
        let pitch_shift = self.pitch_shift(pitch);
        match self.mode {
            HorizonMode::Full => {
                let (width, height) = (viewport_width.max(1), viewport_height.max(1));
                let mut overlay = Surface::new(width as usize, height as usize);
                self.draw_ladder(&mut overlay, pitch_shift);
                let mut overlay = rotate(&overlay, -roll);

                let (cx, cy) = (width / 2, height / 2);
                self.draw_aircraft(&mut overlay, cx, cy);
                let (x, top) = (self.roll_tick(roll, width), self.margin / 2);
                style::line(&mut overlay, (x, top), (x, top + self.margin / 2), self.color);

                surface.add(&overlay, center_x - cx, center_y - cy);
            }
            HorizonMode::Disc { radius } => {
                let radius = radius.max(1);
                let side = 3 * radius;
                let mut overlay = Surface::new(side as usize, side as usize);
                self.draw_ladder(&mut overlay, pitch_shift);
                let mut overlay = rotate(&overlay, -roll);

                let c = side / 2;
                self.draw_aircraft(&mut overlay, c, c);
                let reach = (radius - self.margin).max(0) as f32;
                let (sin, cos) = roll.to_radians().sin_cos();
                let (x, y) = (c + (sin * reach).round() as i32, c - (cos * reach).round() as i32);
                let dot = style::rect(x - 1, y - 1, 3, 3);
                dot.into_styled(fill(self.color)).draw(&mut overlay).ok();

                for dy in -radius..=radius {
                    for dx in -radius..=radius {
                        if dx * dx + dy * dy > radius * radius {
                            continue;
                        }
                        if let Some(color) = overlay.get(c + dx, c + dy) {
                            surface.set(center_x + dx, center_y + dy, color);
                        }
                    }
                }
            }
        }
    }
}

mod test {
    #[test]
    fn test_level_horizon_row() {
        use super::Horizon;
        use crate::osd::surface::{Color, Surface};

        let horizon = Horizon::default();
        let mut surface = Surface::new(320, 240);
        horizon.render(&mut surface, 0.0, 5.0, 160, 120, 320, 240);
        let row = 120 - horizon.pitch_shift(5.0);
        assert_eq!(row, 100);
        assert!((0..320).all(|x| surface.get(x, row) == Some(Color::GREEN)));
        assert_eq!(surface.get(0, row - 1), Some(Color::BLACK));
        assert_eq!(surface.get(0, row + horizon.line_width), Some(Color::BLACK));
        // aircraft reference stays centered
        assert_eq!(surface.get(160 - 20, 120), Some(Color::GREEN));
    }

    #[test]
    fn test_rolled_horizon() {
        use super::Horizon;
        use crate::osd::surface::{Color, Surface};

        let horizon = Horizon::default();
        assert_eq!(horizon.roll_tick(30.0, 320), 160 + 70);
        assert_eq!(horizon.roll_tick(-30.0, 320), 160 - 70);
        assert_eq!(horizon.roll_tick(0.0, 320), 160);

        let mut surface = Surface::new(320, 240);
        horizon.render(&mut surface, 30.0, 0.0, 160, 120, 320, 240);
        // roll indicator
        assert_eq!(surface.get(230, 12), Some(Color::GREEN));
        assert_eq!(surface.get(230, 18), Some(Color::GREEN));
        assert_eq!(surface.get(160, 12), Some(Color::BLACK));
        // horizon line drops on the right and rises on the left
        assert_eq!(surface.get(220, 155), Some(Color::GREEN));
        assert_eq!(surface.get(100, 85), Some(Color::GREEN));
        assert_eq!(surface.get(220, 120), Some(Color::BLACK));
        assert_eq!(surface.get(100, 120), Some(Color::BLACK));
        // aircraft reference does not roll
        assert_eq!(surface.get(160 - 20, 120), Some(Color::GREEN));
        assert_eq!(surface.get(160 + 20, 120), Some(Color::GREEN));
    }

    #[test]
    fn test_extreme_pitch() {
        use super::{Horizon, HorizonMode};
        use crate::osd::surface::{Color, Surface};

        let full = Horizon::default();
        let disc = Horizon::new(HorizonMode::Disc { radius: 60 }, 4.0, Color::GREEN);
        for &pitch in &[1.0e30, -1.0e30, f32::MAX, f32::MIN] {
            assert_eq!(full.pitch_shift(pitch).abs(), 720);
            for horizon in [full, disc].iter() {
                let mut surface = Surface::new(320, 240);
                horizon.render(&mut surface, 45.0, pitch, 160, 120, 320, 240);
                assert_eq!(surface.get(160 - 20, 120), Some(Color::GREEN));
            }
        }
    }

    #[test]
    fn test_negative_pitch_moves_down() {
        use super::Horizon;
        use crate::osd::surface::{Color, Surface};

        let horizon = Horizon::default();
        let mut surface = Surface::new(320, 240);
        horizon.render(&mut surface, 0.0, -10.0, 160, 120, 320, 240);
        assert_eq!(surface.get(0, 160), Some(Color::GREEN));
        assert_eq!(surface.get(0, 120), Some(Color::BLACK));
    }

    #[test]
    fn test_viewport_clip() {
        use super::Horizon;
        use crate::osd::surface::{Color, Surface};

        let horizon = Horizon::default();
        let background = Surface::filled(200, 200, Color::GRAY);
        let mut surface = background.clone();
        horizon.render(&mut surface, 25.0, 8.0, 100, 100, 100, 80);
        for y in 0..200 {
            for x in 0..200 {
                if (50..150).contains(&x) && (60..140).contains(&y) {
                    continue;
                }
                assert_eq!(surface.get(x, y), background.get(x, y));
            }
        }
        assert_ne!(surface, background);
    }

    #[test]
    fn test_disc_mask() {
        use super::{Horizon, HorizonMode};
        use crate::osd::surface::{Color, Surface};

        let horizon = Horizon::new(HorizonMode::Disc { radius: 40 }, 4.0, Color::WHITE);
        let background = Surface::filled(160, 160, Color(10, 20, 30));
        for &(roll, pitch) in &[(0.0, 0.0), (30.0, -12.0), (-75.0, 45.0)] {
            let mut surface = background.clone();
            horizon.render(&mut surface, roll, pitch, 80, 80, 160, 160);
            for y in 0..160 {
                for x in 0..160 {
                    let (dx, dy) = (x - 80, y - 80);
                    if dx * dx + dy * dy > 40 * 40 {
                        assert_eq!(surface.get(x, y), background.get(x, y));
                    }
                }
            }
            // face is drawn over black
            assert_eq!(surface.get(80, 80 + 30), Some(Color::BLACK));
        }
    }

    #[test]
    fn test_rotate() {
        use super::rotate;
        use crate::osd::surface::{Color, Surface};

        let mut surface = Surface::new(21, 21);
        crate::osd::style::line(&mut surface, (10, 10), (20, 10), Color::WHITE);
        let rotated = rotate(&surface, 90.0);
        // right arm turns upwards
        assert_eq!(rotated.get(10, 2), Some(Color::WHITE));
        assert_eq!(rotated.get(18, 10), Some(Color::BLACK));
        assert_eq!(rotate(&surface, 0.0), surface);
    }
}
