//! Primitive and text styles shared by the instrument renderers. Everything is drawn through
//! `embedded-graphics`, so any `DrawTarget<Color = Rgb888>` works as a target.

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment,
};
use embedded_graphics::text::{Baseline, Text};

use super::surface::Color;

/// Text scale 1 picks the small font, anything larger the big one
pub fn font(scale: i32) -> &'static MonoFont<'static> {
    match scale {
        i32::MIN..=1 => &FONT_6X10,
        _ => &FONT_10X20,
    }
}

pub fn char_width(scale: i32) -> i32 {
    let font = font(scale);
    (font.character_size.width + font.character_spacing) as i32
}

pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * char_width(scale)
}

pub fn text_height(scale: i32) -> i32 {
    font(scale).character_size.height as i32
}

/// Negative sizes collapse to an empty rectangle
pub fn rect(x: i32, y: i32, width: i32, height: i32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width.max(0) as u32, height.max(0) as u32))
}

pub fn fill(color: Color) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyle::with_fill(color.into())
}

pub fn stroke(color: Color) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyle::with_stroke(color.into(), 1)
}

/// Outline growing inwards from the rectangle edge
pub fn border(color: Color, width: i32) -> PrimitiveStyle<Rgb888> {
    PrimitiveStyleBuilder::new()
        .stroke_color(color.into())
        .stroke_width(width.max(0) as u32)
        .stroke_alignment(StrokeAlignment::Inside)
        .build()
}

pub fn line<D>(target: &mut D, from: (i32, i32), to: (i32, i32), color: Color)
where
    D: DrawTarget<Color = Rgb888>,
{
    let line = Line::new(Point::new(from.0, from.1), Point::new(to.0, to.1));
    line.into_styled(stroke(color)).draw(target).ok();
}

/// Draws `text` with its top-left corner at (x, y), returns the advance width
pub fn text<D>(target: &mut D, x: i32, y: i32, text: &str, color: Color, scale: i32) -> i32
where
    D: DrawTarget<Color = Rgb888>,
{
    let style = MonoTextStyle::new(font(scale), Rgb888::from(color));
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target).ok();
    text_width(text, scale)
}

mod test {
    #[test]
    fn test_text() {
        use super::{text, text_height, text_width};
        use crate::osd::surface::{Color, Surface};

        let mut surface = Surface::new(32, 16);
        assert_eq!(text(&mut surface, 0, 0, "-1", Color::WHITE, 1), 12);
        let lit = |x0: i32, x1: i32| {
            (x0..x1).any(|x| (0..16).any(|y| surface.get(x, y) == Some(Color::WHITE)))
        };
        assert!(lit(0, 6));
        assert!(lit(6, 12));
        assert!(!lit(12, 32));
        // nothing below the glyph cell
        assert!((0..32).all(|x| surface.get(x, 12) == Some(Color::BLACK)));
        assert_eq!(text_height(1), 10);
        assert_eq!(text_height(2), 20);
        assert_eq!(text_width("N47°", 2), 40);
    }

    #[test]
    fn test_primitives() {
        use embedded_graphics::prelude::*;

        use super::{border, fill, line, rect};
        use crate::osd::surface::{Color, Surface};

        let mut surface = Surface::new(10, 10);
        rect(2, 2, 5, 4).into_styled(border(Color::GREEN, 1)).draw(&mut surface).ok();
        assert_eq!(surface.get(2, 2), Some(Color::GREEN));
        assert_eq!(surface.get(6, 5), Some(Color::GREEN));
        assert_eq!(surface.get(4, 3), Some(Color::BLACK));
        assert_eq!(surface.get(7, 6), Some(Color::BLACK));

        let mut surface = Surface::new(10, 10);
        line(&mut surface, (0, 0), (9, 9), Color::WHITE);
        assert!((0..10).all(|i| surface.get(i, i) == Some(Color::WHITE)));
        line(&mut surface, (9, 0), (0, 0), Color::GREEN);
        assert!((0..10).all(|i| surface.get(i, 0) == Some(Color::GREEN)));

        // clipped to the surface and empty for negative sizes
        rect(-5, 8, 20, 10).into_styled(fill(Color::GRAY)).draw(&mut surface).ok();
        assert_eq!(surface.get(0, 9), Some(Color::GRAY));
        rect(0, 0, -3, 4).into_styled(fill(Color::GRAY)).draw(&mut surface).ok();
        assert_eq!(surface.get(1, 1), Some(Color::WHITE));
    }
}
