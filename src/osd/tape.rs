use core::fmt::Write;

use embedded_graphics::prelude::*;
use heapless::String;

use super::style::{self, border, fill};
use super::surface::{Color, Surface};
use crate::types::measurement::normalize_degree;

const TICK_LENGTH: i32 = 10;
const BORDER: i32 = 2;
/// Tape values are pinned into [-VALUE_LIMIT, VALUE_LIMIT]
pub const VALUE_LIMIT: f32 = 1.0e6;

/// Fits any `i32`
pub type Label = String<12>;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaugeSpec {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub orientation: Orientation,
    pub color: Color,
    pub tick_range: i32,
    pub tick_step: i32,
}

impl GaugeSpec {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// A tick mark at `offset` along the gauge axis, in surface coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: i32,
    pub offset: i32,
    pub label: Option<Label>,
}

/// N, E, S, W on the cardinal points, degrees on other multiples of 30
pub fn compass_label(index: i32) -> Option<Label> {
    if index.rem_euclid(30) != 0 {
        return None;
    }
    let mut label = Label::new();
    match index.rem_euclid(360) {
        0 => label.push('N').ok(),
        90 => label.push('E').ok(),
        180 => label.push('S').ok(),
        270 => label.push('W').ok(),
        degree => write!(label, "{}", degree).ok(),
    };
    Some(label)
}

/// Keeps tick and offset arithmetic within `i32`, NaN reads as zero
fn bounded(value: f32) -> f32 {
    match value.is_nan() {
        true => 0.0,
        false => value.clamp(-VALUE_LIMIT, VALUE_LIMIT),
    }
}

fn number(value: i32) -> Label {
    let mut label = Label::new();
    write!(label, "{}", value).ok();
    label
}

/// Stateless scrolling tape
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapeGauge {
    pub background: Color,
    pub scale: i32,
}

impl Default for TapeGauge {
    fn default() -> Self {
        Self { background: Color::GRAY, scale: 1 }
    }
}

impl TapeGauge {
    pub fn readout(value: f32, orientation: Orientation) -> Label {
        let value = bounded(value);
        let mut label = Label::new();
        match orientation {
            Orientation::Vertical => write!(label, "{}", value.trunc() as i32).ok(),
            Orientation::Horizontal => write!(label, "{:03}", normalize_degree(value) as i32).ok(),
        };
        label
    }

    pub fn ticks(value: f32, spec: &GaugeSpec) -> Vec<Tick> {
        let mut ticks = Vec::new();
        if spec.tick_range <= 0 || spec.tick_step <= 0 {
            return ticks;
        }
        let value = bounded(value);
        let (cx, cy) = spec.center();
        let range = spec.tick_range as f32;
        let lower = (value - range).ceil() as i32;
        let upper = (value + range).floor() as i32;
        for index in lower..=upper {
            if index.rem_euclid(spec.tick_step) != 0 {
                continue;
            }
            let delta = index as f32 - value;
            let tick = match spec.orientation {
                Orientation::Vertical => {
                    let offset = cy - (delta * spec.height as f32 / range).round() as i32;
                    if offset <= spec.y || offset >= spec.y + spec.height {
                        continue;
                    }
                    Tick { value: index, offset, label: Some(number(index)) }
                }
                Orientation::Horizontal => {
                    let offset = cx + (delta * spec.width as f32 / range).round() as i32;
                    if offset <= spec.x || offset >= spec.x + spec.width {
                        continue;
                    }
                    Tick { value: index, offset, label: compass_label(index) }
                }
            };
            ticks.push(tick);
        }
        ticks
    }

    pub fn render(&self, surface: &mut Surface, value: f32, spec: &GaugeSpec) {
        let value = bounded(value);
        let (scale, color) = (self.scale, spec.color);
        let text_height = style::text_height(scale);
        let panel = style::rect(spec.x, spec.y, spec.width, spec.height);
        panel.into_styled(fill(self.background)).draw(surface).ok();
        panel.into_styled(border(color, BORDER)).draw(surface).ok();

        for tick in Self::ticks(value, spec).iter() {
            match spec.orientation {
                Orientation::Vertical => {
                    let x = spec.x + BORDER;
                    style::line(surface, (x, tick.offset), (x + TICK_LENGTH, tick.offset), color);
                    if let Some(label) = &tick.label {
                        let (x, y) = (x + TICK_LENGTH + 4, tick.offset - text_height / 2);
                        style::text(surface, x, y, label, color, scale);
                    }
                }
                Orientation::Horizontal => {
                    let y = spec.y + spec.height - BORDER - 1;
                    style::line(surface, (tick.offset, y), (tick.offset, y - TICK_LENGTH), color);
                    if let Some(label) = &tick.label {
                        let x = tick.offset - style::text_width(label, scale) / 2;
                        let y = y - TICK_LENGTH - text_height - 2;
                        style::text(surface, x, y, label, color, scale);
                    }
                }
            }
        }

        let readout = Self::readout(value, spec.orientation);
        let (cx, cy) = spec.center();
        let width = (readout.len() as i32 + 1) * style::char_width(scale);
        let height = text_height + 6;
        let (x, y) = match spec.orientation {
            Orientation::Vertical => (spec.x + spec.width - width - BORDER, cy - height / 2),
            Orientation::Horizontal => (cx - width / 2, spec.y + BORDER),
        };
        let frame = style::rect(x, y, width, height);
        frame.into_styled(fill(Color::BLACK)).draw(surface).ok();
        frame.into_styled(border(color, 1)).draw(surface).ok();
        let text_width = style::text_width(&readout, scale);
        style::text(surface, x + (width - text_width) / 2, y + 3, &readout, color, scale);
    }
}

mod test {
    #[cfg(test)]
    use super::{GaugeSpec, Orientation};

    #[cfg(test)]
    fn spec(orientation: Orientation, tick_range: i32, tick_step: i32) -> GaugeSpec {
        use crate::osd::surface::Color;

        let (width, height) = match orientation {
            Orientation::Vertical => (80, 200),
            Orientation::Horizontal => (600, 60),
        };
        let color = Color::WHITE;
        GaugeSpec { x: 10, y: 20, width, height, orientation, color, tick_range, tick_step }
    }

    #[test]
    fn test_vertical_ticks() {
        use super::{Orientation, TapeGauge};

        let spec = spec(Orientation::Vertical, 20, 5);
        let ticks = TapeGauge::ticks(50.0, &spec);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.value % 5 == 0 && (30..=70).contains(&t.value)));
        assert!(ticks.iter().all(|t| t.offset > spec.y && t.offset < spec.y + spec.height));

        let center = ticks.iter().find(|t| t.value == 50).unwrap();
        assert_eq!(center.offset, spec.y + spec.height / 2);
        assert_eq!(center.label.as_deref(), Some("50"));
        let above = ticks.iter().find(|t| t.value == 55).unwrap();
        assert_eq!(above.offset, center.offset - 50);
        assert_eq!(TapeGauge::readout(50.0, Orientation::Vertical).as_str(), "50");
        assert_eq!(TapeGauge::readout(-3.7, Orientation::Vertical).as_str(), "-3");
    }

    #[test]
    fn test_heading_ticks() {
        use super::{compass_label, Orientation, TapeGauge};

        let spec = spec(Orientation::Horizontal, 60, 10);
        let ticks = TapeGauge::ticks(355.0, &spec);
        assert!(ticks.iter().all(|t| t.value % 10 == 0));
        let north = ticks.iter().find(|t| t.value == 360).unwrap();
        assert_eq!(north.label.as_deref(), Some("N"));
        assert_eq!(north.offset, 310 + 50);
        let labels: Vec<_> = ticks.iter().filter_map(|t| t.label.clone()).collect();
        assert_eq!(labels.iter().map(|l| l.as_str()).collect::<Vec<_>>(), ["330", "N"]);

        assert_eq!(compass_label(450).as_deref(), Some("E"));
        assert_eq!(compass_label(-90).as_deref(), Some("W"));
        assert_eq!(compass_label(180).as_deref(), Some("S"));
        assert_eq!(compass_label(420).as_deref(), Some("60"));
        assert_eq!(compass_label(440), None);
        assert_eq!(TapeGauge::readout(365.0, Orientation::Horizontal).as_str(), "005");
    }

    #[test]
    fn test_render() {
        use super::{Orientation, TapeGauge};
        use crate::osd::surface::{Color, Surface};

        let spec = spec(Orientation::Vertical, 20, 5);
        let gauge = TapeGauge::default();
        let mut surface = Surface::filled(120, 260, Color(1, 2, 3));
        gauge.render(&mut surface, 50.0, &spec);
        assert_eq!(surface.get(10, 20), Some(Color::WHITE));
        assert_eq!(surface.get(89, 219), Some(Color::WHITE));
        assert_eq!(surface.get(90, 120), Some(Color(1, 2, 3)));
        // tick for 55
        assert_eq!(surface.get(spec.x + 4, 70), Some(Color::WHITE));
        assert_eq!(surface.get(spec.x + 4, 71), Some(Color::GRAY));
    }

    #[test]
    fn test_out_of_range_value() {
        use super::{Orientation, TapeGauge, VALUE_LIMIT};
        use crate::osd::surface::{Color, Surface};

        let gauge = TapeGauge::default();
        let values = [1.0e10, -1.0e10, f32::MAX, f32::MIN, f32::INFINITY, f32::NEG_INFINITY];
        for &orientation in &[Orientation::Vertical, Orientation::Horizontal] {
            let spec = spec(orientation, 20, 1);
            for &value in values.iter() {
                let mut surface = Surface::new(640, 260);
                gauge.render(&mut surface, value, &spec);
                assert_eq!(surface.get(spec.x, spec.y), Some(Color::WHITE));
                let ticks = TapeGauge::ticks(value, &spec);
                assert!(!ticks.is_empty());
                let limit = VALUE_LIMIT as i32;
                assert!(ticks.iter().all(|t| (-limit - 20..=limit + 20).contains(&t.value)));
            }
        }
        assert_eq!(TapeGauge::readout(1.0e10, Orientation::Vertical).as_str(), "1000000");
        assert_eq!(TapeGauge::readout(f32::MIN, Orientation::Vertical).as_str(), "-1000000");
        assert_eq!(TapeGauge::readout(f32::NAN, Orientation::Vertical).as_str(), "0");
        assert_eq!(TapeGauge::readout(-1.0e30, Orientation::Horizontal).as_str().len(), 3);
    }

    #[test]
    fn test_degenerate_spec() {
        use super::{Orientation, TapeGauge};

        assert!(TapeGauge::ticks(10.0, &spec(Orientation::Vertical, 0, 5)).is_empty());
        assert!(TapeGauge::ticks(10.0, &spec(Orientation::Vertical, 20, 0)).is_empty());
    }
}
