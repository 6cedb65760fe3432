use core::fmt::Write;

use embedded_graphics::prelude::*;
use heapless::String;

use super::horizon::Horizon;
use super::style::{self, border};
use super::surface::{Color, Surface};
use super::tape::{GaugeSpec, Orientation, TapeGauge};
use crate::config::{Config, PipConfig};
use crate::types::coordinate::Position;
use crate::types::measurement::UnitSystem;
use crate::types::TelemetrySample;

pub type StatusLine = String<64>;

/// Layers camera feeds, horizon, tapes and status text into one output frame
pub struct Compositor {
    width: usize,
    height: usize,
    units: UnitSystem,
    instrument_opacity: f32,
    hud_alpha: f32,
    color: Color,
    text_scale: i32,
    horizon: Horizon,
    anchor: (i32, i32),
    viewport: (i32, i32),
    gauge: TapeGauge,
    airspeed: GaugeSpec,
    altitude: GaugeSpec,
    heading: GaugeSpec,
    pip: PipConfig,
}

impl Compositor {
    pub fn new(config: &Config) -> Self {
        let (width, height) = (config.osd.width, config.osd.height);
        let [x, y] = config.horizon.anchor.unwrap_or([width as i32 / 2, height as i32 / 2]);
        let [w, h] = config.horizon.viewport.unwrap_or([width as i32, height as i32]);
        let color = config.osd.color;
        let tapes = &config.tapes;
        Self {
            width,
            height,
            units: config.osd.units,
            instrument_opacity: config.osd.instrument_opacity,
            hud_alpha: config.osd.hud_alpha,
            color,
            text_scale: config.osd.text_scale,
            horizon: Horizon::from(&config.horizon),
            anchor: (x, y),
            viewport: (w, h),
            gauge: TapeGauge { background: tapes.background, scale: config.osd.text_scale },
            airspeed: tapes.airspeed.spec(Orientation::Vertical, color),
            altitude: tapes.altitude.spec(Orientation::Vertical, color),
            heading: tapes.heading.spec(Orientation::Horizontal, color),
            pip: config.pip,
        }
    }

    /// Flight mode, satellites, battery and camera on the first line,
    /// position and distance from home on the second.
    pub fn status_lines(
        &self,
        sample: &TelemetrySample,
        home: Option<Position>,
    ) -> [StatusLine; 2] {
        let mut first = StatusLine::new();
        let (mode, satellites, camera) = (sample.mode, sample.satellites, sample.camera);
        write!(first, "{} SAT {} {:.1}V CAM {}", mode, satellites, sample.battery, camera).ok();
        let mut second = StatusLine::new();
        write!(second, "{} HOME ", sample.position()).ok();
        match home {
            Some(home) => {
                let distance = self.units.altitude(sample.position().distance(&home) as f32);
                write!(second, "{}{}", distance.round() as i32, self.units.altitude_unit()).ok()
            }
            None => second.push_str("---").ok(),
        };
        [first, second]
    }

    fn camera(&self, main: &Surface, secondary: Option<&Surface>, swap: bool) -> Surface {
        let (primary, inset) = match (secondary, swap) {
            (Some(secondary), true) => (secondary, Some(main)),
            (Some(secondary), false) => (main, Some(secondary)),
            (None, _) => (main, None),
        };
        let mut camera = primary.resize(self.width, self.height);
        if let Some(inset) = inset {
            let (x, y, width, height) = self.pip.rect(self.width, self.height);
            camera.blit(&inset.resize(width, height), x, y);
            let thickness = self.pip.border;
            if thickness > 0 {
                let (w, h) = (width as i32 + 2 * thickness, height as i32 + 2 * thickness);
                let frame = style::rect(x - thickness, y - thickness, w, h);
                let outline = border(self.pip.border_color, thickness);
                frame.into_styled(outline).draw(&mut camera).ok();
            }
        }
        camera
    }

    pub fn compose(
        &self,
        main: &Surface,
        secondary: Option<&Surface>,
        sample: &TelemetrySample,
        swap: bool,
        home: Option<Position>,
    ) -> Surface {
        let mut camera = self.camera(main, secondary, swap);

        let mut scene = camera.clone();
        let (x, y) = self.anchor;
        let (width, height) = self.viewport;
        self.horizon.render(&mut scene, sample.roll, sample.pitch, x, y, width, height);

        let (scale, color) = (self.text_scale, self.color);
        let line_height = style::text_height(scale) + 4;
        let top = self.height as i32 - 2 * line_height;
        for (i, line) in self.status_lines(sample, home).iter().enumerate() {
            style::text(&mut scene, 8, top + i as i32 * line_height, line, color, scale);
        }

        // Unit conversion may overflow a finite reading, the gauge pins it to its range
        let mut instruments = scene.clone();
        let airspeed = self.units.speed(sample.airspeed);
        self.gauge.render(&mut instruments, airspeed, &self.airspeed);
        let altitude = self.units.altitude(sample.altitude);
        self.gauge.render(&mut instruments, altitude, &self.altitude);
        self.gauge.render(&mut instruments, sample.heading, &self.heading);
        let (x, y) = (self.airspeed.x, self.airspeed.y - line_height);
        style::text(&mut instruments, x, y, self.units.speed_unit(), color, scale);
        let (x, y) = (self.altitude.x, self.altitude.y - line_height);
        style::text(&mut instruments, x, y, self.units.altitude_unit(), color, scale);

        scene.blend(&instruments, self.instrument_opacity);
        camera.blend(&scene, self.hud_alpha);
        camera
    }
}

mod test {
    #[cfg(test)]
    const RED: crate::osd::Color = crate::osd::Color(200, 0, 0);
    #[cfg(test)]
    const BLUE: crate::osd::Color = crate::osd::Color(0, 0, 200);

    #[test]
    fn test_swap() {
        use super::Compositor;
        use crate::config::Config;
        use crate::osd::Surface;
        use crate::types::TelemetrySample;

        let compositor = Compositor::new(&Config::default());
        let main = Surface::filled(640, 360, RED);
        let secondary = Surface::filled(320, 240, BLUE);
        let sample = TelemetrySample::default();

        let output = compositor.compose(&main, Some(&secondary), &sample, false, None);
        assert_eq!((output.width(), output.height()), (1280, 720));
        assert_eq!(output.get(740, 380), Some(RED));
        assert_eq!(output.get(1250, 690), Some(BLUE));

        let output = compositor.compose(&main, Some(&secondary), &sample, true, None);
        assert_eq!(output.get(740, 380), Some(BLUE));
        assert_eq!(output.get(1250, 690), Some(RED));

        let output = compositor.compose(&main, None, &sample, true, None);
        assert_eq!(output.get(740, 380), Some(RED));
        assert_eq!(output.get(1250, 690), Some(RED));
    }

    #[test]
    fn test_instrument_opacity() {
        use super::Compositor;
        use crate::config::Config;
        use crate::osd::{Color, Surface};
        use crate::types::TelemetrySample;

        let compositor = Compositor::new(&Config::default());
        let main = Surface::new(1280, 720);
        let output = compositor.compose(&main, None, &TelemetrySample::default(), false, None);
        // inside the airspeed panel, background half blended over black
        assert_eq!(output.get(190, 600), Some(Color(20, 20, 20)));

        let mut config = Config::default();
        config.osd.hud_alpha = 0.0;
        let compositor = Compositor::new(&config);
        let main = Surface::filled(1280, 720, RED);
        let output = compositor.compose(&main, None, &TelemetrySample::default(), false, None);
        assert_eq!(output, main);
    }

    #[test]
    fn test_extreme_readings() {
        use super::Compositor;
        use crate::config::Config;
        use crate::osd::Surface;
        use crate::types::TelemetrySample;

        let compositor = Compositor::new(&Config::default());
        let main = Surface::filled(640, 360, RED);
        for &value in &[1.0e30f32, -1.0e30, 3.0e38, f32::MAX, f32::MIN] {
            let sample = TelemetrySample {
                roll: value,
                pitch: value,
                airspeed: value,
                altitude: value,
                heading: value,
                ..Default::default()
            };
            assert!(sample.is_finite());
            let output = compositor.compose(&main, None, &sample, false, None);
            assert_eq!((output.width(), output.height()), (1280, 720));
        }
    }

    #[test]
    fn test_status_lines() {
        use super::Compositor;
        use crate::config::Config;
        use crate::types::coordinate::Position;
        use crate::types::{FlightMode, TelemetrySample};

        let compositor = Compositor::new(&Config::default());
        let sample = TelemetrySample {
            latitude: 40.33,
            longitude: -8.5456,
            satellites: 9,
            battery: 16.04,
            mode: FlightMode::Angle,
            ..Default::default()
        };
        let [first, second] = compositor.status_lines(&sample, None);
        assert_eq!(first.as_str(), "ANGLE SAT 9 16.0V CAM MAIN");
        assert_eq!(second.as_str(), "N40°19'48.0 W008°32'44.2 HOME ---");

        let home = Position::new(40.33, -8.5456);
        let [_, second] = compositor.status_lines(&sample, Some(home));
        assert!(second.ends_with("HOME 0FT"));
    }
}
