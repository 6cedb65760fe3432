use super::{ensure, Error};
use crate::osd::surface::Color;
use crate::osd::tape::{GaugeSpec, Orientation};

/// Panel geometry in output pixels, every key required once the block is present
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TapeConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub tick_range: i32,
    pub tick_step: i32,
}

impl TapeConfig {
    pub fn airspeed() -> Self {
        Self { x: 50, y: 50, width: 150, height: 620, tick_range: 20, tick_step: 5 }
    }

    pub fn altitude() -> Self {
        Self { x: 1080, y: 50, width: 150, height: 620, tick_range: 200, tick_step: 50 }
    }

    pub fn heading() -> Self {
        Self { x: 250, y: 25, width: 780, height: 75, tick_range: 60, tick_step: 10 }
    }

    pub fn spec(&self, orientation: Orientation, color: Color) -> GaugeSpec {
        let Self { x, y, width, height, tick_range, tick_step } = *self;
        GaugeSpec { x, y, width, height, orientation, color, tick_range, tick_step }
    }

    fn validate(&self) -> Result<(), Error> {
        ensure(self.width > 0 && self.height > 0, "tape width and height must be positive")?;
        ensure(self.tick_range > 0, "tape tick-range must be positive")?;
        ensure(self.tick_step > 0, "tape tick-step must be positive")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TapesConfig {
    #[serde(default = "TapeConfig::airspeed")]
    pub airspeed: TapeConfig,
    #[serde(default = "TapeConfig::altitude")]
    pub altitude: TapeConfig,
    #[serde(default = "TapeConfig::heading")]
    pub heading: TapeConfig,
    #[serde(default = "default_background")]
    pub background: Color,
}

fn default_background() -> Color {
    Color::GRAY
}

impl Default for TapesConfig {
    fn default() -> Self {
        Self {
            airspeed: TapeConfig::airspeed(),
            altitude: TapeConfig::altitude(),
            heading: TapeConfig::heading(),
            background: default_background(),
        }
    }
}

impl TapesConfig {
    pub(super) fn validate(&self) -> Result<(), Error> {
        self.airspeed.validate()?;
        self.altitude.validate()?;
        self.heading.validate()
    }
}

mod test {
    #[test]
    fn test_spec() {
        use super::TapeConfig;
        use crate::osd::surface::Color;
        use crate::osd::tape::{GaugeSpec, Orientation};

        let spec = TapeConfig::heading().spec(Orientation::Horizontal, Color::GREEN);
        let expected = GaugeSpec {
            x: 250,
            y: 25,
            width: 780,
            height: 75,
            orientation: Orientation::Horizontal,
            color: Color::GREEN,
            tick_range: 60,
            tick_step: 10,
        };
        assert_eq!(spec, expected);
    }
}
