use super::{ensure, Error};
use crate::osd::horizon::{Horizon, HorizonMode, DEFAULT_PIXELS_PER_DEGREE};
use crate::osd::surface::Color;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizonKind {
    Full,
    Disc,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HorizonConfig {
    pub mode: HorizonKind,
    /// Disc mode only
    pub radius: i32,
    pub pixels_per_degree: f32,
    pub line_width: i32,
    /// Defaults to output center
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<[i32; 2]>,
    /// Defaults to output size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<[i32; 2]>,
    pub color: Color,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            mode: HorizonKind::Full,
            radius: 120,
            pixels_per_degree: DEFAULT_PIXELS_PER_DEGREE,
            line_width: 2,
            anchor: None,
            viewport: None,
            color: Color::GREEN,
        }
    }
}

impl HorizonConfig {
    pub(super) fn validate(&self) -> Result<(), Error> {
        let ppd = self.pixels_per_degree;
        ensure(ppd.is_finite() && ppd > 0.0, "horizon.pixels-per-degree must be positive")?;
        ensure(self.line_width > 0, "horizon.line-width must be positive")?;
        let radius_valid = self.mode == HorizonKind::Full || self.radius > 0;
        ensure(radius_valid, "horizon.radius must be positive")?;
        if let Some([width, height]) = self.viewport {
            ensure(width > 0 && height > 0, "horizon.viewport must be positive")?;
        }
        Ok(())
    }
}

impl From<&HorizonConfig> for Horizon {
    fn from(config: &HorizonConfig) -> Self {
        let mode = match config.mode {
            HorizonKind::Full => HorizonMode::Full,
            HorizonKind::Disc => HorizonMode::Disc { radius: config.radius },
        };
        let mut horizon = Horizon::new(mode, config.pixels_per_degree, config.color);
        horizon.line_width = config.line_width;
        horizon
    }
}

mod test {
    #[test]
    fn test_into_horizon() {
        use super::{HorizonConfig, HorizonKind};
        use crate::osd::horizon::{Horizon, HorizonMode};

        let config = HorizonConfig { mode: HorizonKind::Disc, radius: 90, ..Default::default() };
        let horizon = Horizon::from(&config);
        assert_eq!(horizon.mode, HorizonMode::Disc { radius: 90 });
        assert_eq!(horizon.pixels_per_degree, 4.0);
    }
}
