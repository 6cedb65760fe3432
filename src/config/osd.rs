use super::{ensure, Error};
use crate::osd::surface::Color;
use crate::types::measurement::UnitSystem;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OsdConfig {
    pub width: usize,
    pub height: usize,
    pub units: UnitSystem,
    /// Weight of the opaque instrument panels over the scene
    pub instrument_opacity: f32,
    /// Weight of the whole HUD over the camera picture
    pub hud_alpha: f32,
    pub color: Color,
    pub text_scale: i32,
}

impl Default for OsdConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            units: UnitSystem::default(),
            instrument_opacity: 0.5,
            hud_alpha: 1.0,
            color: Color::GREEN,
            text_scale: 2,
        }
    }
}

impl OsdConfig {
    pub(super) fn validate(&self) -> Result<(), Error> {
        ensure(self.width > 0 && self.height > 0, "osd width and height must be positive")?;
        let opacity = self.instrument_opacity;
        ensure((0.0..=1.0).contains(&opacity), "osd.instrument-opacity must be within [0, 1]")?;
        ensure((0.0..=1.0).contains(&self.hud_alpha), "osd.hud-alpha must be within [0, 1]")?;
        ensure(self.text_scale > 0, "osd.text-scale must be positive")
    }
}

/// Picture-in-picture inset in the bottom right corner
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PipConfig {
    /// Fraction of the output size
    pub scale: f32,
    pub margin: i32,
    pub border: i32,
    pub border_color: Color,
}

impl Default for PipConfig {
    fn default() -> Self {
        Self { scale: 0.25, margin: 16, border: 2, border_color: Color::WHITE }
    }
}

impl PipConfig {
    pub(super) fn validate(&self) -> Result<(), Error> {
        ensure(self.scale > 0.0 && self.scale <= 1.0, "pip.scale must be within (0, 1]")?;
        ensure(self.margin >= 0 && self.border >= 0, "pip margin and border must not be negative")
    }

    /// Inset rectangle `(x, y, width, height)` within an output of the given size
    pub fn rect(&self, width: usize, height: usize) -> (i32, i32, usize, usize) {
        let w = ((width as f32 * self.scale) as usize).max(1);
        let h = ((height as f32 * self.scale) as usize).max(1);
        (width as i32 - w as i32 - self.margin, height as i32 - h as i32 - self.margin, w, h)
    }
}

mod test {
    #[test]
    fn test_pip_rect() {
        use super::PipConfig;

        assert_eq!(PipConfig::default().rect(1280, 720), (944, 524, 320, 180));
    }
}
