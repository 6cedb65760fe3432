pub mod horizon;
pub mod osd;
pub mod tape;

use std::fs;
use std::path::Path;
use std::time::Duration;

pub use horizon::{HorizonConfig, HorizonKind};
pub use osd::{OsdConfig, PipConfig};
pub use tape::{TapeConfig, TapesConfig};

use crate::telemetry::ingestor::DEFAULT_MAX_BUFFERED_FRAMES;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(&'static str),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Read config failed: {}", e),
            Self::Parse(e) => write!(f, "Malformed config: {}", e),
            Self::Invalid(reason) => write!(f, "Invalid config: {}", reason),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub(crate) fn ensure(condition: bool, reason: &'static str) -> Result<(), Error> {
    match condition {
        true => Ok(()),
        false => Err(Error::Invalid(reason)),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelemetryConfig {
    pub baud_rate: u32,
    pub max_buffered_frames: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { baud_rate: 115200, max_buffered_frames: DEFAULT_MAX_BUFFERED_FRAMES }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControlConfig {
    pub poll_timeout_ms: u64,
    pub min_satellites: u8,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self { poll_timeout_ms: 1, min_satellites: 5 }
    }
}

impl ControlConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub telemetry: TelemetryConfig,
    pub osd: OsdConfig,
    pub horizon: HorizonConfig,
    pub tapes: TapesConfig,
    pub pip: PipConfig,
    pub control: ControlConfig,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: Self = match yaml.trim().is_empty() {
            true => Self::default(),
            false => serde_yaml::from_str(yaml)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let config = Self::from_yaml(&fs::read_to_string(path)?)?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        ensure(self.telemetry.baud_rate > 0, "telemetry.baud-rate must be positive")?;
        let frames = self.telemetry.max_buffered_frames;
        ensure(frames > 0, "telemetry.max-buffered-frames must be positive")?;
        self.osd.validate()?;
        self.horizon.validate()?;
        self.tapes.validate()?;
        self.pip.validate()
    }
}

mod test {
    #[test]
    fn test_read_config() -> Result<(), super::Error> {
        use super::{Config, HorizonKind};
        use crate::osd::Color;
        use crate::types::measurement::UnitSystem;

        let config = Config::load("sample.yml")?;
        assert_eq!(config.telemetry.baud_rate, 57600);
        assert_eq!(config.osd.units, UnitSystem::Metric);
        assert_eq!(config.osd.instrument_opacity, 0.6);
        assert_eq!(config.osd.color, Color(0, 255, 128));
        assert_eq!(config.horizon.mode, HorizonKind::Disc);
        assert_eq!(config.horizon.radius, 150);
        assert_eq!(config.tapes.altitude.tick_step, 10);
        assert_eq!(config.control.min_satellites, 6);
        // untouched keys keep defaults
        assert_eq!(config.osd.width, 1280);
        assert_eq!(config.tapes.heading.tick_range, 60);
        Ok(())
    }

    #[test]
    fn test_defaults() {
        use std::time::Duration;

        use super::Config;

        let config = Config::from_yaml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.telemetry.max_buffered_frames, 16);
        assert_eq!(config.osd.hud_alpha, 1.0);
        assert_eq!(config.horizon.pixels_per_degree, 4.0);
        assert_eq!(config.control.poll_timeout(), Duration::from_millis(1));

        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid() {
        use super::{Config, Error};

        match Config::from_yaml("osd:\n  instrument-opacity: 1.5\n") {
            Err(Error::Invalid(reason)) => assert!(reason.contains("instrument-opacity")),
            other => panic!("Unexpected {:?}", other),
        }
        let yaml = "
tapes:
  airspeed: {x: 0, y: 0, width: 100, height: 400, tick-range: 20, tick-step: 0}
";
        match Config::from_yaml(yaml) {
            Err(Error::Invalid(reason)) => assert!(reason.contains("tick-step")),
            other => panic!("Unexpected {:?}", other),
        }
        // a tape block must be complete
        let partial = Config::from_yaml("tapes:\n  airspeed:\n    x: 10\n");
        assert!(matches!(partial, Err(Error::Parse(_))));
        assert!(matches!(Config::from_yaml("osd: [1, 2"), Err(Error::Parse(_))));
        assert!(matches!(Config::load("no-such-file.yml"), Err(Error::Io(_))));
    }
}
