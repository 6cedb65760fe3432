pub mod compositor;
pub mod horizon;
pub mod style;
pub mod surface;
pub mod tape;

pub use compositor::Compositor;
pub use horizon::{Horizon, HorizonMode};
pub use surface::{Color, Surface};
pub use tape::{GaugeSpec, Orientation, TapeGauge};
