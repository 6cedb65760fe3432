use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

use fpv_hud::components::{RenderLoop, State};
use fpv_hud::config::Config;
use fpv_hud::hal::input::NoCommand;
use fpv_hud::hal::{Error, Presenter, Reader, VideoFeed};
use fpv_hud::osd::{Color, Surface};
use fpv_hud::telemetry::{SerialTelemetry, SimulationClock, TelemetrySource, FRAME_SIZE};
use fpv_hud::types::coordinate::Position;
use fpv_hud::types::TelemetrySample;

const CONFIG: &str = "
osd: {width: 192, height: 108, text-scale: 1}
horizon: {pixels-per-degree: 2.0}
tapes:
  airspeed: {x: 4, y: 10, width: 30, height: 80, tick-range: 20, tick-step: 5}
  altitude: {x: 158, y: 10, width: 30, height: 80, tick-range: 200, tick-step: 50}
  heading: {x: 40, y: 0, width: 112, height: 16, tick-range: 60, tick-step: 10}
";

struct Camera(Color);

impl VideoFeed for Camera {
    fn acquire(&mut self) -> Result<Surface, Error> {
        Ok(Surface::filled(96, 54, self.0))
    }
}

#[derive(Clone, Default)]
struct Counter(Rc<RefCell<usize>>);

impl Presenter for Counter {
    fn present(&mut self, surface: &Surface) -> Result<(), Error> {
        assert_eq!((surface.width(), surface.height()), (192, 108));
        *self.0.borrow_mut() += 1;
        Ok(())
    }
}

/// Records every sample handed to the renderers
struct Recorder<T> {
    inner: T,
    samples: Rc<RefCell<Vec<TelemetrySample>>>,
}

impl<T: TelemetrySource> TelemetrySource for Recorder<T> {
    fn poll(&mut self) -> Option<TelemetrySample> {
        let sample = self.inner.poll()?;
        self.samples.borrow_mut().push(sample);
        Some(sample)
    }
}

fn frame(values: [f32; 11]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

#[test]
fn test_simulated_flight() {
    let config = Config::from_yaml(CONFIG).unwrap();
    let home = Position::new(47.3977, 8.5456);
    let samples = Rc::new(RefCell::new(Vec::new()));
    let telemetry = Recorder {
        inner: SimulationClock::new(home, Duration::from_millis(40)),
        samples: samples.clone(),
    };
    let presented = Counter::default();
    let mut render_loop = RenderLoop::new(
        &config,
        Box::new(telemetry),
        Box::new(Camera(Color(60, 90, 120))),
        Box::new(presented.clone()),
        Box::new(NoCommand),
    )
    .with_secondary(Box::new(Camera(Color(20, 20, 20))));

    assert_eq!(render_loop.run(Some(300)).unwrap(), 300);
    assert_eq!(render_loop.state(), State::Running);
    assert_eq!(*presented.0.borrow(), 300);
    // latched from the first sample, one step into the orbit
    assert!(render_loop.home().unwrap().distance(&home) < 1.0);

    let samples = samples.borrow();
    assert_eq!(samples.len(), 300);
    for sample in samples.iter() {
        assert!(sample.is_finite());
        assert!((-30.0..=30.0).contains(&sample.roll));
        assert!((-15.0..=15.0).contains(&sample.pitch));
    }
}

#[test]
fn test_corrupted_serial_stream() {
    let config = Config::from_yaml(CONFIG).unwrap();
    let mut bytes = Vec::new();
    for i in 0..40 {
        let value = i as f32;
        let mut values =
            [value, -value, 25.0, 1013.0, 100.0 + value, 20.0, 18.0, 1012.0, 0.2, 0.1, 0.0];
        match i % 4 {
            1 => values[0] = f32::NAN,
            2 => values[4] = f32::INFINITY,
            3 => values = [f32::NAN; 11],
            _ => (),
        }
        if i == 9 {
            // misaligned reads decode to huge but finite values
            values[0] = -1.0e30;
            values[4] = 3.0e38;
        }
        bytes.extend(frame(values));
    }
    // trailing partial frame never surfaces
    bytes.extend(&frame([1.0; 11])[..FRAME_SIZE / 2]);

    let samples = Rc::new(RefCell::new(Vec::new()));
    let telemetry = Recorder {
        inner: SerialTelemetry::new(Reader(Cursor::new(bytes)), 64),
        samples: samples.clone(),
    };
    let mut render_loop = RenderLoop::new(
        &config,
        Box::new(telemetry),
        Box::new(Camera(Color::BLACK)),
        Box::new(Counter::default()),
        Box::new(NoCommand),
    );
    assert_eq!(render_loop.run(Some(60)).unwrap(), 60);

    let samples = samples.borrow();
    assert_eq!(samples.len(), 40);
    assert!(samples.iter().all(|s| s.is_finite()));
    // NaN pitch in frame 5 falls back to frame 4
    assert_eq!(samples[5].pitch, 4.0);
    assert_eq!(samples[5].roll, -5.0);
    // infinite altitude in frame 6 falls back to frame 5
    assert_eq!(samples[6].altitude, 105.0);
    // all NaN frame 7 repeats the last known good values
    assert_eq!(samples[7].pitch, 6.0);
    assert_eq!(samples[7].altitude, 105.0);
    assert_eq!(samples[9].pitch, -1.0e30);
    assert_eq!(samples[9].altitude, 3.0e38);
    assert_eq!(render_loop.sample(), &samples[39]);
    assert_eq!(render_loop.home(), None);
}
