use std::time::Duration;

use crate::config::Config;
use crate::hal::{Command, CommandSource, Error, Presenter, VideoFeed};
use crate::osd::Compositor;
use crate::telemetry::TelemetrySource;
use crate::types::coordinate::Position;
use crate::types::{Camera, TelemetrySample};

const REPORT_INTERVAL: usize = 100;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum State {
    Running,
    Stopped,
}

/// One iteration per output frame: poll telemetry, grab feeds, compose, present, poll command.
pub struct RenderLoop {
    compositor: Compositor,
    telemetry: Box<dyn TelemetrySource>,
    main: Box<dyn VideoFeed>,
    secondary: Option<Box<dyn VideoFeed>>,
    presenter: Box<dyn Presenter>,
    commands: Box<dyn CommandSource>,
    poll_timeout: Duration,
    min_satellites: u8,
    sample: TelemetrySample,
    home: Option<Position>,
    swap: bool,
    state: State,
    frames: usize,
}

impl RenderLoop {
    pub fn new(
        config: &Config,
        telemetry: Box<dyn TelemetrySource>,
        main: Box<dyn VideoFeed>,
        presenter: Box<dyn Presenter>,
        commands: Box<dyn CommandSource>,
    ) -> Self {
        Self {
            compositor: Compositor::new(config),
            telemetry,
            main,
            secondary: None,
            presenter,
            commands,
            poll_timeout: config.control.poll_timeout(),
            min_satellites: config.control.min_satellites,
            sample: TelemetrySample::default(),
            home: None,
            swap: false,
            state: State::Running,
            frames: 0,
        }
    }

    pub fn with_secondary(mut self, feed: Box<dyn VideoFeed>) -> Self {
        self.secondary = Some(feed);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn swap_active(&self) -> bool {
        self.swap
    }

    pub fn home(&self) -> Option<Position> {
        self.home
    }

    /// Sample used for the most recent frame
    pub fn sample(&self) -> &TelemetrySample {
        &self.sample
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    fn latch_home(&mut self) {
        if self.home.is_some() || self.sample.satellites < self.min_satellites {
            return;
        }
        let position = self.sample.position();
        info!("Home position latched at {}", position);
        self.home = Some(position);
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Quit => {
                info!("Quit requested");
                self.state = State::Stopped;
            }
            Command::Swap => {
                self.swap = !self.swap;
                debug!("Swap camera, secondary on main {}", self.swap);
            }
            Command::Other => (),
        }
    }

    fn render(&mut self) -> Result<(), Error> {
        let main = self.main.acquire()?;
        let secondary = match self.secondary.as_mut() {
            Some(feed) => Some(feed.acquire()?),
            None => None,
        };
        let (sample, swap, home) = (&self.sample, self.swap, self.home);
        let output = self.compositor.compose(&main, secondary.as_ref(), sample, swap, home);
        self.presenter.present(&output)
    }

    pub fn step(&mut self) -> Result<State, Error> {
        if self.state == State::Stopped {
            return Ok(State::Stopped);
        }

        if let Some(sample) = self.telemetry.poll() {
            self.sample = sample;
            self.latch_home();
        }
        self.sample.camera = if self.swap { Camera::Secondary } else { Camera::Main };

        if let Err(e) = self.render() {
            self.state = State::Stopped;
            return Err(e);
        }
        self.frames += 1;
        if self.frames % REPORT_INTERVAL == 0 {
            info!("{} frames rendered, camera {}", self.frames, self.sample.camera);
        }

        if let Some(command) = self.commands.poll(self.poll_timeout) {
            self.handle(command);
        }
        Ok(self.state)
    }

    /// Runs until quit, failure or `limit` frames, returns the number of frames rendered
    pub fn run(&mut self, limit: Option<usize>) -> Result<usize, Error> {
        while limit.map(|limit| self.frames < limit).unwrap_or(true) {
            match self.step() {
                Ok(State::Running) => continue,
                Ok(State::Stopped) => break,
                Err(e) => {
                    error!("Render loop stopped: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(self.frames)
    }
}

mod test {
    #[cfg(test)]
    use std::{cell::RefCell, collections::VecDeque, rc::Rc, time::Duration};

    #[cfg(test)]
    use crate::hal::{Command, CommandSource, Error, Presenter, VideoFeed};
    #[cfg(test)]
    use crate::osd::{Color, Surface};

    #[cfg(test)]
    struct Feed {
        color: Color,
        remaining: usize,
    }

    #[cfg(test)]
    impl VideoFeed for Feed {
        fn acquire(&mut self) -> Result<Surface, Error> {
            if self.remaining == 0 {
                return Err(Error::Unavailable("camera"));
            }
            self.remaining -= 1;
            Ok(Surface::filled(64, 36, self.color))
        }
    }

    #[cfg(test)]
    #[derive(Clone, Default)]
    struct Frames(Rc<RefCell<Vec<Surface>>>);

    #[cfg(test)]
    impl Presenter for Frames {
        fn present(&mut self, surface: &Surface) -> Result<(), Error> {
            self.0.borrow_mut().push(surface.clone());
            Ok(())
        }
    }

    #[cfg(test)]
    struct Script(VecDeque<Option<Command>>);

    #[cfg(test)]
    impl CommandSource for Script {
        fn poll(&mut self, _: Duration) -> Option<Command> {
            self.0.pop_front().flatten()
        }
    }

    #[cfg(test)]
    fn config() -> crate::config::Config {
        let yaml = "
osd: {width: 160, height: 90, text-scale: 1}
pip: {scale: 0.5, margin: 0, border: 0}
tapes:
  airspeed: {x: 0, y: 0, width: 20, height: 40, tick-range: 20, tick-step: 5}
  altitude: {x: 140, y: 0, width: 20, height: 40, tick-range: 100, tick-step: 20}
  heading: {x: 30, y: 0, width: 100, height: 15, tick-range: 60, tick-step: 10}
";
        crate::config::Config::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_quit_and_swap() {
        use super::{RenderLoop, State};
        use crate::telemetry::SimulationClock;
        use crate::types::coordinate::Position;
        use crate::types::Camera;

        let frames = Frames::default();
        let clock = SimulationClock::new(Position::new(47.3977, 8.5456), Duration::from_millis(40));
        let script = vec![None, Some(Command::Swap), Some(Command::Other), Some(Command::Quit)];
        let mut render_loop = RenderLoop::new(
            &config(),
            Box::new(clock),
            Box::new(Feed { color: Color(100, 0, 0), remaining: 100 }),
            Box::new(frames.clone()),
            Box::new(Script(script.into_iter().collect())),
        )
        .with_secondary(Box::new(Feed { color: Color(0, 0, 100), remaining: 100 }));

        assert_eq!(render_loop.step().unwrap(), State::Running);
        assert!(!render_loop.swap_active());
        assert_eq!(render_loop.step().unwrap(), State::Running);
        assert!(render_loop.swap_active());
        assert_eq!(render_loop.run(None).unwrap(), 4);
        assert_eq!(render_loop.state(), State::Stopped);
        assert_eq!(render_loop.step().unwrap(), State::Stopped);
        assert_eq!(render_loop.sample().camera, Camera::Secondary);
        assert!(render_loop.home().is_some());

        let frames = frames.0.borrow();
        assert_eq!(frames.len(), 4);
        // lower right quarter is the inset
        assert_eq!(frames[0].get(150, 60), Some(Color(0, 0, 100)));
        assert_eq!(frames[0].get(10, 60), Some(Color(100, 0, 0)));
        assert_eq!(frames[3].get(150, 60), Some(Color(100, 0, 0)));
    }

    #[test]
    fn test_feed_failure() {
        use super::{RenderLoop, State};
        use crate::hal::input::NoCommand;
        use crate::hal::Reader;
        use crate::telemetry::SerialTelemetry;

        let frames = Frames::default();
        let telemetry = SerialTelemetry::new(Reader(std::io::empty()), 16);
        let mut render_loop = RenderLoop::new(
            &config(),
            Box::new(telemetry),
            Box::new(Feed { color: Color::WHITE, remaining: 3 }),
            Box::new(frames.clone()),
            Box::new(NoCommand),
        );
        match render_loop.run(Some(10)) {
            Err(Error::Unavailable(what)) => assert_eq!(what, "camera"),
            other => panic!("Unexpected {:?}", other),
        }
        assert_eq!(render_loop.state(), State::Stopped);
        assert_eq!(render_loop.frames(), 3);
        assert_eq!(frames.0.borrow().len(), 3);
        assert!(render_loop.home().is_none());
    }

    #[test]
    fn test_frame_limit() {
        use super::RenderLoop;
        use crate::hal::input::NoCommand;
        use crate::telemetry::SimulationClock;
        use crate::types::coordinate::Position;

        let mut config = config();
        config.control.min_satellites = 13;
        let frames = Frames::default();
        let clock = SimulationClock::new(Position::new(0.0, 0.0), Duration::from_millis(40));
        let mut render_loop = RenderLoop::new(
            &config,
            Box::new(clock),
            Box::new(Feed { color: Color::BLACK, remaining: usize::MAX }),
            Box::new(frames),
            Box::new(NoCommand),
        );
        assert_eq!(render_loop.run(Some(5)).unwrap(), 5);
        assert!(render_loop.home().is_none());
        assert!(render_loop.sample().is_finite());
    }
}
