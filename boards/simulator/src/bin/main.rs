#[macro_use]
extern crate log;

use std::convert::TryFrom;
use std::path::PathBuf;
use std::time::Duration;

use env_logger::Env;
use fpv_hud::components::RenderLoop;
use fpv_hud::config::Config;
use fpv_hud::telemetry::{SerialTelemetry, SimulationClock, TelemetrySource};
use fpv_hud::types::coordinate::Position;
use simulator::{Pattern, SerialReplay, SnapshotPresenter, StdinCommands, SyntheticFeed};

const DEFAULT_HOME: &str = "N47°23'51.7 E008°32'44.2";
const FRAME_INTERVAL: Duration = Duration::from_millis(40);

fn number<'a>(matches: &'a clap::ArgMatches<'a>, name: &str) -> Result<Option<usize>, String> {
    match matches.value_of(name) {
        Some(value) => value.parse().map(Some).map_err(|_| format!("{} not a number", name)),
        None => Ok(None),
    }
}

fn init<'a>(matches: &'a clap::ArgMatches<'a>) -> Result<RenderLoop, String> {
    let config = match matches.value_of("config") {
        Some(path) => {
            Config::load(path).map_err(|e| format!("Load config {} failed: {}", path, e))?
        }
        None => Config::default(),
    };

    let telemetry: Box<dyn TelemetrySource> = match matches.value_of("telemetry") {
        Some(path) => {
            let file =
                std::fs::File::open(path).map_err(|e| format!("Open {} failed: {}", path, e))?;
            info!("Replaying telemetry from {} at {} baud", path, config.telemetry.baud_rate);
            let replay = SerialReplay::new(file, config.telemetry.baud_rate, FRAME_INTERVAL);
            Box::new(SerialTelemetry::new(replay, config.telemetry.max_buffered_frames))
        }
        None => {
            let home = matches.value_of("home").unwrap_or(DEFAULT_HOME);
            let home = Position::try_from(home).map_err(|_| format!("Malformed home {}", home))?;
            info!("Simulating flight around {}", home);
            Box::new(SimulationClock::new(home, FRAME_INTERVAL))
        }
    };

    let (width, height) = (config.osd.width / 2, config.osd.height / 2);
    let main = SyntheticFeed::new(width, height, Pattern::Landscape);
    let dir = matches.value_of("snapshot-dir").map(PathBuf::from);
    let every = number(matches, "snapshot-every")?.unwrap_or(100);
    let presenter = SnapshotPresenter::new(dir, every);
    let commands = StdinCommands::spawn();
    let (main, presenter, commands) = (Box::new(main), Box::new(presenter), Box::new(commands));
    let render_loop = RenderLoop::new(&config, telemetry, main, presenter, commands);
    if matches.is_present("no-secondary") {
        return Ok(render_loop);
    }
    let secondary = SyntheticFeed::new(width / 2, height / 2, Pattern::Checker);
    Ok(render_loop.with_secondary(Box::new(secondary)))
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let matches = clap::App::new("simulator")
        .version("0.1")
        .author("qiuchengxuan")
        .about("FPV HUD simulator, press q to quit and s to swap cameras")
        .arg(clap::Arg::with_name("config").long("config").help("Config file").takes_value(true))
        .arg(
            clap::Arg::with_name("frames")
                .long("frames")
                .help("Stop after frames")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("telemetry")
                .long("telemetry")
                .help("Replay raw telemetry frames from file")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("home")
                .long("home")
                .help("Simulated home position")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("snapshot-dir")
                .long("snapshot-dir")
                .help("Write PPM snapshots into directory")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("snapshot-every")
                .long("snapshot-every")
                .help("Snapshot interval in frames")
                .takes_value(true),
        )
        .arg(clap::Arg::with_name("no-secondary").long("no-secondary").help("Single camera"))
        .get_matches();

    let frames = match number(&matches, "frames") {
        Ok(frames) => frames,
        Err(error) => {
            println!("{}", error);
            return;
        }
    };
    let mut render_loop = match init(&matches) {
        Ok(render_loop) => render_loop,
        Err(error) => {
            println!("{}", error);
            return;
        }
    };
    match render_loop.run(frames) {
        Ok(frames) => info!("Stopped after {} frames", frames),
        Err(_) => std::process::exit(1),
    }
}
