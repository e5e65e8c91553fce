use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;
use sb_core::presets::{BallPreset, PresetLoader};
use sb_core::types::constants;
use sb_core::{
    FlightStatus, IntegrationMode, LoadError, ProjectileParameters, SimulationConfig, Snapshot,
    TrajectoryModel, Vec3,
};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::{open_output, parse_vec3};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Csv,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct Args {
    /// Launch preset to fly (overrides every launch flag below)
    #[arg(short, long)]
    preset: Option<String>,

    /// Directory holding `balls/` and `launches/`
    #[arg(long, default_value = "presets")]
    presets_dir: PathBuf,

    /// Simulation settings (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ball preset supplying mass and radius
    #[arg(short, long, default_value = "basketball")]
    ball: String,

    /// Mass in kg (overrides the ball preset)
    #[arg(long)]
    mass: Option<f64>,

    /// Radius in m (overrides the ball preset)
    #[arg(long)]
    radius: Option<f64>,

    /// Air density in kg/m³
    #[arg(long, default_value_t = constants::AIR_DENSITY)]
    density: f64,

    /// Drag coefficient
    #[arg(long, default_value_t = constants::SPHERE_DRAG_COEFFICIENT)]
    drag: f64,

    /// Initial velocity `x,y,z` in m/s
    #[arg(long, value_parser = parse_vec3, default_value = "0,10,10", allow_hyphen_values = true)]
    velocity: Vec3,

    /// Wind velocity `x,y,z` in m/s
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    wind: Vec3,

    /// Spin vector `x,y,z` in rad/s
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0", allow_hyphen_values = true)]
    spin: Vec3,

    /// Step from the previous state instead of re-integrating from launch
    #[arg(long)]
    incremental: bool,

    /// Ticks per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Stop after this many seconds even if the ball is still in the air
    #[arg(long, default_value_t = 30.0)]
    max_time: f64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One CSV row per tick.
#[derive(Debug, Serialize)]
struct TrajectoryRow {
    tick: usize,
    time: f64,
    status: FlightStatus,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    spin_angle: f64,
}

impl TrajectoryRow {
    fn new(tick: usize, snapshot: &Snapshot) -> Self {
        Self {
            tick,
            time: snapshot.elapsed,
            status: snapshot.status,
            x: snapshot.position.x,
            y: snapshot.position.y,
            z: snapshot.position.z,
            vx: snapshot.velocity.x,
            vy: snapshot.velocity.y,
            vz: snapshot.velocity.z,
            spin_angle: snapshot.spin_angle,
        }
    }
}

pub(crate) fn run(args: &Args) -> anyhow::Result<()> {
    trace!("{args:?}");

    let dt = tick_length(args.fps, args.max_time)?;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("cannot load settings from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if args.incremental {
        config.integration = IntegrationMode::Incremental;
    }

    let params = launch_parameters(args)?;
    let mut model = TrajectoryModel::new(config)?;
    debug!(config = ?model.config(), "simulation settings");
    model.fire(params)?;

    let trajectory = fly(&mut model, dt, args.max_time);
    summarize(&trajectory);

    write_trajectory(open_output(args.output.as_deref())?, args.format, &trajectory)?;

    if let Some(path) = &args.output {
        info!("Trajectory saved to {}", path.display());
    }
    Ok(())
}

/// Tick length for `fps`, after checking both timing flags.
fn tick_length(fps: f64, max_time: f64) -> anyhow::Result<f64> {
    if !(fps.is_finite() && fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {fps}");
    }
    if !(max_time.is_finite() && max_time > 0.0) {
        anyhow::bail!("--max-time must be a positive number, got {max_time}");
    }
    Ok(1.0 / fps)
}

fn write_trajectory<W: Write>(
    mut out: W,
    format: OutputFormat,
    trajectory: &[Snapshot],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for (tick, snapshot) in trajectory.iter().enumerate() {
                writer.serialize(TrajectoryRow::new(tick, snapshot))?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, trajectory)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn launch_parameters(args: &Args) -> anyhow::Result<ProjectileParameters> {
    let loader = PresetLoader::new(&args.presets_dir);

    if let Some(name) = &args.preset {
        let launch = loader
            .load_launch(name)
            .with_context(|| format!("cannot load launch preset `{name}`"))?;
        info!("Flying launch preset {}", launch.name);
        return Ok(launch.parameters);
    }

    let ball = match loader.load_ball(&args.ball) {
        Ok(ball) => ball,
        Err(LoadError::NotFound(_)) => BallPreset::builtin()
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(&args.ball))
            .with_context(|| format!("unknown ball `{}`", args.ball))?,
        Err(e) => return Err(e).with_context(|| format!("cannot load ball `{}`", args.ball)),
    };

    let mut params = ball
        .launch(args.density, args.drag, args.velocity)
        .with_wind(args.wind)
        .with_spin(args.spin);
    if let Some(mass) = args.mass {
        params.mass = mass;
    }
    if let Some(radius) = args.radius {
        params.radius = radius;
    }
    Ok(params)
}

/// Tick the model until the ball lands or `max_time` passes.
///
/// The first entry is the launch state, the last one the landing (if any).
fn fly(model: &mut TrajectoryModel, dt: f64, max_time: f64) -> Vec<Snapshot> {
    let mut trajectory = vec![model.snapshot()];
    while model.is_firing() {
        if model.elapsed() >= max_time {
            warn!(max_time, "ball still in flight, stopping");
            break;
        }
        model.advance(dt);
        trajectory.push(model.snapshot());
    }
    trajectory
}

fn summarize(trajectory: &[Snapshot]) {
    let Some(last) = trajectory.last() else {
        return;
    };
    let apex = trajectory
        .iter()
        .map(|s| s.position.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let start = trajectory[0].position;
    let carry = ((last.position.x - start.x).powi(2) + (last.position.z - start.z).powi(2)).sqrt();

    info!(
        ticks = trajectory.len() - 1,
        flight_time = last.elapsed,
        apex,
        carry,
        status = ?last.status,
        "flight finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn landed_trajectory() -> Vec<Snapshot> {
        let mut model = TrajectoryModel::default();
        model
            .fire(ProjectileParameters::new(0.625, 0.1143, 0.0, 0.0, Vec3::new(1.0, 3.0, 0.0)))
            .unwrap();
        fly(&mut model, 0.1, 30.0)
    }

    #[test]
    fn test_fly_stops_at_landing() {
        let mut model = TrajectoryModel::default();
        model
            .fire(ProjectileParameters::new(0.625, 0.1143, 0.0, 0.0, Vec3::new(0.0, 5.0, 3.0)))
            .unwrap();

        let trajectory = fly(&mut model, 1.0 / 60.0, 30.0);
        assert_eq!(trajectory[0].status, FlightStatus::Firing);
        assert_eq!(trajectory.last().unwrap().status, FlightStatus::Grounded);
        assert!(trajectory[..trajectory.len() - 1]
            .iter()
            .all(|s| s.status == FlightStatus::Firing));
    }

    #[test]
    fn test_fly_respects_time_limit() {
        let config = SimulationConfig {
            gravity: 0.0,
            ..SimulationConfig::default()
        };
        let mut model = TrajectoryModel::new(config).unwrap();
        model
            .fire(ProjectileParameters::new(0.625, 0.1143, 0.0, 0.0, Vec3::new(1.0, 1.0, 0.0)))
            .unwrap();

        let trajectory = fly(&mut model, 0.5, 2.0);
        assert_eq!(trajectory.len(), 5);
        assert!(model.is_firing());
    }

    #[test]
    fn test_row_from_snapshot() {
        let mut model = TrajectoryModel::default();
        model
            .fire(ProjectileParameters::new(0.625, 0.1143, 0.0, 0.0, Vec3::new(0.0, 5.0, 0.0)))
            .unwrap();
        let row = TrajectoryRow::new(0, &model.snapshot());
        assert_eq!(row.status, FlightStatus::Firing);
        assert_eq!(row.y, 0.1143);
        assert_eq!(row.vy, 5.0);
    }

    #[test_case(60.0, 30.0 ; "defaults")]
    #[test_case(1.0, 0.5 ; "short flight")]
    fn test_tick_length_accepts_positive_timing(fps: f64, max_time: f64) {
        assert_eq!(tick_length(fps, max_time).unwrap(), 1.0 / fps);
    }

    #[test_case(0.0, 30.0 ; "zero fps")]
    #[test_case(f64::NAN, 30.0 ; "nan fps")]
    #[test_case(60.0, f64::NAN ; "nan max time")]
    #[test_case(60.0, f64::INFINITY ; "infinite max time")]
    #[test_case(60.0, 0.0 ; "zero max time")]
    #[test_case(60.0, -1.0 ; "negative max time")]
    fn test_tick_length_rejects_bad_timing(fps: f64, max_time: f64) {
        assert!(tick_length(fps, max_time).is_err());
    }

    #[test]
    fn test_csv_output_has_header_and_statuses() {
        let trajectory = landed_trajectory();
        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, OutputFormat::Csv, &trajectory).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "tick,time,status,x,y,z,vx,vy,vz,spin_angle");
        assert_eq!(lines.len(), trajectory.len() + 1);
        assert!(lines[1].starts_with("0,"), "first row: {}", lines[1]);
        assert!(lines[1].contains(",firing,"), "first row: {}", lines[1]);
        assert!(lines[lines.len() - 1].contains(",grounded,"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let trajectory = landed_trajectory();
        let mut buffer = Vec::new();
        write_trajectory(&mut buffer, OutputFormat::Json, &trajectory).unwrap();

        assert!(buffer.ends_with(b"\n"));
        let parsed: Vec<Snapshot> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.len(), trajectory.len());
        for (back, original) in parsed.iter().zip(&trajectory) {
            assert_eq!(back.status, original.status);
            assert!((back.elapsed - original.elapsed).abs() < 1e-12);
            assert!((back.position - original.position).magnitude() < 1e-12);
            assert!((back.velocity - original.velocity).magnitude() < 1e-12);
        }

        let raw: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(raw[0]["status"], "firing");
    }
}
