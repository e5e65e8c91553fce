use std::io::Write;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sb_core::presets::{random_launch, LaunchPreset};
use sb_core::types::constants;
use tracing::info;

use super::open_output;

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct Args {
    /// Seed for a reproducible launch
    #[arg(short, long)]
    seed: Option<u64>,

    /// Air density in kg/m³
    #[arg(long, default_value_t = constants::AIR_DENSITY)]
    density: f64,

    /// Drag coefficient
    #[arg(long, default_value_t = constants::SPHERE_DRAG_COEFFICIENT)]
    drag: f64,

    /// Write the launch to this file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(args: &Args) -> anyhow::Result<()> {
    let launch = draw(args)?;
    write_launch(open_output(args.output.as_deref())?, &launch)?;

    if let Some(path) = &args.output {
        info!("Launch `{}` saved to {}", launch.name, path.display());
    }
    Ok(())
}

fn draw(args: &Args) -> anyhow::Result<LaunchPreset> {
    let launch = match args.seed {
        Some(seed) => random_launch(&mut StdRng::seed_from_u64(seed), args.density, args.drag),
        None => random_launch(&mut rand::rng(), args.density, args.drag),
    };
    launch.parameters.validate()?;
    Ok(launch)
}

/// Write `launch` in the same YAML layout as `presets/launches/`.
fn write_launch<W: Write>(mut out: W, launch: &LaunchPreset) -> anyhow::Result<()> {
    out.write_all(serde_yaml::to_string(launch)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> Args {
        Args {
            seed: Some(seed),
            density: constants::AIR_DENSITY,
            drag: constants::SPHERE_DRAG_COEFFICIENT,
            output: None,
        }
    }

    #[test]
    fn test_printed_launch_parses_back() {
        let launch = draw(&seeded(11)).unwrap();
        let mut buffer = Vec::new();
        write_launch(&mut buffer, &launch).unwrap();

        let parsed: LaunchPreset = serde_yaml::from_slice(&buffer).unwrap();
        assert_eq!(parsed, launch);
        assert!(parsed.parameters.validate().is_ok());
    }

    #[test]
    fn test_seed_makes_launch_reproducible() {
        assert_eq!(draw(&seeded(3)).unwrap(), draw(&seeded(3)).unwrap());
    }

    #[test]
    fn test_negative_density_is_rejected() {
        let args = Args {
            density: -1.0,
            ..seeded(3)
        };
        assert!(draw(&args).is_err());
    }
}
