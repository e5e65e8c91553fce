use std::path::PathBuf;

use sb_core::presets::PresetLoader;

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct Args {
    /// Directory holding `balls/` and `launches/`
    #[arg(long, default_value = "presets")]
    presets_dir: PathBuf,
}

pub(crate) fn run(args: &Args) -> anyhow::Result<()> {
    let loader = PresetLoader::new(&args.presets_dir);

    println!("Balls:");
    for name in loader.list_balls()? {
        let ball = loader.load_ball(&name)?;
        println!("  {name:<16} {:>6.3} kg  r = {:.4} m", ball.mass, ball.radius);
    }

    println!("Launches:");
    for name in loader.list_launches()? {
        let launch = loader.load_launch(&name)?;
        let p = &launch.parameters;
        println!(
            "  {name:<16} {}  |v0| = {:.2} m/s  spin = {:.1} rad/s",
            launch.name,
            p.initial_velocity.magnitude(),
            p.spin_rate()
        );
    }
    Ok(())
}
