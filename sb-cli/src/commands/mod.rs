pub(crate) mod presets;
pub(crate) mod random;
pub(crate) mod run;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context};
use sb_core::Vec3;

/// Parse `x,y,z` into a vector.
pub(crate) fn parse_vec3(s: &str) -> anyhow::Result<Vec3> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected three comma-separated components, got `{s}`");
    }
    let component = |i: usize| -> anyhow::Result<f64> {
        parts[i]
            .parse::<f64>()
            .with_context(|| format!("invalid vector component `{}`", parts[i]))
    };
    Ok(Vec3::new(component(0)?, component(1)?, component(2)?))
}

/// Open `path` for writing, or stdout when no path is given.
pub(crate) fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}
