//! Region command handler: sizes the network area around a set of points.

use anyhow::{Context, Result};

use walkroute_cli::output::{render_region, OutputFormat};
use walkroute_lib::{compute_center_and_radius, Coordinate, RegionConfig};

pub fn handle_region_command(
    points: &[Coordinate],
    local_scale: bool,
    format: OutputFormat,
) -> Result<()> {
    let config = if local_scale && !points.is_empty() {
        let mean_lat = points.iter().map(|p| p.lat).sum::<f64>() / points.len() as f64;
        RegionConfig::for_latitude(mean_lat)
    } else {
        RegionConfig::default()
    };

    let region = compute_center_and_radius(points, &config)
        .context("failed to compute the region covering the points")?;

    print!("{}", render_region(&region, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}
