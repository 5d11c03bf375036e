//! Route command handler for planning multi-stop walks.

use std::path::PathBuf;

use anyhow::{Context, Result};

use walkroute_cli::output::{render_route, OutputFormat};
use walkroute_lib::{
    plan_walk, Coordinate, FileProvider, GraphProvider, OverpassProvider, RouteOptions,
    WalkRequest,
};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Street network file; `None` when fetching from Overpass.
    pub graph: Option<PathBuf>,
    pub fetch: bool,
    pub start: Coordinate,
    pub end: Coordinate,
    pub waypoints: Vec<Coordinate>,
    pub parallel: bool,
    pub max_snap_distance: f64,
    pub max_waypoints: usize,
}

impl RouteCommandArgs {
    pub fn to_request(&self) -> WalkRequest {
        WalkRequest::new(self.start, self.end, self.waypoints.clone())
    }

    pub fn to_options(&self) -> RouteOptions {
        RouteOptions {
            max_waypoints: self.max_waypoints,
            max_snap_distance_m: self.max_snap_distance,
            parallel: self.parallel,
            ..RouteOptions::default()
        }
    }

    fn provider(&self) -> Result<Box<dyn GraphProvider>> {
        match (&self.graph, self.fetch) {
            (Some(path), _) => Ok(Box::new(FileProvider::new(path))),
            (None, true) => Ok(Box::new(OverpassProvider::from_env())),
            (None, false) => anyhow::bail!("either --graph or --fetch is required"),
        }
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(args: &RouteCommandArgs, format: OutputFormat) -> Result<()> {
    let provider = args.provider()?;
    let request = args.to_request();

    let plan = plan_walk(provider.as_ref(), &request, &args.to_options()).with_context(|| {
        format!(
            "failed to plan a walk with {} waypoint(s)",
            request.waypoints.len()
        )
    })?;

    print!("{}", render_route(&plan, format)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}
