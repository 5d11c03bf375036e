use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use walkroute_cli::args::{parse_coordinate, parse_snap_distance};
use walkroute_cli::output::OutputFormat;
use walkroute_lib::routing::DEFAULT_MAX_WAYPOINTS;
use walkroute_lib::spatial::DEFAULT_MAX_SNAP_DISTANCE_M;
use walkroute_lib::Coordinate;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-stop walking route planner")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan the shortest walk from start through every waypoint to end.
    Route(RouteArgs),
    /// Print the center and radius of the area covering the given points.
    Region(RegionArgs),
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Street network JSON file to route over.
    #[arg(long, conflicts_with = "fetch", required_unless_present = "fetch")]
    graph: Option<PathBuf>,

    /// Download the walk network from Overpass instead of reading a file.
    #[arg(long)]
    fetch: bool,

    /// Start point as LAT,LNG.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    start: Coordinate,

    /// End point as LAT,LNG.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
    end: Coordinate,

    /// Waypoint as LAT,LNG. Repeat for several waypoints.
    #[arg(long = "waypoint", value_parser = parse_coordinate, allow_hyphen_values = true)]
    waypoints: Vec<Coordinate>,

    /// Evaluate waypoint orderings on all cores.
    #[arg(long)]
    parallel: bool,

    /// Farthest a point may be from its snapped graph node, in metres.
    #[arg(long, default_value_t = DEFAULT_MAX_SNAP_DISTANCE_M, value_parser = parse_snap_distance)]
    max_snap_distance: f64,

    /// Reject requests with more waypoints than this.
    #[arg(long, default_value_t = DEFAULT_MAX_WAYPOINTS)]
    max_waypoints: usize,
}

#[derive(Args, Debug)]
struct RegionArgs {
    /// Point as LAT,LNG. Repeat for every stop.
    #[arg(long = "point", required = true, value_parser = parse_coordinate, allow_hyphen_values = true)]
    points: Vec<Coordinate>,

    /// Derive the longitude scale from the points' latitude instead of the
    /// fixed default.
    #[arg(long)]
    local_scale: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Route(args) => commands::route::handle_route_command(
            &commands::route::RouteCommandArgs {
                graph: args.graph,
                fetch: args.fetch,
                start: args.start,
                end: args.end,
                waypoints: args.waypoints,
                parallel: args.parallel,
                max_snap_distance: args.max_snap_distance,
                max_waypoints: args.max_waypoints,
            },
            cli.format,
        ),
        Command::Region(args) => {
            commands::region::handle_region_command(&args.points, args.local_scale, cli.format)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
