//! Output formatting for route and region rendering.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use walkroute_lib::{Region, RoutePlan};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Render a planned route.
pub fn render_route(plan: &RoutePlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_route_text(plan)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(plan)?),
    }
}

fn render_route_text(plan: &RoutePlan) -> String {
    let order = plan
        .order
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut out = String::new();
    let _ = writeln!(out, "Distance: {:.1}", plan.distance);
    let _ = writeln!(out, "Order: {}", order);
    let _ = writeln!(
        out,
        "Orderings: {} evaluated, {} pruned",
        plan.orderings_evaluated, plan.orderings_pruned
    );
    let _ = writeln!(out, "Route ({} points):", plan.route.len());
    for point in &plan.route {
        let _ = writeln!(out, "- {:.6}, {:.6}", point.lat, point.lng);
    }
    out
}

#[derive(Serialize)]
struct RegionOutput {
    lat: f64,
    lng: f64,
    radius_m: f64,
}

/// Render a region estimate.
pub fn render_region(region: &Region, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "Center: {:.6}, {:.6}\nRadius: {:.0} m\n",
            region.center.lat, region.center.lng, region.radius_m
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&RegionOutput {
            lat: region.center.lat,
            lng: region.center.lng,
            radius_m: region.radius_m,
        })?),
    }
}
