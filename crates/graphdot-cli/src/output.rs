//! Output generation (DOT or JSON).

use std::time::Instant;

use tracing::info;

use graphdot_core::{DependencyGraph, Result};
use graphdot_dot::{GraphHeader, render_dot, render_json};

use crate::OutputFormat;

/// Render the graph in the requested format.
pub fn generate_output(
    format: OutputFormat,
    graph: &DependencyGraph,
    header: &GraphHeader,
) -> Result<String> {
    let render_start = Instant::now();

    let result = match format {
        OutputFormat::Dot => render_dot(graph, header),
        OutputFormat::Json => render_json(graph)?,
    };

    info!(
        ?format,
        bytes = result.len(),
        "Graph rendering: {:.2}s",
        render_start.elapsed().as_secs_f64()
    );

    Ok(result)
}
