//! graphdot command-line interface.

pub mod options;
pub mod output;
pub mod pipeline;

use graphdot_core::{Error, PackageResolver, Result};

pub use options::{Cli, GraphdotOptions, OutputFormat};
pub use output::generate_output;
pub use pipeline::build_graph;

/// Main entry point: render the dependency graph of the package in `opts.dir`.
///
/// The properties header is loaded before any package is resolved, so a bad
/// properties file fails fast. Nothing is returned on error; a partial graph
/// is never rendered.
pub fn run_main<R: PackageResolver>(opts: &GraphdotOptions, resolver: R) -> Result<String> {
    if !opts.dir.is_dir() {
        return Err(
            Error::directory_not_found(opts.dir.display().to_string()).with_operation("run_main")
        );
    }

    let header = opts.graph_props.load()?;
    let (_tree, graph) = build_graph(opts, resolver)?;
    generate_output(opts.format, &graph, &header)
}
