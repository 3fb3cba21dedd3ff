//! Command-line options for graphdot.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use graphdot_core::BuildOptions;
use graphdot_dot::GraphProps;

/// Output format of the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// JSON with sorted nodes and edges
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "graphdot",
    about = "graphdot: render the package dependency graph of a Go module as DOT",
    version
)]
pub struct Cli {
    /// Directory of the package to analyze (defaults to the current directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Select a file to be inserted as graph properties into the dot output.
    /// If not set some default properties are inserted. When set to 'none' no
    /// properties are inserted. If the file does not exist, the value itself
    /// is inserted as a graph property.
    #[arg(short = 'p', long = "graph-props", value_name = "PROPS")]
    pub graph_props: Option<String>,

    /// Also follow the imports of the root package's tests
    #[arg(long, default_value_t = false)]
    pub tests: bool,

    /// Do not collapse packages of the same project into their importer
    #[arg(long = "no-group", default_value_t = false)]
    pub no_group: bool,

    /// Resolve sibling imports in parallel
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
    pub format: OutputFormat,

    /// Print the grouped dependency tree to stderr
    #[arg(long = "print-tree", default_value_t = false)]
    pub print_tree: bool,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Go binary used to resolve packages
    #[arg(long, env = "GRAPHDOT_GO", default_value = "go", value_name = "BIN")]
    pub go: PathBuf,
}

/// Options for a single graphdot run.
#[derive(Debug, Clone)]
pub struct GraphdotOptions {
    /// Directory whose package is the root of the graph.
    pub dir: PathBuf,
    pub graph_props: GraphProps,
    pub build: BuildOptions,
    pub group: bool,
    pub format: OutputFormat,
    pub print_tree: bool,
}

impl GraphdotOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            graph_props: GraphProps::Default,
            build: BuildOptions::default(),
            group: true,
            format: OutputFormat::Dot,
            print_tree: false,
        }
    }

    pub fn with_graph_props(mut self, graph_props: GraphProps) -> Self {
        self.graph_props = graph_props;
        self
    }

    pub fn with_build(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    pub fn with_group(mut self, group: bool) -> Self {
        self.group = group;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_print_tree(mut self, print_tree: bool) -> Self {
        self.print_tree = print_tree;
        self
    }
}

impl Cli {
    /// Convert parsed arguments into run options rooted at `default_dir`
    /// when no directory was given.
    pub fn to_options(&self, default_dir: PathBuf) -> GraphdotOptions {
        GraphdotOptions::new(self.dir.clone().unwrap_or(default_dir))
            .with_graph_props(GraphProps::from_arg(self.graph_props.as_deref()))
            .with_build(
                BuildOptions::new()
                    .with_include_tests(self.tests)
                    .with_parallel(self.parallel),
            )
            .with_group(!self.no_group)
            .with_format(self.format)
            .with_print_tree(self.print_tree)
    }
}
