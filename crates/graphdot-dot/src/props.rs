//! Graph properties written at the top of the `digraph` block.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use graphdot_error::{Error, Result};

use crate::dot::DotBuilder;

/// Statements emitted when no properties are requested.
pub const DEFAULT_PROPS: [&str; 5] = [
    "pad=.25",
    "ratio=\"fill\"",
    "dpi=360",
    "nodesep=.25",
    "node [shape=box]",
];

/// Value of `--graph-props` that disables the header.
pub const SUPPRESS_PROPS: &str = "none";

/// Where the header of the generated graph comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GraphProps {
    /// The built-in layout statements.
    #[default]
    Default,
    /// No header at all.
    Suppressed,
    /// Contents of a file, copied verbatim.
    FromFile(PathBuf),
    /// A single statement given on the command line.
    Literal(String),
}

impl GraphProps {
    /// Interpret the `--graph-props` argument.
    ///
    /// An existing path is a properties file; any other value is a literal
    /// statement, except for `none` and blank values.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Default,
            Some(value) if value.trim().is_empty() => Self::Default,
            Some(SUPPRESS_PROPS) => Self::Suppressed,
            Some(value) if Path::new(value).exists() => Self::FromFile(PathBuf::from(value)),
            Some(value) => Self::Literal(value.to_string()),
        }
    }

    /// Produce the header text, reading the properties file if there is one.
    pub fn load(&self) -> Result<GraphHeader> {
        match self {
            Self::Default => Ok(GraphHeader::defaults()),
            Self::Suppressed => Ok(GraphHeader::empty()),
            Self::FromFile(path) => {
                let text = fs::read_to_string(path).map_err(|err| {
                    Error::properties_unreadable(
                        path.display().to_string(),
                        format!("cannot read graph properties file: {err}"),
                    )
                    .with_operation("props::load")
                    .set_source(err)
                })?;
                debug!(path = %path.display(), bytes = text.len(), "loaded graph properties");
                Ok(GraphHeader::Verbatim(text))
            }
            Self::Literal(statement) => {
                let statement = statement.trim();
                let statement = statement.strip_suffix(';').unwrap_or(statement).trim_end();
                if statement.is_empty() {
                    return Ok(GraphHeader::defaults());
                }
                Ok(GraphHeader::Statements(vec![statement.to_string()]))
            }
        }
    }
}

/// Header content ready to be written into a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphHeader {
    /// Statements written one per line, each terminated by `;`.
    Statements(Vec<String>),
    /// Text inserted unchanged.
    Verbatim(String),
}

impl Default for GraphHeader {
    fn default() -> Self {
        Self::defaults()
    }
}

impl GraphHeader {
    pub fn defaults() -> Self {
        Self::Statements(DEFAULT_PROPS.iter().map(|s| s.to_string()).collect())
    }

    pub fn empty() -> Self {
        Self::Statements(Vec::new())
    }

    pub(crate) fn write_to(&self, dot: &mut DotBuilder) {
        match self {
            Self::Statements(statements) => {
                for statement in statements {
                    dot.statement(statement);
                }
            }
            Self::Verbatim(text) => {
                dot.raw(text);
            }
        }
    }
}
