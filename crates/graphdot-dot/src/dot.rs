//! DOT format utilities for graph rendering.

use std::fmt::Write;

/// Escape special characters for DOT labels and quoted ids.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Builder for a `digraph` whose node and edge statements come out sorted.
///
/// Header statements are written in insertion order. Node and edge
/// declarations are buffered, deduplicated and sorted by their full text on
/// [`DotBuilder::build`], nodes before edges, so the result does not depend on
/// the order in which the graph was walked.
pub struct DotBuilder {
    output: String,
    indent: usize,
    nodes: Vec<String>,
    edges: Vec<String>,
}

impl Default for DotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DotBuilder {
    /// Start an anonymous directed graph.
    pub fn new() -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str("digraph {\n");
        Self {
            output,
            indent: 1,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a header statement; the terminating `;` is appended.
    pub fn statement(&mut self, statement: &str) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "{statement};");
        self
    }

    /// Append pre-formatted header text as is.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.output.push_str(text);
        if !text.is_empty() && !text.ends_with('\n') {
            self.output.push('\n');
        }
        self
    }

    /// Declare a node with a quoted id and label.
    pub fn node(&mut self, id: &str, label: &str) -> &mut Self {
        let mut line = String::new();
        write_indent(&mut line, self.indent);
        let _ = write!(
            line,
            "\"{}\" [label=\"{}\"];",
            escape_label(id),
            escape_label(label)
        );
        self.nodes.push(line);
        self
    }

    /// Declare an edge between two quoted ids.
    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        let mut line = String::new();
        write_indent(&mut line, self.indent);
        let _ = write!(
            line,
            "\"{}\" -> \"{}\";",
            escape_label(from),
            escape_label(to)
        );
        self.edges.push(line);
        self
    }

    /// Finish building and return the DOT string.
    pub fn build(mut self) -> String {
        for lines in [&mut self.nodes, &mut self.edges] {
            lines.sort_unstable();
            lines.dedup();
        }
        for line in self.nodes.iter().chain(self.edges.iter()) {
            self.output.push_str(line);
            self.output.push('\n');
        }
        self.output.push_str("}\n");
        self.output
    }
}
