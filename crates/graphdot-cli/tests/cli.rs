use std::fs;

use graphdot::{GraphdotOptions, OutputFormat, run_main};
use graphdot_core::{BuildOptions, ErrorKind, MemoryResolver};
use graphdot_dot::GraphProps;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const DEFAULT_HEADER: &str = concat!(
    "  pad=.25;\n",
    "  ratio=\"fill\";\n",
    "  dpi=360;\n",
    "  nodesep=.25;\n",
    "  node [shape=box];\n",
);

fn simple_resolver() -> MemoryResolver {
    MemoryResolver::new()
        .alias(".", "root")
        .package("root", ["A", "B"])
        .system("A")
        .package("B", ["c"])
        .package("c", Vec::<String>::new())
}

fn monorepo_resolver() -> MemoryResolver {
    MemoryResolver::new()
        .alias(".", "github.com/acme/app")
        .package(
            "github.com/acme/app",
            ["github.com/acme/app/sub1", "github.com/acme/app/sub2", "fmt"],
        )
        .package("github.com/acme/app/sub1", ["github.com/acme/app/sub3"])
        .package("github.com/acme/app/sub2", ["github.com/acme/tool/cli"])
        .package("github.com/acme/app/sub3", ["github.com/other/lib", "os"])
        .package("github.com/acme/tool/cli", ["github.com/acme/tool/internal"])
        .package("github.com/acme/tool/internal", ["github.com/other/lib"])
        .package("github.com/other/lib", Vec::<String>::new())
        .system("fmt")
        .system("os")
}

#[test]
fn system_package_is_left_out_of_the_graph() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path());

    let output = run_main(&opts, simple_resolver()).expect("run");
    let expected = format!(
        "digraph {{\n{DEFAULT_HEADER}{}",
        concat!(
            "  \"4a8a08f09d37b73795649038408b5f33\" [label=\"c\"];\n",
            "  \"63a9f0ea7bb98050796b649e85481845\" [label=\"root\"];\n",
            "  \"9d5ed678fe57bcca610140957afab571\" [label=\"B\"];\n",
            "  \"63a9f0ea7bb98050796b649e85481845\" -> \"9d5ed678fe57bcca610140957afab571\";\n",
            "  \"9d5ed678fe57bcca610140957afab571\" -> \"4a8a08f09d37b73795649038408b5f33\";\n",
            "}\n",
        )
    );
    assert_eq!(output, expected);
    assert!(!output.contains("label=\"A\""));
}

#[test]
fn same_project_packages_collapse_into_the_root() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path()).with_graph_props(GraphProps::Suppressed);

    let output = run_main(&opts, monorepo_resolver()).expect("run");
    assert_eq!(
        output,
        concat!(
            "digraph {\n",
            "  \"0610fc6ed3469ba9aeee7fe6ce45e68c\" [label=\"github.com/acme/tool/cli\"];\n",
            "  \"1a41047851ac011fd8d5b5adb087c5eb\" [label=\"github.com/acme/app\"];\n",
            "  \"fcf40f52c606d503bf6924814f1e0a2a\" [label=\"github.com/other/lib\"];\n",
            "  \"0610fc6ed3469ba9aeee7fe6ce45e68c\" -> \"fcf40f52c606d503bf6924814f1e0a2a\";\n",
            "  \"1a41047851ac011fd8d5b5adb087c5eb\" -> \"0610fc6ed3469ba9aeee7fe6ce45e68c\";\n",
            "  \"1a41047851ac011fd8d5b5adb087c5eb\" -> \"fcf40f52c606d503bf6924814f1e0a2a\";\n",
            "}\n",
        )
    );
}

#[test]
fn no_group_keeps_every_package() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path())
        .with_graph_props(GraphProps::Suppressed)
        .with_group(false);

    let output = run_main(&opts, monorepo_resolver()).expect("run");
    let labels = output.matches("[label=").count();
    assert_eq!(labels, 7, "unexpected node count in:\n{output}");
    assert!(output.contains("github.com/acme/app/sub3"));
    assert!(!output.contains("label=\"os\""));
}

#[test]
fn graph_props_none_has_only_framing() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path())
        .with_graph_props(GraphProps::from_arg(Some("none")));

    let resolver =
        MemoryResolver::new().alias(".", "lonely").package("lonely", ["fmt"]).system("fmt");
    let output = run_main(&opts, resolver).expect("run");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.first(), Some(&"digraph {"));
    assert_eq!(lines.last(), Some(&"}"));
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("[label=\"lonely\"]"));
}

#[test]
fn graph_props_literal_and_file() {
    let dir = tempdir().expect("tempdir");

    let opts = GraphdotOptions::new(dir.path())
        .with_graph_props(GraphProps::from_arg(Some("rankdir=LR")));
    let output = run_main(&opts, simple_resolver()).expect("run");
    assert!(output.starts_with("digraph {\n  rankdir=LR;\n  \""));

    let props = dir.path().join("graph.props");
    fs::write(&props, "    splines=ortho;\n    concentrate=true;\n").expect("write props");
    let opts = GraphdotOptions::new(dir.path())
        .with_graph_props(GraphProps::from_arg(props.to_str()));
    let output = run_main(&opts, simple_resolver()).expect("run");
    assert!(output.starts_with("digraph {\n    splines=ortho;\n    concentrate=true;\n  \""));
}

#[test]
fn unreadable_props_fail_before_resolution() {
    let dir = tempdir().expect("tempdir");
    let props_dir = dir.path().join("props");
    fs::create_dir(&props_dir).expect("mkdir");

    let opts = GraphdotOptions::new(dir.path())
        .with_graph_props(GraphProps::from_arg(props_dir.to_str()));
    // The empty resolver would fail with PackageNotFound if resolution started.
    let err = run_main(&opts, MemoryResolver::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PropertiesUnreadable);
}

#[test]
fn missing_directory_is_an_input_error() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path().join("does-not-exist"));

    let err = run_main(&opts, simple_resolver()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn resolution_errors_produce_no_output() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path());
    let resolver = MemoryResolver::new()
        .alias(".", "root")
        .package("root", ["B"])
        .package("B", ["gone"]);

    let err = run_main(&opts, resolver).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PackageNotFound);
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn parallel_output_is_byte_identical() {
    let dir = tempdir().expect("tempdir");
    let sequential = GraphdotOptions::new(dir.path());
    let parallel =
        GraphdotOptions::new(dir.path()).with_build(BuildOptions::new().with_parallel(true));

    let expected = run_main(&sequential, monorepo_resolver()).expect("sequential");
    for _ in 0..5 {
        assert_eq!(run_main(&parallel, monorepo_resolver()).expect("parallel"), expected);
        assert_eq!(run_main(&sequential, monorepo_resolver()).expect("sequential"), expected);
    }
}

#[test]
fn import_cycle_renders_both_edges() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path()).with_graph_props(GraphProps::Suppressed);
    let resolver = MemoryResolver::new()
        .alias(".", "root")
        .package("root", ["B"])
        .package("B", ["c"])
        .package("c", ["B"]);

    let output = run_main(&opts, resolver).expect("run");
    assert!(output.contains(
        "  \"9d5ed678fe57bcca610140957afab571\" -> \"4a8a08f09d37b73795649038408b5f33\";\n"
    ));
    assert!(output.contains(
        "  \"4a8a08f09d37b73795649038408b5f33\" -> \"9d5ed678fe57bcca610140957afab571\";\n"
    ));
}

#[test]
fn json_format_lists_sorted_graph() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path()).with_format(OutputFormat::Json);

    let output = run_main(&opts, simple_resolver()).expect("run");
    assert!(output.starts_with("{\n  \"nodes\": ["));
    assert!(output.contains("\"label\": \"root\""));
    assert!(!output.contains("digraph"));
    let first = output.find("4a8a08f09d37b73795649038408b5f33").unwrap();
    let second = output.find("63a9f0ea7bb98050796b649e85481845").unwrap();
    assert!(first < second);
}

#[test]
fn cgo_import_is_dropped_and_siblings_kept() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path()).with_graph_props(GraphProps::Suppressed);
    // "C" is never resolved; the resolver has no entry for it.
    let resolver = MemoryResolver::new()
        .alias(".", "root")
        .package("root", ["C", "B"])
        .package("B", ["C", "c"])
        .package("c", Vec::<String>::new());

    let output = run_main(&opts, resolver).expect("run");
    assert_eq!(
        output,
        concat!(
            "digraph {\n",
            "  \"4a8a08f09d37b73795649038408b5f33\" [label=\"c\"];\n",
            "  \"63a9f0ea7bb98050796b649e85481845\" [label=\"root\"];\n",
            "  \"9d5ed678fe57bcca610140957afab571\" [label=\"B\"];\n",
            "  \"63a9f0ea7bb98050796b649e85481845\" -> \"9d5ed678fe57bcca610140957afab571\";\n",
            "  \"9d5ed678fe57bcca610140957afab571\" -> \"4a8a08f09d37b73795649038408b5f33\";\n",
            "}\n",
        )
    );
    assert!(!output.contains("label=\"C\""));
}

#[test]
fn system_root_renders_no_nodes() {
    let dir = tempdir().expect("tempdir");
    let opts = GraphdotOptions::new(dir.path()).with_graph_props(GraphProps::Suppressed);
    let resolver = MemoryResolver::new().alias(".", "fmt").system("fmt");

    let output = run_main(&opts, resolver).expect("run");
    assert_eq!(output, "digraph {\n}\n");
}
