//! Project identifiers derived from import paths.
//!
//! A project is approximated by a prefix of the slash-separated import path:
//! three segments for hosted repositories (`github.com/owner/repo`) and two
//! for shorter vanity paths (`k8s.io/api`).

const HOSTED_PROJECT_SEGMENTS: usize = 3;
const SHORT_PROJECT_SEGMENTS: usize = 2;

/// Return the first `segments` slash-separated segments of `path`.
///
/// Paths with fewer segments are returned whole.
pub fn path_prefix(path: &str, segments: usize) -> &str {
    if segments == 0 {
        return "";
    }
    match path.match_indices('/').nth(segments - 1) {
        Some((idx, _)) => &path[..idx],
        None => path,
    }
}

fn segment_count(path: &str) -> usize {
    path.split('/').count()
}

/// Project identifiers of a package and its importer.
///
/// Both are cut to three segments, unless either path is shorter than three
/// segments, in which case both are cut to two so that `k8s.io/api` and
/// `k8s.io/api/core/v1` still land in the same project.
pub fn project_prefixes<'a>(node: &'a str, caller: &'a str) -> (&'a str, &'a str) {
    let segments = if segment_count(node) < HOSTED_PROJECT_SEGMENTS
        || segment_count(caller) < HOSTED_PROJECT_SEGMENTS
    {
        SHORT_PROJECT_SEGMENTS
    } else {
        HOSTED_PROJECT_SEGMENTS
    };
    (path_prefix(node, segments), path_prefix(caller, segments))
}

/// Whether a package belongs to the same project as its importer.
pub fn same_project(node: &str, caller: &str) -> bool {
    let (node_project, caller_project) = project_prefixes(node, caller);
    node_project == caller_project
}
