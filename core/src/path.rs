//! Joining a host, a route and path parameters into one path string.

use std::fmt;

/// Join `host`, `route` and each parameter's `Display` form with `/`.
///
/// Exactly one separator ends up between two segments: none is inserted when
/// the left side already ends with `/`, and leading slashes on the right side
/// are dropped. An empty segment still gets its separator, so `""` as the
/// last parameter yields a trailing `/`. An empty parameter list leaves
/// `host/route` unchanged.
pub fn join(host: &str, route: &str, params: &[&dyn fmt::Display]) -> String {
    let mut path = String::from(host);
    append(&mut path, route);
    for param in params {
        append(&mut path, &param.to_string());
    }
    path
}

fn append(path: &mut String, segment: &str) {
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(segment.trim_start_matches('/'));
}
