use regex::Regex;

/// Boundary segment inserted between hostname labels and path segments so
/// that host-scoped and plain routes share a single tree root. Path
/// segments cannot contain `/`, so the value can never collide with one.
pub(crate) const HOST_BOUNDARY: &str = "//";

/// How a single route-template segment participates in matching.
#[derive(Debug)]
pub(crate) enum SegmentKind {
    /// Matched by byte equality.
    Literal,
    /// `{name}` — matches exactly one non-empty segment.
    Param(String),
    /// `{...name}` — matches all remaining segments, joined with `/`.
    CatchAll(String),
    /// Literal text interleaved with `{name}` placeholders, matched as a
    /// whole segment against an anchored regex with named groups.
    Pattern(Regex),
}

/// Classify one route-template segment.
///
/// Classification is total: a segment that is not a well-formed
/// placeholder, catch-all, or placeholder-bearing pattern is a literal,
/// including the empty segment.
pub(crate) fn classify(segment: &str) -> SegmentKind {
    if let Some(name) = segment.strip_prefix("{...").and_then(|rest| rest.strip_suffix('}')) {
        if is_param_name(name) {
            return SegmentKind::CatchAll(name.to_string());
        }
    }
    if let Some(name) = segment.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
        if is_param_name(name) {
            return SegmentKind::Param(name.to_string());
        }
    }
    match compile_pattern(segment) {
        Some(regex) => SegmentKind::Pattern(regex),
        None => SegmentKind::Literal,
    }
}

/// Split a route template or request target into its normalized segment
/// sequence: a single trailing `/` is dropped, the leading `/` is
/// implicit, and empty interior segments (`//`) are preserved. Hostname
/// labels, when present, are prepended followed by [`HOST_BOUNDARY`].
pub(crate) fn normalize<'a>(domain: Option<&'a str>, path: &'a str) -> Vec<&'a str> {
    let path = strip_trailing_slash(path);
    let tail = path.strip_prefix('/').unwrap_or(path);

    let mut segments = Vec::new();
    if let Some(domain) = domain {
        segments.extend(domain.split('.'));
        segments.push(HOST_BOUNDARY);
    }
    if !tail.is_empty() {
        segments.extend(tail.split('/'));
    }
    segments
}

/// Remove at most one trailing `/`. Trailing slashes are non-semantic on
/// both registration and lookup; a second one survives as an empty
/// trailing segment.
pub(crate) fn strip_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_param_name(name: &str) -> bool {
    match name.as_bytes().first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return false,
    }
    name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Build the anchored regex for a mixed segment, or `None` when the
/// segment carries no well-formed placeholder and is therefore a literal.
///
/// Each `{name}` becomes a named group `[^/]+`; literal runs are escaped
/// verbatim, so a zero-length segment can never satisfy the pattern.
fn compile_pattern(segment: &str) -> Option<Regex> {
    let mut pattern = String::with_capacity(segment.len() + 16);
    pattern.push('^');
    let mut has_placeholder = false;

    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        if let Some(len) = rest[open..].find('}') {
            let name = &rest[open + 1..open + len];
            if is_param_name(name) {
                pattern.push_str(&regex::escape(&rest[..open]));
                pattern.push_str("(?P<");
                pattern.push_str(name);
                pattern.push_str(">[^/]+)");
                has_placeholder = true;
                rest = &rest[open + len + 1..];
                continue;
            }
        }
        // Unterminated brace or malformed name: the brace is literal text.
        pattern.push_str(&regex::escape(&rest[..=open]));
        rest = &rest[open + 1..];
    }

    if !has_placeholder {
        return None;
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');

    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::error!(
                "router: segment pattern failed to compile, segment={}, error={}",
                segment,
                e
            );
            None
        }
    }
}
