use crate::segment::{self, SegmentKind};
use crate::tree::{collect_payloads, walk, CaptureSlot, MethodEntry, Node};
use regex::Regex;
use std::collections::HashMap;

/// The route matcher. Holds every registered template in one segment
/// trie, plus a flat fast-path table for fully literal, domain-agnostic
/// routes.
///
/// The intended lifecycle is two-phase: register all routes up front,
/// then serve lookups. `find_route` takes `&self`, so once registration
/// ends the router is safe to share across threads.
#[derive(Debug)]
pub struct Router<T> {
    root: Node<T>,
    /// Trailing-slash-stripped path -> method table, for routes with no
    /// captures and no domain. A pure fast path: the trie walk would
    /// produce the same answer.
    static_paths: HashMap<String, HashMap<String, Vec<MethodEntry<T>>>>,
    route_count: usize,
}

/// The outcome of a lookup.
#[derive(Debug)]
pub enum RouteMatch<'a, T> {
    /// A route matched; payload and captures inside.
    Found(MatchedRoute<'a, T>),
    /// The path exists under at least one other method, but not this one
    /// (and no any-method fallback was registered for it).
    MethodNotAllowed,
    /// No registered template matches the path at all.
    NotFound,
}

/// A successful match.
#[derive(Debug)]
pub struct MatchedRoute<'a, T> {
    /// The payload supplied at registration.
    pub data: &'a T,
    /// Captured parameter bindings, `None` when the template had none.
    /// Values are raw path substrings — no percent-decoding. Only names
    /// that appear in the template are present.
    pub params: Option<HashMap<String, String>>,
    /// True when the match was served from the fast-path table, i.e. the
    /// route is fully literal and domain-agnostic. Hosts use this to skip
    /// per-parameter work.
    pub is_static: bool,
}

impl<T> Router<T> {
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            static_paths: HashMap::new(),
            route_count: 0,
        }
    }

    /// Register a route template.
    ///
    /// `method` is any ASCII token; the empty string registers an
    /// any-method fallback. A missing leading `/` on `path` is supplied.
    /// `domain` may itself carry `{name}` placeholders, matched exactly
    /// like path parameters against the request hostname's dot-separated
    /// labels.
    ///
    /// Registration is total: no template is rejected. Later duplicates
    /// of an identical (method, path, domain) are retained but shadowed
    /// by the first.
    pub fn add_route(&mut self, method: &str, path: &str, data: T, domain: Option<&str>)
    where
        T: Clone,
    {
        let method = method.to_ascii_uppercase();
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let segments = segment::normalize(domain, &path);
        let total = segments.len();

        let mut captures: Vec<CaptureSlot> = Vec::new();
        let mut patterns: Vec<Option<Regex>> = Vec::new();
        let mut node = &mut self.root;

        for (index, seg) in segments.iter().enumerate() {
            match segment::classify(seg) {
                SegmentKind::CatchAll(name) => {
                    node = &mut **node.wildcard_child.get_or_insert_with(Default::default);
                    captures.push(CaptureSlot::CatchAll { start: index, name });
                    if index + 1 < total {
                        tracing::error!(
                            "router: segments after a catch-all are unreachable, path={}",
                            path
                        );
                    }
                    break;
                }
                SegmentKind::Param(name) => {
                    node = &mut **node.param_child.get_or_insert_with(Default::default);
                    captures.push(CaptureSlot::Param { index, name });
                }
                SegmentKind::Pattern(regex) => {
                    let child = &mut **node.param_child.get_or_insert_with(Default::default);
                    child.has_pattern = true;
                    if patterns.len() <= index {
                        patterns.resize_with(index + 1, || None);
                    }
                    patterns[index] = Some(regex.clone());
                    captures.push(CaptureSlot::Pattern { index, regex });
                    node = child;
                }
                SegmentKind::Literal => {
                    node = node.static_children.entry((*seg).to_string()).or_default();
                }
            }
        }

        let entry = MethodEntry {
            data,
            captures: if captures.is_empty() {
                None
            } else {
                Some(captures)
            },
            patterns,
        };

        if entry.captures.is_none() && domain.is_none() {
            let key = segment::strip_trailing_slash(&path).to_string();
            self.static_paths
                .entry(key)
                .or_default()
                .entry(method.clone())
                .or_default()
                .push(entry.clone());
        }

        node.methods.entry(method.clone()).or_default().push(entry);
        self.route_count += 1;

        tracing::debug!(
            "router: registered route, method={}, path={}, domain={}",
            if method.is_empty() { "*" } else { method.as_str() },
            path,
            domain.unwrap_or("-"),
        );
    }

    /// Resolve a request to a registered route.
    ///
    /// When a hostname is supplied, host-scoped routes are consulted
    /// first and domain-agnostic routes serve as the fallback. Trailing
    /// slashes never affect the result. The method token is folded to
    /// upper-case ASCII before matching.
    pub fn find_route<'a>(
        &'a self,
        method: &str,
        path: &str,
        hostname: Option<&str>,
    ) -> RouteMatch<'a, T> {
        let method = method.to_ascii_uppercase();
        let trimmed = segment::strip_trailing_slash(path);
        let mut method_missed = false;

        if let Some(host) = hostname {
            let scoped = format!("{host}::{trimmed}");
            if let Some(found) = self.static_lookup(&scoped, &method, &mut method_missed) {
                return found;
            }
            let segments = segment::normalize(Some(host), path);
            if let Some(found) = self.tree_lookup(&method, &segments, &mut method_missed) {
                return found;
            }
        }

        if let Some(found) = self.static_lookup(trimmed, &method, &mut method_missed) {
            return found;
        }
        let segments = segment::normalize(None, path);
        if let Some(found) = self.tree_lookup(&method, &segments, &mut method_missed) {
            return found;
        }

        if method_missed {
            RouteMatch::MethodNotAllowed
        } else {
            RouteMatch::NotFound
        }
    }

    /// Number of registered routes, duplicates included.
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Collect every registered payload (for debug/metrics surfaces).
    /// Order is unspecified.
    pub fn all_routes(&self) -> Vec<&T> {
        let mut out = Vec::with_capacity(self.route_count);
        collect_payloads(&self.root, &mut out);
        out
    }

    /// Fast-path probe. A hit bypasses the trie entirely; a terminal that
    /// exists without the method latches the mismatch signal and defers
    /// to the trie, which may still match through a parameter route.
    fn static_lookup(
        &self,
        key: &str,
        method: &str,
        method_missed: &mut bool,
    ) -> Option<RouteMatch<'_, T>> {
        let table = self.static_paths.get(key)?;
        match table.get(method).or_else(|| table.get("")) {
            Some(entries) => {
                let entry = entries.first()?;
                Some(RouteMatch::Found(MatchedRoute {
                    data: &entry.data,
                    params: None,
                    is_static: true,
                }))
            }
            None => {
                *method_missed = true;
                None
            }
        }
    }

    fn tree_lookup(
        &self,
        method: &str,
        segments: &[&str],
        method_missed: &mut bool,
    ) -> Option<RouteMatch<'_, T>> {
        let entries = walk(&self.root, method, segments, 0, method_missed)?;
        let entry = entries.first()?;
        Some(RouteMatch::Found(MatchedRoute {
            data: &entry.data,
            params: extract_params(entry, segments),
            is_static: false,
        }))
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bind captured values per the matched entry's plan. Returns `None` for
/// capture-free routes so callers can skip parameter handling outright.
fn extract_params<T>(entry: &MethodEntry<T>, segments: &[&str]) -> Option<HashMap<String, String>> {
    let slots = entry.captures.as_ref()?;
    let mut params = HashMap::with_capacity(slots.len());

    for slot in slots {
        match slot {
            CaptureSlot::Param { index, name } => {
                if let Some(seg) = segments.get(*index) {
                    params.insert(name.clone(), (*seg).to_string());
                }
            }
            CaptureSlot::Pattern { index, regex } => {
                let Some(seg) = segments.get(*index) else {
                    continue;
                };
                if let Some(caps) = regex.captures(seg) {
                    for name in regex.capture_names().flatten() {
                        if let Some(m) = caps.name(name) {
                            params.insert(name.to_string(), m.as_str().to_string());
                        }
                    }
                }
            }
            CaptureSlot::CatchAll { start, name } => {
                let rest = if *start < segments.len() {
                    segments[*start..].join("/")
                } else {
                    String::new()
                };
                params.insert(name.clone(), rest);
            }
        }
    }

    Some(params)
}
