use regex::Regex;
use std::collections::HashMap;

/// A node in the segment trie. Children of the three kinds may coexist:
/// a node can hold literal children, a parameter child, and a catch-all
/// child at the same time. Matching priority at each depth is
/// literal > parameter > catch-all.
#[derive(Debug)]
pub(crate) struct Node<T> {
    /// Literal children keyed by exact segment text. Only keys that were
    /// inserted resolve — there is no fallback to anything inherited, so
    /// a request segment like `constructor` cannot match by accident.
    pub(crate) static_children: HashMap<String, Node<T>>,
    /// At most one parameter child, shared by every `{name}` and pattern
    /// segment registered at this depth.
    pub(crate) param_child: Option<Box<Node<T>>>,
    /// At most one catch-all child. Catch-alls terminate a route, so this
    /// node never has children of its own.
    pub(crate) wildcard_child: Option<Box<Node<T>>>,
    /// True when some route reached the parameter child through a pattern
    /// segment at this node's depth; gates per-entry pattern selection.
    pub(crate) has_pattern: bool,
    /// Method table, present only at terminals. The empty-string method
    /// is the any-method fallback, consulted after the exact method.
    /// Entries for one method keep insertion order; the first wins.
    pub(crate) methods: HashMap<String, Vec<MethodEntry<T>>>,
}

impl<T> Node<T> {
    pub(crate) fn new() -> Self {
        Self {
            static_children: HashMap::new(),
            param_child: None,
            wildcard_child: None,
            has_pattern: false,
            methods: HashMap::new(),
        }
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One registered route at a terminal: the caller's payload plus the plan
/// for pulling captured values out of a matched segment sequence.
#[derive(Debug, Clone)]
pub(crate) struct MethodEntry<T> {
    pub(crate) data: T,
    /// Capture plan in template order; `None` for fully literal routes.
    pub(crate) captures: Option<Vec<CaptureSlot>>,
    /// Per-segment-position pattern, set only at positions where the
    /// template had a pattern segment. Used to pick between entries that
    /// share a parameter child.
    pub(crate) patterns: Vec<Option<Regex>>,
}

impl<T> MethodEntry<T> {
    pub(crate) fn pattern_at(&self, index: usize) -> Option<&Regex> {
        self.patterns.get(index).and_then(Option::as_ref)
    }

    /// Whether this entry's plan ends with the catch-all, which is the
    /// only capture allowed to match zero segments.
    pub(crate) fn ends_optional(&self) -> bool {
        self.captures
            .as_ref()
            .is_some_and(|slots| matches!(slots.last(), Some(CaptureSlot::CatchAll { .. })))
    }
}

/// One step of a capture plan, addressed by position in the normalized
/// segment sequence.
#[derive(Debug, Clone)]
pub(crate) enum CaptureSlot {
    /// `{name}` — bind the whole segment at `index`.
    Param { index: usize, name: String },
    /// Mixed segment — run `regex` against the segment at `index` and
    /// bind every named group.
    Pattern { index: usize, regex: Regex },
    /// `{...name}` — bind the segments from `start` on, joined with `/`
    /// (the empty string when none remain).
    CatchAll { start: usize, name: String },
}

/// Recursive lookup. Returns the method-entry list of the best terminal
/// for `segments[index..]`, or `None`. `method_missed` latches whenever a
/// terminal fits the path but carries neither the request method nor the
/// any-method fallback; the caller turns that into a 405-style outcome.
pub(crate) fn walk<'a, T>(
    node: &'a Node<T>,
    method: &str,
    segments: &[&str],
    index: usize,
    method_missed: &mut bool,
) -> Option<&'a [MethodEntry<T>]> {
    if index == segments.len() {
        return walk_end(node, method, method_missed);
    }

    let segment = segments[index];

    if let Some(child) = node.static_children.get(segment) {
        // A literal child claims its segment outright: the parameter
        // sibling is not consulted even when the literal subtree comes up
        // empty. Only the catch-all below remains as a fallback.
        if let Some(entries) = walk(child, method, segments, index + 1, method_missed) {
            return Some(entries);
        }
    } else if let Some(child) = &node.param_child {
        // A parameter consumes exactly one non-empty segment; an empty
        // interior segment only ever matches an empty literal.
        if !segment.is_empty() {
            if let Some(entries) = walk(child, method, segments, index + 1, method_missed) {
                if child.has_pattern {
                    if let Some(entry) = select_by_pattern(entries, index, segment) {
                        return Some(std::slice::from_ref(entry));
                    }
                } else {
                    return Some(entries);
                }
            }
        }
    }

    if let Some(child) = &node.wildcard_child {
        if !child.methods.is_empty() {
            if let Some(entries) = method_entries(&child.methods, method) {
                return Some(entries);
            }
            *method_missed = true;
        }
    }

    None
}

/// End of input. The node's own methods win; otherwise a parameter or
/// catch-all child may still match zero further segments, but only
/// through an entry whose plan ends with the optional catch-all.
fn walk_end<'a, T>(
    node: &'a Node<T>,
    method: &str,
    method_missed: &mut bool,
) -> Option<&'a [MethodEntry<T>]> {
    if !node.methods.is_empty() {
        if let Some(entries) = method_entries(&node.methods, method) {
            return Some(entries);
        }
        *method_missed = true;
    }

    for child in [node.param_child.as_deref(), node.wildcard_child.as_deref()]
        .into_iter()
        .flatten()
    {
        if child.methods.is_empty() {
            continue;
        }
        match method_entries(&child.methods, method) {
            Some(entries) => {
                if optional_tail(entries) {
                    return Some(entries);
                }
            }
            // The path would exist here under some other method, but only
            // if a zero-segment match were possible at all.
            None => {
                if child.methods.values().any(|entries| optional_tail(entries)) {
                    *method_missed = true;
                }
            }
        }
    }

    None
}

/// Exact method first, then the any-method fallback.
fn method_entries<'a, T>(
    methods: &'a HashMap<String, Vec<MethodEntry<T>>>,
    method: &str,
) -> Option<&'a [MethodEntry<T>]> {
    methods
        .get(method)
        .or_else(|| methods.get(""))
        .map(Vec::as_slice)
}

fn optional_tail<T>(entries: &[MethodEntry<T>]) -> bool {
    entries.first().is_some_and(MethodEntry::ends_optional)
}

/// Among entries sharing a parameter child, prefer the first whose
/// pattern at this position accepts the segment, then the first with no
/// pattern there (a plain parameter absorbs any non-empty segment).
fn select_by_pattern<'a, T>(
    entries: &'a [MethodEntry<T>],
    index: usize,
    segment: &str,
) -> Option<&'a MethodEntry<T>> {
    entries
        .iter()
        .find(|entry| {
            entry
                .pattern_at(index)
                .is_some_and(|regex| regex.is_match(segment))
        })
        .or_else(|| entries.iter().find(|entry| entry.pattern_at(index).is_none()))
}

/// Collect every registered payload under `node`, depth-first. Order is
/// not specified; this feeds debug and metrics surfaces only.
pub(crate) fn collect_payloads<'a, T>(node: &'a Node<T>, out: &mut Vec<&'a T>) {
    for entries in node.methods.values() {
        for entry in entries {
            out.push(&entry.data);
        }
    }
    for child in node.static_children.values() {
        collect_payloads(child, out);
    }
    if let Some(child) = &node.param_child {
        collect_payloads(child, out);
    }
    if let Some(child) = &node.wildcard_child {
        collect_payloads(child, out);
    }
}
