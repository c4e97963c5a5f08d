// crates/puli-core/src/listing.rs - State-partitioned listings
//
// Most list commands share one output shape: entities are grouped by a state
// (enabled, disabled, broken, ...) and, within each state, by a secondary key
// such as the package that declares them.
//
// ```text
// The following bindings are currently enabled:
//
//     Package: vendor/root
//
//     UUID    Glob           Type
//     bb5a07  /root/enabled  my/type
//
// The following bindings are disabled:
//  (use "puli bind --enable <uuid>" to enable)
//
//     Package: vendor/root
//     ...
// ```
//
// HEADER RULES:
// - State headers print only when more than one state is selected
// - Group headers print only when more than one key is selected
// - Empty buckets print nothing at all
// - Nothing printed anywhere -> one advisory line
//
// INDENTATION:
// Group headers and bucket content are indented one level when state headers
// print and not at all otherwise. Group headers alone do not indent rows.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{RenderError, RenderResult};

/// Header block printed above the entities of one state
///
/// Title and hints are emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateHeader {
    pub title: String,
    pub hints: Vec<String>,
}

impl StateHeader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hints: Vec::new(),
        }
    }

    /// Add a remediation line printed below the title
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

type GroupLabel<K> = Box<dyn Fn(&K) -> String>;

/// Presents entities partitioned by `(state, key)`
///
/// States are visited in their `Ord` order, which callers define to be the
/// canonical order of their state enum. Keys are visited in the order given.
/// Entities keep their input order inside a bucket. Entities whose state or
/// key is not selected are left out.
pub struct GroupedListing<S, K> {
    states: Vec<S>,
    keys: Vec<K>,
    headers: IndexMap<S, StateHeader>,
    group_label: GroupLabel<K>,
    empty_message: String,
    indent: usize,
}

impl<S, K> GroupedListing<S, K>
where
    S: Copy + Ord + Hash + Debug,
    K: PartialEq + Display + 'static,
{
    /// Create a listing over the selected states and keys
    pub fn new<IS, IK>(states: IS, keys: IK) -> Self
    where
        IS: IntoIterator<Item = S>,
        IK: IntoIterator<Item = K>,
    {
        let mut unique_keys: Vec<K> = Vec::new();
        for key in keys {
            if !unique_keys.contains(&key) {
                unique_keys.push(key);
            }
        }

        Self {
            states: states.into_iter().collect(),
            keys: unique_keys,
            headers: IndexMap::new(),
            group_label: Box::new(|key: &K| key.to_string()),
            empty_message: "No entries found.".to_string(),
            indent: 4,
        }
    }

    pub fn state_header(mut self, state: S, header: StateHeader) -> Self {
        self.headers.insert(state, header);
        self
    }

    /// Register headers for several states at once
    pub fn state_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (S, StateHeader)>,
    {
        self.headers.extend(headers);
        self
    }

    /// Format the label printed above each group, e.g. `Package: vendor/root`
    pub fn group_label(mut self, label: impl Fn(&K) -> String + 'static) -> Self {
        self.group_label = Box::new(label);
        self
    }

    /// Line printed when no bucket has any entity
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Spaces per nesting level
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Render the listing
    ///
    /// `classify` maps every entity to its state and key. `render_group`
    /// receives the non-empty bucket of one `(state, key)` pair and returns
    /// its unindented lines; the presenter applies the nesting indentation.
    pub fn present<E, C, R>(
        &self,
        entities: &[E],
        classify: C,
        mut render_group: R,
    ) -> RenderResult<Vec<String>>
    where
        C: Fn(&E) -> (S, K),
        R: FnMut(S, &[&E]) -> RenderResult<Vec<String>>,
    {
        let states = self.canonical_states()?;
        let print_state_headers = states.len() > 1;
        let print_group_headers = self.keys.len() > 1;

        if print_state_headers {
            if let Some(state) = states.iter().find(|s| !self.headers.contains_key(*s)) {
                return Err(RenderError::MissingStateHeader(format!("{state:?}")));
            }
        }

        // Rows follow the state header level only, group headers never shift them
        let level = if print_state_headers { self.indent } else { 0 };
        let content_prefix = " ".repeat(level);
        let group_prefix = " ".repeat(level);

        let classified: Vec<(S, K)> = entities.iter().map(&classify).collect();
        let mut lines = Vec::new();
        let mut printed_any = false;

        for state in states {
            let mut state_header_printed = !print_state_headers;

            for key in &self.keys {
                let bucket: Vec<&E> = entities
                    .iter()
                    .zip(&classified)
                    .filter(|(_, (s, k))| *s == state && k == key)
                    .map(|(entity, _)| entity)
                    .collect();

                if bucket.is_empty() {
                    trace!(?state, %key, "skipping empty bucket");
                    continue;
                }
                debug!(?state, %key, entities = bucket.len(), "rendering bucket");

                if !state_header_printed {
                    // Checked above: every selected state has a header
                    if let Some(header) = self.headers.get(&state) {
                        lines.push(header.title.clone());
                        lines.extend(header.hints.iter().cloned());
                        lines.push(String::new());
                    }
                    state_header_printed = true;
                }

                if print_group_headers {
                    lines.push(format!("{}{}", group_prefix, (self.group_label)(key)));
                    lines.push(String::new());
                }

                for line in render_group(state, &bucket)? {
                    if line.is_empty() {
                        lines.push(line);
                    } else {
                        lines.push(format!("{content_prefix}{line}"));
                    }
                }

                if print_state_headers || print_group_headers {
                    lines.push(String::new());
                }
                printed_any = true;
            }
        }

        if !printed_any {
            return Ok(vec![self.empty_message.clone()]);
        }

        Ok(lines)
    }

    fn canonical_states(&self) -> RenderResult<Vec<S>> {
        let mut states = self.states.clone();
        states.sort();
        if let Some(pair) = states.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(RenderError::DuplicateState(format!("{:?}", pair[0])));
        }
        Ok(states)
    }
}

/// Convenience for listings without a secondary key
impl<S> GroupedListing<S, NoGroup>
where
    S: Copy + Ord + Hash + Debug,
{
    pub fn by_state<IS>(states: IS) -> Self
    where
        IS: IntoIterator<Item = S>,
    {
        Self::new(states, [NoGroup])
    }
}

/// The single key of a listing that is only partitioned by state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoGroup;

impl Display for NoGroup {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}
