use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::field::{has_bracket, Field, FieldPath};
use crate::flatten::flatten;
use crate::num::number::is_index_like;
use crate::num::{coerce_scalar, parse_index};
use crate::value::{FormMap, FormValue};
use crate::{Error, Flatten, ParseOptions};

/// Outcome of a parse: the built map plus every repair made on the way.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub fields: FormMap,
    pub diagnostics: Vec<Error>,
}

pub(crate) fn parse_entries<I>(entries: I, options: &ParseOptions) -> Parsed
where
    I: IntoIterator,
    I::Item: Field,
{
    let mut walker = Walker::new(options);
    let mut roots = IndexMap::new();
    for entry in entries {
        walker.insert(&mut roots, entry.name(), entry.value());
    }
    let mut fields: FormMap = roots
        .into_iter()
        .map(|(key, node)| {
            let value = walker.finish_root(&key, node);
            (key, value)
        })
        .collect();
    if options.flatten == Flatten::Json {
        fields = flatten(fields);
    }
    Parsed {
        fields,
        diagnostics: walker.diagnostics,
    }
}

/// A value under construction. Sequence slots stay sparse until the walk is
/// done, so a far index costs one entry instead of a run of holes.
#[derive(Debug, Default)]
enum Node {
    #[default]
    Empty,
    Scalar(FormValue),
    Sequence(BTreeMap<usize, Node>),
    Mapping(IndexMap<String, Node>),
}

impl Node {
    fn type_name(&self) -> &'static str {
        match self {
            Node::Empty => "null",
            Node::Scalar(value) => value.type_name(),
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    fn is_container(&self) -> bool {
        matches!(self, Node::Sequence(_) | Node::Mapping(_))
    }
}

struct Walker<'o> {
    options: &'o ParseOptions,
    diagnostics: Vec<Error>,
}

impl<'o> Walker<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, name: &str, error: Error) {
        log::debug!("form field `{name}`: {}", error.message);
        self.diagnostics.push(error.with_field(name));
    }

    fn insert(&mut self, roots: &mut IndexMap<String, Node>, name: &str, value: &str) {
        log::trace!("form field `{name}` = {value:?}");
        let Some(path) = FieldPath::split(name) else {
            if has_bracket(name) {
                self.report(
                    name,
                    Error::syntax("bracket syntax not recognized, name kept as a literal key"),
                );
            }
            if let Some(existing) = roots.get(name) {
                let message = if existing.is_container() {
                    format!("{} replaced by a plain value", existing.type_name())
                } else {
                    "duplicate field, last value wins".to_string()
                };
                self.report(name, Error::conflict(message));
            }
            roots.insert(name.to_string(), Node::Scalar(FormValue::Text(value.to_string())));
            return;
        };

        if path.prefix.is_empty() {
            self.report(name, Error::syntax("field name has no prefix before `[`"));
        }
        if path.stray {
            self.report(name, Error::syntax("ignored bracket text outside `[key]` segments"));
        }

        let mut chain = path.segments.as_slice();
        if path.depth() > self.options.max_depth {
            self.report(
                name,
                Error::limit(format!(
                    "nesting depth {} exceeds limit of {}",
                    path.depth(),
                    self.options.max_depth
                )),
            );
            chain = &chain[..self.options.max_depth];
        }

        let slot = roots.entry(path.prefix.to_string()).or_default();
        let existing = std::mem::take(slot);
        *slot = self.walk(name, existing, chain, value);
    }

    /// Rebuilds `node` with `value` stored at the end of `chain`.
    fn walk(&mut self, name: &str, node: Node, chain: &[&str], value: &str) -> Node {
        let Some((&key, rest)) = chain.split_first() else {
            return self.leaf(name, node, value);
        };

        let index = parse_index(key);
        if index.is_none() && is_index_like(key) {
            self.report(
                name,
                Error::limit(format!("index {key} is out of range, used as a mapping key")),
            );
        }

        match (self.container_for(name, node, index.is_some()), index) {
            (Node::Sequence(mut slots), Some(index)) => {
                let child = slots.remove(&index).unwrap_or_default();
                let child = self.walk(name, child, rest, value);
                slots.insert(index, child);
                Node::Sequence(slots)
            }
            (Node::Mapping(mut map), _) => {
                let slot = map.entry(key.to_string()).or_default();
                let child = std::mem::take(slot);
                *slot = self.walk(name, child, rest, value);
                Node::Mapping(map)
            }
            (other, _) => other,
        }
    }

    /// The container to descend into. An empty slot becomes a sequence for an
    /// index key and a mapping otherwise; a sequence asked for a text key is
    /// promoted to a mapping; a scalar in the way is discarded.
    fn container_for(&mut self, name: &str, node: Node, index_key: bool) -> Node {
        match node {
            Node::Sequence(slots) if !index_key => {
                self.report(
                    name,
                    Error::conflict("sequence received a text key and became a mapping"),
                );
                Node::Mapping(promote(slots))
            }
            Node::Sequence(_) | Node::Mapping(_) => node,
            Node::Empty => empty_container(index_key),
            Node::Scalar(scalar) => {
                self.report(
                    name,
                    Error::conflict(format!(
                        "{} replaced by a nested value",
                        scalar.type_name()
                    )),
                );
                empty_container(index_key)
            }
        }
    }

    fn leaf(&mut self, name: &str, node: Node, value: &str) -> Node {
        match &node {
            Node::Empty => {}
            Node::Sequence(_) | Node::Mapping(_) => self.report(
                name,
                Error::conflict(format!("{} replaced by a plain value", node.type_name())),
            ),
            Node::Scalar(_) => self.report(name, Error::conflict("duplicate field, last value wins")),
        }
        let leaf = if self.options.coerce_numbers {
            coerce_scalar(value)
        } else {
            FormValue::Text(value.to_string())
        };
        Node::Scalar(leaf)
    }

    /// Top-level sequences that are about to be flattened drop their holes
    /// anyway, so they are compacted here without padding.
    fn finish_root(&mut self, key: &str, node: Node) -> FormValue {
        match node {
            Node::Sequence(slots) if self.options.flatten == Flatten::Json => {
                self.compacted(key, slots)
            }
            node => self.finish(key, node),
        }
    }

    /// Turns a built node into its value. Sequences are padded with `Null`
    /// up to their highest index unless that index is above the limit, in
    /// which case they keep only the filled slots.
    fn finish(&mut self, path: &str, node: Node) -> FormValue {
        match node {
            Node::Empty => FormValue::Null,
            Node::Scalar(value) => value,
            Node::Mapping(map) => FormValue::Mapping(
                map.into_iter()
                    .map(|(key, child)| {
                        let value = self.finish(&format!("{path}[{key}]"), child);
                        (key, value)
                    })
                    .collect(),
            ),
            Node::Sequence(slots) => {
                let limit = self.options.index_limit();
                let len = match slots.keys().next_back() {
                    None => Some(0),
                    Some(&last) if last <= limit => last.checked_add(1),
                    Some(_) => None,
                };
                let Some(len) = len else {
                    self.report(
                        path,
                        Error::limit(format!(
                            "sequence index above limit of {limit}, holes dropped"
                        )),
                    );
                    return self.compacted(path, slots);
                };
                let mut items = vec![FormValue::Null; len];
                for (index, child) in slots {
                    items[index] = self.finish(&format!("{path}[{index}]"), child);
                }
                FormValue::Sequence(items)
            }
        }
    }

    fn compacted(&mut self, path: &str, slots: BTreeMap<usize, Node>) -> FormValue {
        FormValue::Sequence(
            slots
                .into_iter()
                .map(|(index, child)| self.finish(&format!("{path}[{index}]"), child))
                .collect(),
        )
    }
}

fn empty_container(index_key: bool) -> Node {
    if index_key {
        Node::Sequence(BTreeMap::new())
    } else {
        Node::Mapping(IndexMap::new())
    }
}

/// Filled slots keep their index as text key, in index order.
fn promote(slots: BTreeMap<usize, Node>) -> IndexMap<String, Node> {
    slots
        .into_iter()
        .map(|(index, node)| (index.to_string(), node))
        .collect()
}
