use crate::constants::{MAX_DEPTH, MAX_INDEX_CEILING, MAX_SEQUENCE_INDEX};

/// What happens to nested top-level values once every entry is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flatten {
    /// Keep mappings and sequences as they are.
    #[default]
    Off,
    /// Replace each top-level mapping or sequence with its JSON text.
    Json,
}

impl From<bool> for Flatten {
    fn from(value: bool) -> Self {
        if value {
            Flatten::Json
        } else {
            Flatten::Off
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub flatten: Flatten,
    pub strict: bool,
    pub coerce_numbers: bool,
    pub max_depth: usize,
    pub max_index: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flatten(mut self, flatten: Flatten) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_coerce_numbers(mut self, coerce_numbers: bool) -> Self {
        self.coerce_numbers = coerce_numbers;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Values above `MAX_INDEX_CEILING` are clamped to it.
    pub fn with_max_index(mut self, max_index: usize) -> Self {
        self.max_index = max_index.min(MAX_INDEX_CEILING);
        self
    }

    /// The padding limit actually applied, also for a hand-set `max_index`.
    pub(crate) fn index_limit(&self) -> usize {
        self.max_index.min(MAX_INDEX_CEILING)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            flatten: Flatten::default(),
            strict: false,
            coerce_numbers: true,
            max_depth: MAX_DEPTH,
            max_index: MAX_SEQUENCE_INDEX,
        }
    }
}
