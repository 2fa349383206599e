use memchr::memchr_iter;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::constants::{is_segment_byte, CLOSE_BRACKET, OPEN_BRACKET};

/// One successful form control, as `(name, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: SmolStr,
    pub value: String,
}

impl FieldEntry {
    pub fn new(name: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            name: SmolStr::new(name),
            value: value.into(),
        }
    }
}

/// Anything that can be read as a form field.
pub trait Field {
    fn name(&self) -> &str;
    fn value(&self) -> &str;
}

impl Field for FieldEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }
}

impl<N: AsRef<str>, V: AsRef<str>> Field for (N, V) {
    fn name(&self) -> &str {
        self.0.as_ref()
    }

    fn value(&self) -> &str {
        self.1.as_ref()
    }
}

impl<F: Field + ?Sized> Field for &F {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn value(&self) -> &str {
        (**self).value()
    }
}

/// A field name split into bare prefix and bracket segments.
///
/// Segments follow the pattern `\[(\w+)\]` with ASCII `\w`. The prefix is
/// everything before the first matching segment. Bracket text that does not
/// match is skipped and flagged through `stray`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath<'a> {
    pub prefix: &'a str,
    pub segments: SmallVec<[&'a str; 4]>,
    pub stray: bool,
}

impl<'a> FieldPath<'a> {
    /// Returns `None` when the name holds no well-formed segment, in which
    /// case the whole name is a plain key.
    pub fn split(name: &'a str) -> Option<Self> {
        let bytes = name.as_bytes();
        let mut segments: SmallVec<[&'a str; 4]> = SmallVec::new();
        let mut first_start = None;
        let mut consumed = 0;
        let mut stray = false;

        for open in memchr_iter(OPEN_BRACKET, bytes) {
            if open < consumed {
                continue;
            }
            let Some(close) = match_segment(bytes, open) else {
                continue;
            };
            if first_start.is_none() {
                first_start = Some(open);
            } else if open != consumed {
                stray = true;
            }
            segments.push(&name[open + 1..close]);
            consumed = close + 1;
        }

        let first_start = first_start?;
        if consumed != bytes.len() {
            stray = true;
        }
        Some(Self {
            prefix: &name[..first_start],
            segments,
            stray,
        })
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

/// Index of the closing bracket when `bytes[open..]` starts a segment.
fn match_segment(bytes: &[u8], open: usize) -> Option<usize> {
    let mut idx = open + 1;
    while idx < bytes.len() && is_segment_byte(bytes[idx]) {
        idx += 1;
    }
    if idx == open + 1 || bytes.get(idx) != Some(&CLOSE_BRACKET) {
        return None;
    }
    Some(idx)
}

/// True when the name holds an opening bracket at all.
pub(crate) fn has_bracket(name: &str) -> bool {
    memchr::memchr(OPEN_BRACKET, name.as_bytes()).is_some()
}
