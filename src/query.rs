use crate::field::FieldEntry;
use crate::flatten::flatten_value;
use crate::value::{FormMap, FormValue};

/// Decodes an `application/x-www-form-urlencoded` body into entries, in order.
pub fn entries_from_urlencoded(input: &[u8]) -> Vec<FieldEntry> {
    form_urlencoded::parse(input)
        .map(|(name, value)| FieldEntry::new(name, value))
        .collect()
}

/// Groups a query string by key. A key seen once holds its text; a repeated
/// key holds a sequence of every value in order. Names are not split on
/// brackets here.
pub fn group_query(query: &str) -> FormMap {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut out = FormMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = FormValue::Text(value.into_owned());
        match out.get_mut(&*key) {
            Some(FormValue::Sequence(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = FormValue::Sequence(vec![first, value]);
            }
            None => {
                out.insert(key.into_owned(), value);
            }
        }
    }
    out
}

/// Writes a map as a url-encoded body. Nested values are flattened to JSON
/// text first.
pub fn to_urlencoded(fields: &FormMap) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        let text = match value.to_text() {
            Some(text) => text,
            None => flatten_value(value.clone()).to_text().unwrap_or_default(),
        };
        serializer.append_pair(key, &text);
    }
    serializer.finish()
}
