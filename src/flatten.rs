use crate::value::{FormMap, FormValue};

/// Replaces every top-level mapping or sequence with its JSON text.
/// Top-level sequences lose their empty slots first; holes deeper down are
/// written as `null`.
pub fn flatten(fields: FormMap) -> FormMap {
    fields
        .into_iter()
        .map(|(key, value)| (key, flatten_value(value)))
        .collect()
}

pub fn flatten_value(value: FormValue) -> FormValue {
    if !value.is_container() {
        return value;
    }
    let value = match value {
        FormValue::Sequence(items) => FormValue::Sequence(compact(items)),
        mapping => mapping,
    };
    FormValue::Text(serde_json::Value::from(value).to_string())
}

/// Drops `Null` slots, keeping the order of what remains.
pub fn compact(items: Vec<FormValue>) -> Vec<FormValue> {
    items.into_iter().filter(|item| !item.is_null()).collect()
}
