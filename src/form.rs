//! Turning caller-supplied field values into placeholder mappings.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::template::Mapping;

const US_ALIASES: [&str; 4] = ["us", "usa", "united states", "united states of america"];

/// Zip per-field value lists into one mapping per row.
///
/// Rows run up to the longest list; short lists read as empty. Values are
/// trimmed and rows whose values are all empty are dropped.
pub fn pack_repeating(columns: &[(String, Vec<String>)]) -> Vec<Mapping> {
    let rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    (0..rows)
        .filter_map(|i| {
            let row: Vec<(&str, &str)> = columns
                .iter()
                .map(|(field, values)| {
                    (field.as_str(), values.get(i).map_or("", |v| v.trim()))
                })
                .collect();
            row.iter()
                .any(|(_, v)| !v.is_empty())
                .then(|| row.into_iter().collect::<Mapping>())
        })
        .collect()
}

/// `"state, country"`, or just the state for US addresses.
pub fn compose_state_country(state: &str, country: &str) -> String {
    let state = state.trim();
    let country = country.trim();
    if !country.is_empty() && US_ALIASES.contains(&country.to_lowercase().as_str()) {
        return state.to_string();
    }
    match (state.is_empty(), country.is_empty()) {
        (false, false) => format!("{state}, {country}"),
        (false, true) => state.to_string(),
        (true, _) => country.to_string(),
    }
}

/// File-name-safe version of `name`; falls back to `"Document"`.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.'))
        .collect();
    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    let trimmed = joined.trim_matches('_');
    if trimmed.is_empty() {
        "Document".to_string()
    } else {
        trimmed.to_string()
    }
}

fn scalar(token: &str, value: &Value) -> Result<String, Error> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(Error::Input(format!(
            "value for {token:?} must be a string, number, boolean or null"
        ))),
    }
}

fn mapping_from_object(object: &Map<String, Value>) -> Result<Mapping, Error> {
    let mut mapping = Mapping::new();
    for (token, value) in object {
        mapping.insert(token.as_str(), scalar(token, value)?);
    }
    Ok(mapping)
}

/// Parse a JSON object of token → replacement, keeping key order.
pub fn mapping_from_json(json: &str) -> Result<Mapping, Error> {
    let object: Map<String, Value> = serde_json::from_str(json)?;
    mapping_from_object(&object)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsJson {
    Records(Vec<Map<String, Value>>),
    Columns(Map<String, Value>),
}

/// Parse repeating-block items.
///
/// Accepts an array of objects (one mapping per item) or an object of arrays
/// (one list per token, packed row-wise like posted form fields).
pub fn items_from_json(json: &str) -> Result<Vec<Mapping>, Error> {
    match serde_json::from_str::<ItemsJson>(json)? {
        ItemsJson::Records(records) => records.iter().map(mapping_from_object).collect(),
        ItemsJson::Columns(columns) => {
            let mut packed = Vec::with_capacity(columns.len());
            for (token, value) in &columns {
                let Value::Array(values) = value else {
                    return Err(Error::Input(format!("column {token:?} must be an array")));
                };
                let values = values
                    .iter()
                    .map(|v| scalar(token, v))
                    .collect::<Result<Vec<_>, _>>()?;
                packed.push((token.clone(), values));
            }
            Ok(pack_repeating(&packed))
        }
    }
}
