//! `pdfinfo` output as a JSON object

use serde_json::{Map, Value};

/// Convert `Key: value` lines into an object with camelCased keys.
///
/// `PDF version:    1.3` becomes `"pdfVersion": "1.3"`. Lines without a
/// `": "` separator are skipped; values are trimmed but otherwise kept as
/// strings.
pub fn parse_info(stdout: &str) -> Map<String, Value> {
    let mut info = Map::new();

    for line in stdout.lines() {
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        let key = camel_case(key);
        if key.is_empty() {
            continue;
        }
        info.insert(key, Value::String(value.trim().to_string()));
    }

    info
}

/// `Page size` -> `pageSize`, `PDF version` -> `pdfVersion`,
/// `JavaScript` -> `javaScript`
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());

    for (i, word) in key
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        if i == 0 {
            if word.chars().all(|c| !c.is_lowercase()) {
                out.push_str(&word.to_lowercase());
            } else {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_lowercase());
                    out.push_str(chars.as_str());
                }
            }
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }

    out
}
