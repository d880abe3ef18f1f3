//! Display helpers shared by the screens

use std::collections::BTreeMap;

/// Local wall-clock time of an RFC 3339 timestamp, e.g. `14:05`
pub fn local_time(timestamp: &str) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_str(timestamp));
    if date.get_time().is_nan() {
        return String::new();
    }
    format!("{:02}:{:02}", date.get_hours(), date.get_minutes())
}

pub fn percent(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{:.0}%", rate)
    } else {
        format!("{:.1}%", rate)
    }
}

/// `1234` -> `1.2k`, `2500000` -> `2.5M`
pub fn compact_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => format!("{:.1}k", count as f64 / 1_000.0),
        _ => format!("{:.1}M", count as f64 / 1_000_000.0),
    }
}

/// Key/value editor rows to a connection config; rows with a blank key are dropped
pub fn rows_to_config(rows: &[(String, String)]) -> BTreeMap<String, String> {
    rows.iter()
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.clone()))
        .collect()
}
