use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields share one Field/Value table. An object whose values
/// are themselves objects (accounts keyed by name) becomes a matrix with one
/// row per entry; an array of objects (goal rows) becomes a table with
/// flattened column names.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_sections(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_sections(res_map),
        other => println!("{}", format_scalar(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_sections(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut has_scalars = false;
    let mut nested: Vec<(&String, &Value)> = Vec::new();

    for (key, val) in map {
        if is_matrix(val) || is_object_array(val) {
            nested.push((key, val));
        } else if let Value::Object(inner) = val {
            for (inner_key, inner_val) in inner {
                builder.push_record([format!("{}.{}", key, inner_key), format_scalar(inner_val)]);
                has_scalars = true;
            }
        } else {
            builder.push_record([key.clone(), format_scalar(val)]);
            has_scalars = true;
        }
    }

    if has_scalars {
        println!("{}", Table::from(builder));
    }

    for (key, val) in nested {
        println!("\n{}:", key);
        match val {
            Value::Object(rows) => print_matrix(rows),
            Value::Array(arr) => print_array_table(arr),
            _ => {}
        }
    }
}

fn is_matrix(value: &Value) -> bool {
    matches!(value, Value::Object(m) if !m.is_empty() && m.values().all(Value::is_object))
}

fn is_object_array(value: &Value) -> bool {
    matches!(value, Value::Array(a) if a.first().is_some_and(Value::is_object))
}

/// One row per entry, columns are the union of inner keys in first-seen order.
fn print_matrix(rows: &Map<String, Value>) {
    let mut headers: Vec<String> = Vec::new();
    for inner in rows.values().filter_map(Value::as_object) {
        for key in inner.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(std::iter::once(String::new()).chain(headers.iter().cloned()));
    for (name, inner) in rows {
        let row = std::iter::once(name.clone()).chain(headers.iter().map(|h| {
            inner
                .get(h.as_str())
                .map(format_scalar)
                .unwrap_or_default()
        }));
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let rows: Vec<Vec<(String, String)>> = arr
        .iter()
        .map(|item| {
            let mut cells = Vec::new();
            flatten("", item, &mut cells);
            cells
        })
        .collect();

    let mut headers: Vec<String> = Vec::new();
    for cells in &rows {
        for (key, _) in cells {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for cells in &rows {
        builder.push_record(headers.iter().map(|h| {
            cells
                .iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        }));
    }
    println!("{}", Table::from(builder));
}
