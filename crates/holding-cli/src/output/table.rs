use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, result_of};

/// Field/value table of the flattened result, then warnings and methodology.
pub fn print_table(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (field, val) in flatten(result_of(value)) {
        builder.push_record([field, val]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        let rule_set = value
            .pointer("/metadata/rule_set")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        println!("\nMethodology: {} (rule set: {})", meth, rule_set);
    }
}
