use serde_json::Value;

use super::{result_of, scalar};

/// Headline fields, most specific first: a viability result answers with
/// its score, a rate result with the corporate rate.
const PRIORITY_KEYS: [&str; 4] = ["score", "corporate_total_pct", "monthly_savings", "version"];

/// Print the single key answer from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);
    let Value::Object(map) = result else {
        return scalar(result);
    };

    if let Some(val) = PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null())
    {
        return scalar(val);
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, scalar(val)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_viability_headline_is_score() {
        let v = json!({ "result": { "monthly_savings": "906.29", "score": 55 } });
        assert_eq!(headline(&v), "55");
    }

    #[test]
    fn test_rates_headline_is_corporate_rate() {
        let v = json!({ "result": { "individual_tax_pct": "16.74", "corporate_total_pct": "7.68" } });
        assert_eq!(headline(&v), "7.68");
    }

    #[test]
    fn test_version_headline() {
        let v = json!({ "name": "holding-cli", "version": "0.1.0" });
        assert_eq!(headline(&v), "0.1.0");
    }

    #[test]
    fn test_fallback_to_first_field() {
        let v = json!({ "rule_set": "simplified" });
        assert_eq!(headline(&v), "rule_set: simplified");
    }
}
