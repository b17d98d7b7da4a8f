//! Deep merge for dynamic config values
//!
//! The generic merge primitive used wherever "deep merge when both present"
//! applies: object fields recurse, arrays and scalars are replaced by the
//! later value. `merge_rule_values` adds the rule-specific handling on top
//! (a bare later severity keeps the earlier entry's positional options).

use serde_json::Value;

/// Merge `later` over `earlier`. Objects merge key by key, everything else
/// is taken from `later`. Inputs are never mutated.
pub fn deep_merge(earlier: &Value, later: &Value) -> Value {
    match (earlier, later) {
        (Value::Object(a), Value::Object(b)) => {
            let mut merged = a.clone();
            for (key, later_value) in b {
                match merged.get_mut(key) {
                    Some(existing) => {
                        let value = deep_merge(existing, later_value);
                        *existing = value;
                    }
                    None => {
                        merged.insert(key.clone(), later_value.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        _ => later.clone(),
    }
}

/// Merge two rule-shaped values (a severity, or `[severity, ...options]`).
///
/// Unlike [`deep_merge`], arrays here combine element by element so that a
/// later `[1, true]` over `[0, false]` yields `[1, true]`, and a later bare
/// `1` over `[0, false]` yields `[1, false]` (severity replaced, options
/// retained).
pub fn merge_rule_values(earlier: &Value, later: &Value) -> Value {
    match (earlier, later) {
        (Value::Array(a), Value::Array(b)) => {
            let length = a.len().max(b.len());
            let mut merged = Vec::with_capacity(length);
            for index in 0..length {
                let value = match (a.get(index), b.get(index)) {
                    (Some(av), Some(bv)) if av.is_object() && bv.is_object() => {
                        deep_merge(av, bv)
                    }
                    (_, Some(bv)) => bv.clone(),
                    (Some(av), None) => av.clone(),
                    (None, None) => unreachable!("index below merged length"),
                };
                merged.push(value);
            }
            Value::Array(merged)
        }
        (Value::Array(a), severity) if !severity.is_object() => {
            let mut merged = Vec::with_capacity(a.len());
            merged.push(severity.clone());
            merged.extend(a.iter().skip(1).cloned());
            Value::Array(merged)
        }
        _ => deep_merge(earlier, later),
    }
}
