//! Merge Schema
//!
//! Declarative per-field merge and validation rules for reducing an ordered
//! list of partial config records into one effective record. Each recognized
//! field carries its own merge law (scalar replace, shallow union, deep
//! merge, rule merge, conflict-detecting namespace union); reduction is a
//! left-to-right pairwise fold, so later records win ties.
//!
//! Records are expected to be pre-filtered by the caller: only those whose
//! `files`/`ignores` patterns match the target path belong in the list (see
//! `domain::ports::PathMatcher`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::services::deep_merge::{deep_merge, merge_rule_values};

pub type JsonMap = Map<String, Value>;

/// One partial configuration record, as loose JSON. Recognized keys are
/// `files`, `ignores`, `globals`, `settings`, `parser`, `parserOptions`,
/// `rules`, `defs` and `processor`; anything else fails validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigRecord(pub JsonMap);

impl ConfigRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for ConfigRecord {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => {
                let record = ConfigRecord(map);
                validate(&record)?;
                Ok(record)
            }
            _ => Err(SchemaError::NotARecord),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("config record must be an object")]
    NotARecord,

    #[error("unexpected key '{key}' in config record")]
    UnknownKey { key: String },

    #[error("key '{key}' requires '{required}' to also be present")]
    MissingDependency { key: String, required: String },

    #[error("expected '{key}' to be {expected}")]
    InvalidShape { key: String, expected: &'static str },

    #[error("rule namespace \"{namespace}\" is already defined and cannot be redefined")]
    NamespaceConflict { namespace: String },
}

type MergeFn = fn(Option<&Value>, Option<&Value>) -> Result<Option<Value>, SchemaError>;
type ValidateFn = fn(&Value) -> Result<(), &'static str>;

struct SchemaEntry {
    key: &'static str,
    requires: &'static [&'static str],
    merge: MergeFn,
    validate: ValidateFn,
}

const SCHEMA: &[SchemaEntry] = &[
    SchemaEntry {
        key: "files",
        requires: &[],
        merge: merge_none,
        validate: validate_pattern_list,
    },
    SchemaEntry {
        key: "ignores",
        requires: &["files"],
        merge: merge_none,
        validate: validate_pattern_list,
    },
    SchemaEntry {
        key: "globals",
        requires: &[],
        merge: merge_union_shallow,
        validate: validate_object,
    },
    SchemaEntry {
        key: "settings",
        requires: &[],
        merge: merge_deep_through,
        validate: validate_object,
    },
    SchemaEntry {
        key: "parser",
        requires: &[],
        merge: merge_replace_through,
        validate: validate_reference,
    },
    SchemaEntry {
        key: "parserOptions",
        requires: &[],
        merge: merge_deep_through,
        validate: validate_object,
    },
    SchemaEntry {
        key: "rules",
        requires: &[],
        merge: merge_rules_field,
        validate: validate_object,
    },
    SchemaEntry {
        key: "defs",
        requires: &[],
        merge: merge_defs,
        validate: validate_defs,
    },
    SchemaEntry {
        key: "processor",
        requires: &[],
        merge: merge_replace_through,
        validate: validate_reference,
    },
];

/// Validate one record against the schema: recognized keys only, each with
/// the shape its entry demands, structural dependencies satisfied.
pub fn validate(record: &ConfigRecord) -> Result<(), SchemaError> {
    for key in record.0.keys() {
        if !SCHEMA.iter().any(|entry| entry.key == key) {
            return Err(SchemaError::UnknownKey { key: key.clone() });
        }
    }

    for entry in SCHEMA {
        let Some(value) = record.get(entry.key) else {
            continue;
        };

        (entry.validate)(value).map_err(|expected| SchemaError::InvalidShape {
            key: entry.key.to_string(),
            expected,
        })?;

        for required in entry.requires {
            if record.get(required).is_none() {
                return Err(SchemaError::MissingDependency {
                    key: entry.key.to_string(),
                    required: required.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Merge `later` over `earlier`, field by field per the schema table.
/// Both records must already be valid.
pub fn merge(earlier: &ConfigRecord, later: &ConfigRecord) -> Result<ConfigRecord, SchemaError> {
    let mut merged = JsonMap::new();

    for entry in SCHEMA {
        let result = (entry.merge)(earlier.get(entry.key), later.get(entry.key))?;
        if let Some(value) = result {
            merged.insert(entry.key.to_string(), value);
        }
    }

    Ok(ConfigRecord(merged))
}

/// Reduce an ordered, pre-filtered record list to one effective record.
/// Later records win ties for scalar fields and deepen object fields.
pub fn reduce(records: &[ConfigRecord]) -> Result<ConfigRecord, SchemaError> {
    for record in records {
        validate(record)?;
    }

    let mut accumulator = ConfigRecord::new();
    for record in records {
        accumulator = merge(&accumulator, record)?;
    }
    Ok(accumulator)
}

// ---------------------------------------------------------------------------
// Merge laws

/// `files`/`ignores` never merge; the caller keys off the last matching
/// record instead.
fn merge_none(_: Option<&Value>, _: Option<&Value>) -> Result<Option<Value>, SchemaError> {
    Ok(None)
}

fn merge_replace_through(
    earlier: Option<&Value>,
    later: Option<&Value>,
) -> Result<Option<Value>, SchemaError> {
    Ok(later.or(earlier).cloned())
}

fn merge_union_shallow(
    earlier: Option<&Value>,
    later: Option<&Value>,
) -> Result<Option<Value>, SchemaError> {
    match (earlier, later) {
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            let mut union = a.clone();
            for (key, value) in b {
                union.insert(key.clone(), value.clone());
            }
            Ok(Some(Value::Object(union)))
        }
        (a, b) => Ok(b.or(a).cloned()),
    }
}

fn merge_deep_through(
    earlier: Option<&Value>,
    later: Option<&Value>,
) -> Result<Option<Value>, SchemaError> {
    match (earlier, later) {
        (Some(a), Some(b)) => Ok(Some(deep_merge(a, b))),
        (a, b) => Ok(b.or(a).cloned()),
    }
}

/// Per-rule-id merge: object-shaped pairs (tuples included, an options array
/// is object-shaped here) go through the rule-aware deep merge, anything
/// else is a flat replace by the later value.
fn merge_rules_field(
    earlier: Option<&Value>,
    later: Option<&Value>,
) -> Result<Option<Value>, SchemaError> {
    let (Some(Value::Object(a)), Some(Value::Object(b))) = (earlier, later) else {
        return merge_deep_through(earlier, later);
    };

    let mut merged = a.clone();
    for (rule_id, later_entry) in b {
        let value = match a.get(rule_id) {
            Some(earlier_entry)
                if object_shaped(earlier_entry) || object_shaped(later_entry) =>
            {
                merge_rule_values(earlier_entry, later_entry)
            }
            _ => later_entry.clone(),
        };
        merged.insert(rule_id.clone(), value);
    }

    Ok(Some(Value::Object(merged)))
}

fn merge_defs(
    earlier: Option<&Value>,
    later: Option<&Value>,
) -> Result<Option<Value>, SchemaError> {
    let (Some(Value::Object(a)), Some(Value::Object(b))) = (earlier, later) else {
        return Ok(later.or(earlier).cloned());
    };

    let mut merged = JsonMap::new();
    let namespaces = match (a.get("ruleNamespaces"), b.get("ruleNamespaces")) {
        (Some(Value::Object(first)), Some(Value::Object(second))) => {
            Some(Value::Object(merge_namespaces(first, second)?))
        }
        (first, second) => second.or(first).cloned(),
    };
    if let Some(namespaces) = namespaces {
        merged.insert("ruleNamespaces".to_string(), namespaces);
    }

    Ok(Some(Value::Object(merged)))
}

/// Union two namespace registries. A namespace present on both sides must
/// carry the same definition; disagreement is an error, never a silent
/// overwrite.
pub fn merge_namespaces(earlier: &JsonMap, later: &JsonMap) -> Result<JsonMap, SchemaError> {
    for (namespace, definition) in earlier {
        if let Some(redefinition) = later.get(namespace) {
            if redefinition != definition {
                return Err(SchemaError::NamespaceConflict {
                    namespace: namespace.clone(),
                });
            }
        }
    }

    let mut union = earlier.clone();
    for (namespace, definition) in later {
        union.insert(namespace.clone(), definition.clone());
    }
    Ok(union)
}

// ---------------------------------------------------------------------------
// Validators

fn validate_pattern_list(value: &Value) -> Result<(), &'static str> {
    const EXPECTED: &str = "a list of glob pattern strings";
    match value {
        Value::Array(items) if items.iter().all(Value::is_string) => Ok(()),
        _ => Err(EXPECTED),
    }
}

fn validate_object(value: &Value) -> Result<(), &'static str> {
    if value.is_object() {
        Ok(())
    } else {
        Err("an object")
    }
}

/// Parsers and processors are references to loaded modules, not bare names.
fn validate_reference(value: &Value) -> Result<(), &'static str> {
    if value.is_object() {
        Ok(())
    } else {
        Err("a module reference object, not a bare scalar")
    }
}

fn validate_defs(value: &Value) -> Result<(), &'static str> {
    let Value::Object(map) = value else {
        return Err("an object");
    };
    for (key, nested) in map {
        if key != "ruleNamespaces" {
            return Err("an object with only a 'ruleNamespaces' key");
        }
        if !nested.is_object() {
            return Err("'ruleNamespaces' to be an object");
        }
    }
    Ok(())
}

fn object_shaped(value: &Value) -> bool {
    value.is_object() || value.is_array()
}
