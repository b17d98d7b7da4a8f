//! Rule entry value object
//!
//! A single rule's configured value: either a bare severity or a severity
//! followed by positional options, e.g. `["error", {"allow": ["warn"]}]`.
//!
//! The positional merge law lives here; the merge schema's `rules` field goes
//! through `services::deep_merge` instead.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::domain::services::deep_merge::deep_merge;
use crate::domain::value_objects::Severity;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid rule entry: {0}")]
pub struct InvalidRuleEntry(pub String);

#[derive(Debug, Clone, PartialEq)]
pub enum RuleEntry {
    /// Bare severity, e.g. `"warn"` or `1`.
    Severity(Severity),
    /// Severity plus positional options, e.g. `["error", {"max": 2}]`.
    Tuple(Severity, Vec<Value>),
}

impl RuleEntry {
    pub fn severity(&self) -> Severity {
        match self {
            RuleEntry::Severity(severity) => *severity,
            RuleEntry::Tuple(severity, _) => *severity,
        }
    }

    pub fn options(&self) -> &[Value] {
        match self {
            RuleEntry::Severity(_) => &[],
            RuleEntry::Tuple(_, options) => options,
        }
    }

    /// Merge a later, higher-priority entry over this one.
    ///
    /// - earlier is bare: the later entry is taken as given;
    /// - later is bare: the earlier options survive, only the severity moves;
    /// - both are tuples: later severity wins, options merge per position
    ///   (object/object deep-merges, any other conflict the later side wins).
    pub fn merge(&self, later: &RuleEntry) -> RuleEntry {
        let earlier_options = match self {
            RuleEntry::Severity(_) => return later.clone(),
            RuleEntry::Tuple(_, options) => options,
        };

        match later {
            RuleEntry::Severity(severity) => RuleEntry::Tuple(*severity, earlier_options.clone()),
            RuleEntry::Tuple(severity, later_options) => {
                let length = earlier_options.len().max(later_options.len());
                let mut merged = Vec::with_capacity(length);
                for index in 0..length {
                    let value = match (earlier_options.get(index), later_options.get(index)) {
                        (Some(a), Some(b)) => {
                            if a.is_object() && b.is_object() {
                                deep_merge(a, b)
                            } else {
                                b.clone()
                            }
                        }
                        (Some(a), None) => a.clone(),
                        (None, Some(b)) => b.clone(),
                        (None, None) => unreachable!("index below merged length"),
                    };
                    merged.push(value);
                }
                RuleEntry::Tuple(*severity, merged)
            }
        }
    }
}

impl From<Severity> for RuleEntry {
    fn from(severity: Severity) -> Self {
        RuleEntry::Severity(severity)
    }
}

impl TryFrom<&Value> for RuleEntry {
    type Error = InvalidRuleEntry;

    fn try_from(value: &Value) -> Result<Self, InvalidRuleEntry> {
        if let Some(severity) = Severity::from_value(value) {
            return Ok(RuleEntry::Severity(severity));
        }

        match value {
            Value::Array(items) => {
                let head = items
                    .first()
                    .ok_or_else(|| InvalidRuleEntry("empty options array".to_string()))?;
                let severity = Severity::from_value(head).ok_or_else(|| {
                    InvalidRuleEntry(format!("first element {head} is not a severity"))
                })?;
                Ok(RuleEntry::Tuple(severity, items[1..].to_vec()))
            }
            other => Err(InvalidRuleEntry(format!(
                "expected a severity or an options array, got {other}"
            ))),
        }
    }
}

impl From<&RuleEntry> for Value {
    fn from(entry: &RuleEntry) -> Value {
        match entry {
            RuleEntry::Severity(severity) => Value::String(severity.as_str().to_string()),
            RuleEntry::Tuple(severity, options) => {
                let mut items = vec![Value::String(severity.as_str().to_string())];
                items.extend(options.iter().cloned());
                Value::Array(items)
            }
        }
    }
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::from(self))
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RuleEntry::Severity(severity) => severity.serialize(serializer),
            RuleEntry::Tuple(severity, options) => {
                let mut seq = serializer.serialize_seq(Some(options.len() + 1))?;
                seq.serialize_element(severity)?;
                for option in options {
                    seq.serialize_element(option)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RuleEntry::try_from(&value).map_err(de::Error::custom)
    }
}
