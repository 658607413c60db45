//! Declarative field map: byte ranges, value types, and field locations.
//!
//! Each rule names one logical field and describes where its bytes live
//! (header region or repeated record block) and how to interpret them.
//! Rules arrive as `"start:end:type:location"` strings from configuration.

use std::collections::HashMap;
use std::fmt;

use crate::error::RuleError;

/// Value interpretation applied to a field's byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 4-byte big-endian Unix timestamp
    Date,
    /// 4-byte IPv4 address
    Ip,
    /// 2-byte big-endian unsigned integer
    UShort2,
    /// 4-byte big-endian unsigned integer
    ULong4,
    /// Unrecognized tag; decodes to null
    Other(String),
}

impl ValueType {
    /// Byte width required to decode this type (0 for unrecognized tags).
    pub fn width(&self) -> usize {
        match self {
            ValueType::Date | ValueType::Ip | ValueType::ULong4 => 4,
            ValueType::UShort2 => 2,
            ValueType::Other(_) => 0,
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag {
            "DATE" => ValueType::Date,
            "IP" => ValueType::Ip,
            "USHORT2" => ValueType::UShort2,
            "ULONG4" => ValueType::ULong4,
            other => ValueType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Date => write!(f, "DATE"),
            ValueType::Ip => write!(f, "IP"),
            ValueType::UShort2 => write!(f, "USHORT2"),
            ValueType::ULong4 => write!(f, "ULONG4"),
            ValueType::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// Where a field's bytes are read from.
///
/// Location codes other than 0 and 1 are kept as [`Location::Other`]: such
/// fields belong to neither the header pass nor the record pass and are
/// skipped by extraction entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Decoded once per datagram from the header region (code 0)
    Header,
    /// Decoded from every fixed-length record block (code 1)
    Record,
    /// Any other code; extracted by neither pass
    Other(i64),
}

impl Location {
    fn from_code(code: i64) -> Self {
        match code {
            0 => Location::Header,
            1 => Location::Record,
            other => Location::Other(other),
        }
    }
}

/// One declarative extraction rule for a named field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Interpretation of the byte range
    pub value_type: ValueType,
    /// Header, record, or neither
    pub location: Location,
}

/// How malformed rule strings are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum RuleParseMode {
    /// Unparsable numeric components default to 0 and unknown type tags are
    /// kept; each tolerated problem is reported back to the caller. This can
    /// mis-slice the field downstream and exists for compatibility with
    /// deployments that rely on it.
    #[default]
    #[serde(rename = "lenient")]
    Lenient,
    /// Any malformed component fails the rule with a typed error, and the
    /// byte range must match the width required by the value type.
    #[serde(rename = "strict")]
    Strict,
}

/// A parsed rule plus the problems tolerated while parsing it.
///
/// In strict mode `issues` is always empty; problems become errors instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub rule: FieldRule,
    pub issues: Vec<RuleError>,
}

/// Parses one `"start:end:type:location"` rule string.
///
/// Parsing is idempotent: the same input always yields the same rule.
pub fn parse_rule(field: &str, raw: &str, mode: RuleParseMode) -> Result<ParsedRule, RuleError> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 4 {
        return Err(RuleError::WrongComponentCount {
            field: field.to_string(),
            got: parts.len(),
        });
    }

    let mut issues = Vec::new();
    let start = parse_offset(field, "start offset", parts[0], mode, &mut issues)?;
    let end = parse_offset(field, "end offset", parts[1], mode, &mut issues)?;
    let location = Location::from_code(parse_int(field, "location", parts[3], mode, &mut issues)?);

    let value_type = ValueType::from_tag(parts[2]);
    if mode == RuleParseMode::Strict {
        if let ValueType::Other(tag) = &value_type {
            return Err(RuleError::UnknownValueType {
                field: field.to_string(),
                tag: tag.clone(),
            });
        }
        if start >= end {
            return Err(RuleError::InvalidRange {
                field: field.to_string(),
                start,
                end,
            });
        }
        let need = value_type.width();
        if end - start != need {
            return Err(RuleError::WidthMismatch {
                field: field.to_string(),
                start,
                end,
                got: end - start,
                value_type: value_type.to_string(),
                need,
            });
        }
    }

    Ok(ParsedRule {
        rule: FieldRule {
            start,
            end,
            value_type,
            location,
        },
        issues,
    })
}

/// Defaults the component to 0 in lenient mode, recording the problem;
/// fails in strict mode.
fn tolerate(
    mode: RuleParseMode,
    issues: &mut Vec<RuleError>,
    err: RuleError,
) -> Result<i64, RuleError> {
    match mode {
        RuleParseMode::Lenient => {
            issues.push(err);
            Ok(0)
        }
        RuleParseMode::Strict => Err(err),
    }
}

fn parse_int(
    field: &str,
    component: &'static str,
    value: &str,
    mode: RuleParseMode,
    issues: &mut Vec<RuleError>,
) -> Result<i64, RuleError> {
    match value.parse::<i64>() {
        Ok(n) => Ok(n),
        Err(_) => tolerate(
            mode,
            issues,
            RuleError::InvalidInteger {
                field: field.to_string(),
                component,
                value: value.to_string(),
            },
        ),
    }
}

fn parse_offset(
    field: &str,
    component: &'static str,
    value: &str,
    mode: RuleParseMode,
    issues: &mut Vec<RuleError>,
) -> Result<usize, RuleError> {
    let n = parse_int(field, component, value, mode, issues)?;
    if n < 0 {
        let defaulted = tolerate(
            mode,
            issues,
            RuleError::NegativeOffset {
                field: field.to_string(),
                component,
                value: n,
            },
        )?;
        return Ok(defaulted as usize);
    }
    Ok(n as usize)
}

/// Immutable set of field rules keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<String, FieldRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every `field -> "start:end:type:location"` entry of a
    /// configuration map.
    ///
    /// Returns the rule set together with the problems tolerated in lenient
    /// mode, so the caller can report them.
    pub fn from_config(
        map: &HashMap<String, String>,
        mode: RuleParseMode,
    ) -> Result<(Self, Vec<RuleError>), RuleError> {
        let mut rules = HashMap::with_capacity(map.len());
        let mut issues = Vec::new();
        for (field, raw) in map {
            let parsed = parse_rule(field, raw, mode)?;
            issues.extend(parsed.issues);
            rules.insert(field.clone(), parsed.rule);
        }
        Ok((Self { rules }, issues))
    }

    /// Adds a rule, rejecting duplicate field names.
    pub fn insert(&mut self, field: String, rule: FieldRule) -> Result<(), RuleError> {
        if self.rules.contains_key(&field) {
            return Err(RuleError::DuplicateField { field });
        }
        self.rules.insert(field, rule);
        Ok(())
    }

    /// Looks up the rule for a field name.
    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    /// Returns `true` if no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Iterates rules whose bytes come from the header region.
    pub fn header_rules(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules
            .iter()
            .filter(|(_, r)| r.location == Location::Header)
            .map(|(k, r)| (k.as_str(), r))
    }

    /// Iterates rules whose bytes come from each record block.
    pub fn record_rules(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules
            .iter()
            .filter(|(_, r)| r.location == Location::Record)
            .map(|(k, r)| (k.as_str(), r))
    }
}
