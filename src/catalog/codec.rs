//! Line codec for switch records.
//!
//! Format: ten fields joined by TAB, in this order:
//! `runtime, platform, architecture, prefix, name, kind, default_value,
//! availability, since, description`.
//!
//! Inside a field `\` is written as `\\`, TAB as `\t`, LF as `\n` and
//! CR as `\r`, so an encoded line never contains a raw line terminator and
//! every string field survives a round trip. `since` is empty when unknown.

use super::error::CatalogError;
use super::record::{SwitchKind, SwitchRecord};

/// Field separator within a record line.
pub const FIELD_DELIMITER: char = '\t';

/// Number of fields in an encoded record.
pub const FIELD_COUNT: usize = 10;

const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "runtime",
    "platform",
    "architecture",
    "prefix",
    "name",
    "kind",
    "default_value",
    "availability",
    "since",
    "description",
];

/// Encode a record as one line.
pub fn encode(record: &SwitchRecord) -> String {
    let since = record.since.map(|v| v.to_string()).unwrap_or_default();
    let fields: [&str; FIELD_COUNT] = [
        &record.runtime,
        &record.platform,
        &record.architecture,
        &record.prefix,
        &record.name,
        record.kind.as_str(),
        &record.default_value,
        &record.availability,
        &since,
        &record.description,
    ];

    let mut line = String::with_capacity(fields.iter().map(|f| f.len() + 1).sum());
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(FIELD_DELIMITER);
        }
        escape_into(field, &mut line);
    }
    line
}

/// Decode one line into a record.
pub fn decode(line: &str) -> Result<SwitchRecord, CatalogError> {
    let raw: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if raw.len() != FIELD_COUNT {
        return Err(CatalogError::MalformedRecord(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            raw.len()
        )));
    }

    let mut fields = Vec::with_capacity(FIELD_COUNT);
    for (i, field) in raw.iter().enumerate() {
        fields.push(unescape(field, FIELD_NAMES[i])?);
    }

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    let runtime = next();
    let platform = next();
    let architecture = next();
    let prefix = next();
    let name = next();
    let kind: SwitchKind = next().parse()?;
    let default_value = next();
    let availability = next();
    let since = parse_since(&next())?;
    let description = next();

    Ok(SwitchRecord {
        runtime,
        platform,
        architecture,
        prefix,
        name,
        kind,
        default_value,
        availability,
        since,
        description,
    })
}

fn parse_since(field: &str) -> Result<Option<u16>, CatalogError> {
    if field.is_empty() {
        return Ok(None);
    }
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::MalformedRecord(format!(
            "field 'since' is not a version number: '{}'",
            field
        )));
    }
    field.parse::<u16>().map(Some).map_err(|e| {
        CatalogError::MalformedRecord(format!("field 'since' out of range '{}': {}", field, e))
    })
}

fn escape_into(field: &str, out: &mut String) {
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

fn unescape(field: &str, name: &str) -> Result<String, CatalogError> {
    if !field.contains('\\') {
        return Ok(field.to_string());
    }

    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                return Err(CatalogError::MalformedRecord(format!(
                    "invalid escape '\\{}' in field '{}'",
                    other, name
                )))
            }
            None => {
                return Err(CatalogError::MalformedRecord(format!(
                    "dangling escape at end of field '{}'",
                    name
                )))
            }
        }
    }
    Ok(out)
}
