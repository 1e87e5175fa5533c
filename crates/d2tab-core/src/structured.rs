//! Reader and writer for the structured TOML representation
//!
//! The file layout is manifest-first:
//!
//! ```toml
//! columns = ["MinDam", "MinLevDam1", "MinLevDam2"]
//!
//! [column_groups]
//! --MinDam = ["MinDam", "MinLevDam1", "MinLevDam2"]
//!
//! [[rows]]
//! --MinDam = [100, 10, 15]
//! ```
//!
//! `columns` records the original column order (byte-exact, duplicates
//! included) and `column_groups` records how array keys expand back to
//! columns. Compiling back to TXT reads the manifest and never
//! re-detects groups, so the original layout is always restored even
//! if the detection heuristic would decide differently today.

use crate::cell::CellValue;
use crate::error::{Error, RecordError, Result};
use crate::flags::{decode_aurafilter, encode_aurafilter};
use crate::groups::{detect_groups, ColumnGroup};
use crate::table::Table;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use toml::Value;

const AURAFILTER: &str = "aurafilter";

/// Serialized document shape; field order is emission order
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    column_groups: IndexMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    rows: Vec<IndexMap<String, Value>>,
}

/// Serialize a [`Table`] to the structured TOML representation.
///
/// Column groups are detected fresh from the column names; empty cells
/// are omitted from their row record.
pub fn to_toml(table: &Table) -> Result<String> {
    let groups = detect_groups(table.columns());

    let group_at: HashMap<usize, &ColumnGroup> =
        groups.iter().map(|g| (g.start(), g)).collect();
    let member_of: HashSet<usize> = groups.iter().flat_map(|g| g.members.iter().copied()).collect();

    let mut rows = Vec::with_capacity(table.row_count());
    for (row_index, row) in table.rows().iter().enumerate() {
        let mut record = IndexMap::new();

        for col in table.columns() {
            if let Some(group) = group_at.get(&col.index) {
                if let Some(value) = fold_group(table, group, row.cells(), row_index)? {
                    record.insert(group.key.clone(), value);
                }
            } else if member_of.contains(&col.index) {
                continue;
            } else {
                let raw = &row.cells()[col.index];
                if raw.is_empty() {
                    continue;
                }
                let value = encode_scalar(raw, &col.key, row_index)?;
                record.insert(col.key.clone(), value);
            }
        }

        rows.push(record);
    }

    let doc = Document {
        columns: Some(table.columns().iter().map(|c| c.name.clone()).collect()),
        column_groups: groups
            .iter()
            .map(|g| {
                let members = g
                    .members
                    .iter()
                    .map(|&m| table.columns()[m].key.clone())
                    .collect();
                (g.key.clone(), members)
            })
            .collect(),
        rows,
    };

    Ok(toml::to_string(&doc)?)
}

/// Fold a group's member cells into one array value. Trailing empty
/// members are trimmed; an all-empty group is omitted entirely.
fn fold_group(
    table: &Table,
    group: &ColumnGroup,
    cells: &[String],
    row_index: usize,
) -> Result<Option<Value>> {
    let mut values = Vec::with_capacity(group.members.len());
    for &member in &group.members {
        let raw = &cells[member];
        let key = &table.columns()[member].key;
        let cell = CellValue::encode(raw).ok_or_else(|| Error::CellEncoding {
            row: row_index + 1,
            column: key.clone(),
        })?;
        values.push(match cell {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Integer(i) => Value::Integer(i),
            CellValue::Text(s) => Value::String(s),
        });
    }

    while values.last() == Some(&Value::String(String::new())) {
        values.pop();
    }
    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(Value::Array(values)))
}

/// Encode one standalone cell. Integer values of an `aurafilter`
/// column are spelled out as flag names.
fn encode_scalar(raw: &str, key: &str, row_index: usize) -> Result<Value> {
    let cell = CellValue::encode(raw).ok_or_else(|| Error::CellEncoding {
        row: row_index + 1,
        column: key.to_string(),
    })?;

    if key.eq_ignore_ascii_case(AURAFILTER) {
        if let CellValue::Integer(i) = cell {
            if let Ok(bits) = u32::try_from(i) {
                let (names, unknown) = decode_aurafilter(bits);
                let names = names
                    .into_iter()
                    .map(|n| Value::String(n.to_string()))
                    .collect();
                let mut parts = vec![Value::Array(names)];
                if unknown != 0 {
                    parts.push(Value::Array(vec![Value::Integer(unknown as i64)]));
                }
                return Ok(Value::Array(parts));
            }
        }
    }

    Ok(match cell {
        CellValue::Empty => unreachable!("empty cells are omitted by the caller"),
        CellValue::Integer(i) => Value::Integer(i),
        CellValue::Text(s) => Value::String(s),
    })
}

/// Parse a structured TOML document back into a [`Table`].
///
/// The manifest is validated up front and the call fails fast when it
/// is missing or inconsistent. Row records are decoded independently;
/// all record-level problems are accumulated and reported together as
/// [`Error::Records`].
pub fn from_toml(text: &str) -> Result<Table> {
    let doc: Document = toml::from_str(text)?;
    let columns = doc.columns.ok_or(Error::ManifestMissing)?;

    for name in &columns {
        if name.contains('\t') || name.contains('\n') || name.contains('\r') {
            return Err(Error::ManifestCorrupt(format!(
                "column name {name:?} contains a tab or line break"
            )));
        }
    }

    let mut table = Table::new(columns);

    let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (key, members) in &doc.column_groups {
        if members.is_empty() {
            return Err(Error::ManifestCorrupt(format!(
                "column group '{key}' has no members"
            )));
        }
        if table.column_index(key).is_some() {
            return Err(Error::ManifestCorrupt(format!(
                "column group key '{key}' shadows a column of the same name"
            )));
        }
        let mut indices = Vec::with_capacity(members.len());
        for member in members {
            let index = table
                .column_index(member)
                .ok_or_else(|| Error::DanglingGroupMember {
                    group: key.clone(),
                    member: member.clone(),
                })?;
            indices.push(index);
        }
        groups.insert(key.clone(), indices);
    }

    let mut errors = Vec::new();
    for (row_index, record) in doc.rows.iter().enumerate() {
        table.push_row(Vec::new());

        for (key, value) in record {
            let problem = decode_entry(&mut table, &groups, row_index, key, value);
            if let Err(reason) = problem {
                errors.push(RecordError {
                    row: row_index,
                    key: key.clone(),
                    reason,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(table)
    } else {
        Err(Error::Records(errors))
    }
}

/// Decode a single `key = value` entry of a row record into the table.
/// Returns the failure reason, leaving the affected cells empty.
fn decode_entry(
    table: &mut Table,
    groups: &IndexMap<String, Vec<usize>>,
    row: usize,
    key: &str,
    value: &Value,
) -> std::result::Result<(), String> {
    if let Some(members) = groups.get(key) {
        let values = value
            .as_array()
            .ok_or_else(|| format!("expected an array for a column group, found {}", value.type_str()))?;
        if values.len() > members.len() {
            return Err(format!(
                "has {} values but the group has only {} members",
                values.len(),
                members.len()
            ));
        }
        for (slot, v) in values.iter().enumerate() {
            let raw = decode_scalar(v)?;
            table
                .set_cell_at(row, members[slot], raw)
                .map_err(|e| e.to_string())?;
        }
        return Ok(());
    }

    let Some(index) = table.column_index(key) else {
        return Err("not a column or column group of this file".to_string());
    };

    if key.eq_ignore_ascii_case(AURAFILTER) {
        if let Value::Array(parts) = value {
            let bits = decode_aurafilter_entry(parts)?;
            return table
                .set_cell_at(row, index, bits.to_string())
                .map_err(|e| e.to_string());
        }
    }

    let raw = decode_scalar(value)?;
    table.set_cell_at(row, index, raw).map_err(|e| e.to_string())
}

/// Decode a scalar TOML value into the raw TXT cell string
fn decode_scalar(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::Integer(i) => Ok(CellValue::Integer(*i).decode()),
        Value::String(s) => Ok(CellValue::Text(s.clone()).decode()),
        other => Err(format!("unsupported {} value", other.type_str())),
    }
}

/// Decode the `[[names...], [unknown_bits]]` aurafilter form
fn decode_aurafilter_entry(parts: &[Value]) -> std::result::Result<u32, String> {
    if parts.is_empty() || parts.len() > 2 {
        return Err("malformed aurafilter flag list".to_string());
    }

    let names: Vec<&str> = parts[0]
        .as_array()
        .ok_or("malformed aurafilter flag list")?
        .iter()
        .map(|v| v.as_str().ok_or("aurafilter flag names must be strings"))
        .collect::<std::result::Result<_, _>>()?;

    let unknown = match parts.get(1) {
        None => 0,
        Some(extra) => {
            let extra = extra.as_array().ok_or("malformed aurafilter flag list")?;
            match extra.as_slice() {
                [Value::Integer(i)] => u32::try_from(*i)
                    .map_err(|_| "aurafilter bits out of range".to_string())?,
                _ => return Err("malformed aurafilter flag list".to_string()),
            }
        }
    };

    encode_aurafilter(&names, unknown)
        .map_err(|name| format!("unknown aurafilter flag name '{name}'"))
}
