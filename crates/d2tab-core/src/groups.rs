//! Detection of numbered column families
//!
//! Game tables name repeated fields with a shared base and a numeric
//! suffix: an unsuffixed zero member followed immediately by `base1`,
//! `base2`, ... Folding such a family into one array key makes the
//! structured output compact and diff-friendly. Detection is a pure
//! function of the column name sequence and is recomputed on every
//! decompile; the inverse mapping is always read back from the file's
//! own manifest, never re-detected.

use crate::table::Column;

/// A detected family of columns that folds into one array-valued key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    /// Synthetic key for the folded array, guaranteed not to collide
    /// with any column key or other group key
    pub key: String,
    /// Column indices of the members, in fold order (zero member first)
    pub members: Vec<usize>,
}

impl ColumnGroup {
    /// Index of the first member; the folded key is emitted at this
    /// position in each row record
    pub fn start(&self) -> usize {
        self.members[0]
    }
}

/// Scan the column sequence left to right and collect every valid
/// group. Columns not matching any family stay standalone; detection
/// never fails, it only ever finds fewer groups than the names might
/// loosely suggest.
pub fn detect_groups(columns: &[Column]) -> Vec<ColumnGroup> {
    let mut groups: Vec<ColumnGroup> = Vec::new();
    let mut i = 0;

    while i < columns.len() {
        match match_family(columns, i) {
            Some(members) => {
                let next = members.last().copied().unwrap_or(i) + 1;
                let key = group_key(&columns[i].key, columns, &groups);
                groups.push(ColumnGroup { key, members });
                i = next;
            }
            None => i += 1,
        }
    }

    groups
}

/// Try to match a family starting at column `i` as its zero member.
/// Returns the member indices (zero member included) on success.
fn match_family(columns: &[Column], i: usize) -> Option<Vec<usize>> {
    let zero = &columns[i].key;
    // the zero member must be unsuffixed and named
    if zero.is_empty() || split_suffix(zero).is_some() {
        return None;
    }

    let (base, first) = split_suffix(&columns.get(i + 1)?.key)?;
    if first != 1 || !related(zero, base) {
        return None;
    }

    let mut members = vec![i, i + 1];
    let mut expected = 2;
    for col in &columns[i + 2..] {
        match split_suffix(&col.key) {
            Some((b, n)) if b == base && n == expected => {
                members.push(col.index);
                expected += 1;
            }
            _ => break,
        }
    }

    Some(members)
}

/// Split a column key into `(base, numeric_suffix)`. Only the
/// canonical decimal form counts: `"Base01"` and `"Base0"` do not
/// split, so they never start or join a run.
fn split_suffix(key: &str) -> Option<(&str, u32)> {
    let digits = key.len() - key.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 || digits == key.len() {
        return None;
    }
    let (base, suffix) = key.split_at(key.len() - digits);
    let n: u32 = suffix.parse().ok()?;
    if n >= 1 && n.to_string() == suffix {
        Some((base, n))
    } else {
        None
    }
}

/// A zero member qualifies for a run base when it can be split as
/// `prefix + suffix` such that the base starts with the prefix, ends
/// with the suffix, and is at least as long. This covers both exact
/// matches (`Name` / `Name1`) and the infixed families the game uses
/// (`MinDam` / `MinLevDam1`, where "Lev" is inserted in the middle).
fn related(zero: &str, base: &str) -> bool {
    if base.len() < zero.len() {
        return false;
    }
    zero.char_indices()
        .map(|(i, _)| i)
        .chain([zero.len()])
        .any(|split| base.starts_with(&zero[..split]) && base.ends_with(&zero[split..]))
}

/// Build the synthetic group key: `--` plus the zero member's key,
/// extended until it shadows nothing
fn group_key(zero: &str, columns: &[Column], groups: &[ColumnGroup]) -> String {
    let mut key = format!("--{zero}");
    while columns.iter().any(|c| c.key == key) || groups.iter().any(|g| g.key == key) {
        key.insert(0, '-');
    }
    key
}
