//! End-to-end conversion between the TXT and structured formats
//!
//! This is the surface the CLI drives: whole-buffer and whole-file
//! conversions in both directions, plus a batch driver that converts
//! many files independently and reports per-file outcomes.

use crate::error::{Error, Result};
use crate::{structured, txt};
use std::fs;
use std::path::{Path, PathBuf};

/// Direction of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// TXT to structured TOML
    Decompile,
    /// Structured TOML back to TXT
    Compile,
}

/// Convert TXT bytes to the structured TOML text
pub fn decompile(bytes: &[u8]) -> Result<String> {
    let table = txt::parse_txt(bytes)?;
    structured::to_toml(&table)
}

/// Convert structured TOML bytes back to TXT bytes
pub fn compile(bytes: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
    let table = structured::from_toml(text)?;
    txt::write_txt(&table)
}

/// Convert a TXT file to a structured TOML file.
///
/// The target is written only after the whole conversion succeeds, so
/// a failure never leaves a truncated or half-written file behind.
pub fn decompile_file(source: &Path, target: &Path) -> Result<()> {
    let bytes = read(source)?;
    let output = decompile(&bytes)?;
    write(target, output.as_bytes())
}

/// Convert a structured TOML file back to a TXT file.
///
/// Same write discipline as [`decompile_file`]: nothing is written on
/// failure.
pub fn compile_file(source: &Path, target: &Path) -> Result<()> {
    let bytes = read(source)?;
    let output = compile(&bytes)?;
    write(target, &output)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Outcome of one batch item
#[derive(Debug)]
pub struct BatchItem {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: Result<()>,
}

/// Per-file outcomes of a batch conversion
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    /// Number of items that failed
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_err()).count()
    }
}

/// Convert a list of `(source, target)` pairs, one by one.
///
/// Each pair is converted independently; a failure is recorded in the
/// report and the batch moves on to the next pair.
pub fn convert_batch(direction: Direction, pairs: &[(PathBuf, PathBuf)]) -> BatchReport {
    let mut report = BatchReport::default();
    for (source, target) in pairs {
        tracing::debug!(?direction, source = %source.display(), "converting");
        let outcome = match direction {
            Direction::Decompile => decompile_file(source, target),
            Direction::Compile => compile_file(source, target),
        };
        if let Err(err) = &outcome {
            tracing::error!(source = %source.display(), "conversion failed: {err}");
        }
        report.items.push(BatchItem {
            source: source.clone(),
            target: target.clone(),
            outcome,
        });
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKILLS_TXT: &[u8] =
        b"Name\tLevel\taurafilter\r\nFire Ball\t1\t33025\r\nIce Bolt\t1\t\r\n";

    #[test]
    fn test_round_trip_law() {
        // compile(decompile(T)) == T, byte for byte
        let toml = decompile(SKILLS_TXT).unwrap();
        assert_eq!(compile(toml.as_bytes()).unwrap(), SKILLS_TXT);
    }

    #[test]
    fn test_decompile_idempotent() {
        let first = decompile(SKILLS_TXT).unwrap();
        let txt = compile(first.as_bytes()).unwrap();
        let second = decompile(&txt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_grouped_round_trip() {
        let source: &[u8] =
            b"MinDam\tMinLevDam1\tMinLevDam2\r\n100\t10\t15\r\n\t\t\r\n";
        let toml = decompile(source).unwrap();
        assert!(toml.contains("column_groups"));
        assert_eq!(compile(toml.as_bytes()).unwrap(), source);
    }

    #[test]
    fn test_compile_rejects_invalid_utf8() {
        assert!(matches!(compile(b"\xFF\xFE"), Err(Error::InvalidUtf8)));
    }

    #[test]
    fn test_tampered_manifest_fails_cleanly() {
        let mut toml = decompile(SKILLS_TXT).unwrap();
        toml = toml.replacen("columns", "kolumns", 1);
        assert!(compile(toml.as_bytes()).is_err());
    }

    #[test]
    fn test_file_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("skills.txt");
        let toml_path = dir.path().join("skills.toml");
        let back = dir.path().join("skills_back.txt");
        fs::write(&source, SKILLS_TXT).unwrap();

        decompile_file(&source, &toml_path).unwrap();
        compile_file(&toml_path, &back).unwrap();
        assert_eq!(fs::read(&back).unwrap(), SKILLS_TXT);
    }

    #[test]
    fn test_failed_conversion_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.toml");
        let target = dir.path().join("out.txt");
        fs::write(&source, "[[rows]]\na = 1\n").unwrap();
        fs::write(&target, b"previous contents").unwrap();

        assert!(compile_file(&source, &target).is_err());
        assert_eq!(fs::read(&target).unwrap(), b"previous contents");
    }

    #[test]
    fn test_batch_failures_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let missing = dir.path().join("missing.txt");
        let good_out = dir.path().join("good.toml");
        let missing_out = dir.path().join("missing.toml");
        fs::write(&good, SKILLS_TXT).unwrap();

        let pairs = vec![
            (missing.clone(), missing_out.clone()),
            (good.clone(), good_out.clone()),
        ];
        let report = convert_batch(Direction::Decompile, &pairs);

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.failed(), 1);
        assert!(report.items[0].outcome.is_err());
        assert!(report.items[1].outcome.is_ok());
        assert!(good_out.exists());
        assert!(!missing_out.exists());
    }
}
