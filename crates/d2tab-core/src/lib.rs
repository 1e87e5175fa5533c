//! d2tab-core: Core library for converting Diablo 2 TXT tables
//!
//! This library provides functionality to:
//! - Parse tab-delimited TXT game tables into an in-memory model
//! - Decompile tables into a hand-editable structured TOML format
//! - Fold numbered column families into compact array values
//! - Spell out `aurafilter` bit flags as names
//! - Compile structured files back to byte-identical TXT

pub mod cell;
pub mod convert;
pub mod error;
pub mod flags;
pub mod groups;
pub mod structured;
pub mod table;
pub mod txt;

pub use cell::CellValue;
pub use convert::{
    compile, compile_file, convert_batch, decompile, decompile_file, BatchItem, BatchReport,
    Direction,
};
pub use error::{Error, RecordError, Result};
pub use flags::{decode_aurafilter, encode_aurafilter, AURAFILTER_FLAGS};
pub use groups::{detect_groups, ColumnGroup};
pub use structured::{from_toml, to_toml};
pub use table::{Column, DuplicateColumn, Row, Table};
pub use txt::{parse_txt, write_txt};
