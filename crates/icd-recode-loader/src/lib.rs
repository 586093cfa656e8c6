//! # icd-recode-loader
//!
//! Parser and resolver for CDC/NCHS "Selected Causes of Death" recode tables.
//!
//! A recode table is an indented text file: headings open groups, rule and
//! entry lines attach ICD-10 codes, ranges or wildcards together with the
//! recode value they map to. [`Recoder`] parses one table into an immutable
//! [`RecodeTree`] and answers lookups against it.
//!
//! ```
//! use icd_recode_loader::Recoder;
//!
//! let table = "\
//! Diseases of the nervous system:
//!     18500 = Parkinson disease (G20-G21)
//!     Other diseases of nervous system:
//!         G20, G23-G25 = 18800
//! ";
//! let recoder: Recoder = table.parse().unwrap();
//! assert_eq!(recoder.get_codes("G20").unwrap(), vec!["18500", "18800"]);
//! assert!(recoder.get_codes("A00").unwrap().is_empty());
//! ```

#![warn(missing_docs)]

pub mod loader;
pub mod parser;
mod recoder;
pub mod render;
pub mod tree;
pub mod types;

pub use loader::{discover_tables, read_table};
pub use parser::TableParser;
pub use recoder::Recoder;
pub use tree::{DepthFirst, RecodeTree};
pub use types::{DataAnomaly, MalformedReason, ParseConfig, ParseStats, RecodeError, RecodeResult};

// Re-export icd-recode-types for convenience
pub use icd_recode_types;
