//! Loader-specific types for recode table processing.

use thiserror::Error;

/// Errors that can occur while loading or querying a recode table.
#[derive(Error, Debug)]
pub enum RecodeError {
    /// I/O error reading a recode table.
    #[error("IO error reading recode table: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A table line could not be turned into tree structure.
    #[error("Malformed recode table at line {line_number}: {reason} ({line:?})")]
    MalformedTable {
        /// 1-based line number in the source text.
        line_number: usize,
        /// The raw text of the offending line.
        line: String,
        /// What was wrong with it.
        reason: MalformedReason,
    },

    /// A lookup code is empty or contains unexpected characters.
    #[error("Invalid code query: {query:?}")]
    InvalidCodeQuery {
        /// The query as given.
        query: String,
    },
}

impl RecodeError {
    /// Returns true for errors raised while accessing the file system.
    pub fn is_file_access(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::FileNotFound { .. } | Self::DirectoryNotFound { .. }
        )
    }

    /// Returns the offending line number for malformed-table errors.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::MalformedTable { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}

/// The reason a table line was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The line is not blank, a comment, a heading, an entry or a rule line.
    #[error("line does not match any known layout")]
    Unrecognized,

    /// A code item in the code list could not be parsed.
    #[error("invalid code '{token}'")]
    InvalidCode {
        /// The offending item.
        token: String,
    },

    /// A range whose upper bound sorts before its lower bound.
    #[error("inverted range {lower}-{upper}")]
    InvertedRange {
        /// Lower bound as written.
        lower: String,
        /// Upper bound as written.
        upper: String,
    },

    /// A rule line with no enclosing group.
    #[error("rule line outside of any group")]
    RuleOutsideGroup,

    /// A group would have both children and a recode value.
    #[error("group '{label}' has both subgroups and a recode value")]
    RecodeWithChildren {
        /// Label of the group.
        label: String,
    },

    /// Two rule lines of one group assign different recode values.
    #[error("group '{label}' is assigned recode {found} after {existing}")]
    ConflictingRecode {
        /// Label of the group.
        label: String,
        /// The value assigned first.
        existing: String,
        /// The value on this line.
        found: String,
    },
}

/// Result type for recode operations.
pub type RecodeResult<T> = Result<T, RecodeError>;

/// Configuration for recode table parsing.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Columns a tab counts for when measuring indentation.
    pub tab_width: usize,
    /// Number of leading lines (titles) ignored before classification starts.
    pub skip_header_lines: usize,
    /// Swap inverted range bounds and record an anomaly instead of failing.
    pub allow_inverted_ranges: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            skip_header_lines: 0,
            allow_inverted_ranges: false,
        }
    }
}

impl ParseConfig {
    /// Creates a config for the published NCHS tables, which start with a title line.
    pub fn nchs() -> Self {
        Self {
            skip_header_lines: 1,
            ..Self::default()
        }
    }

    /// Creates a config that repairs inverted ranges instead of rejecting them.
    pub fn lenient() -> Self {
        Self {
            allow_inverted_ranges: true,
            ..Self::default()
        }
    }
}

/// A data problem that was tolerated during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAnomaly {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// What was found and how it was handled.
    pub message: String,
}

/// Statistics from parsing a recode table.
#[derive(Debug, Clone, Default)]
pub struct ParseStats {
    /// Total lines in the input, header lines included.
    pub total_lines: usize,
    /// Blank, comment and header lines.
    pub skipped_lines: usize,
    /// Groups created, excluding the root.
    pub groups: usize,
    /// Groups carrying a recode value.
    pub leaves: usize,
    /// Code rules attached across all groups.
    pub rules: usize,
    /// Groups that ended with neither children nor rules.
    pub empty_groups: usize,
    /// Tolerated data problems.
    pub anomalies: Vec<DataAnomaly>,
    /// Time taken to parse in milliseconds.
    pub parse_time_ms: u64,
}

impl ParseStats {
    /// Returns the average number of rules per leaf.
    pub fn rules_per_leaf(&self) -> f64 {
        if self.leaves == 0 {
            0.0
        } else {
            self.rules as f64 / self.leaves as f64
        }
    }
}
