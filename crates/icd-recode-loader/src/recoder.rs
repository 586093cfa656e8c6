//! ICD-10 to NCHS recode resolver.
//!
//! A [`Recoder`] owns the tree parsed from one recode table and answers
//! lookups against it. Lookups never mutate the tree, so a `Recoder` can be
//! shared across threads once built.

use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use icd_recode_types::{CodeQuery, Group};

use crate::loader::read_table;
use crate::parser::{parse_code_list, TableParser};
use crate::render;
use crate::tree::RecodeTree;
use crate::types::{ParseConfig, ParseStats, RecodeError, RecodeResult};

/// Converter from ICD-10 codes to recode values.
///
/// # Example
///
/// ```ignore
/// use icd_recode_loader::{ParseConfig, Recoder};
///
/// let recoder = Recoder::from_path("tables/358 ICD-10 Recodes.txt", ParseConfig::nchs())?;
/// println!("{}", recoder.describe());
/// println!("{:?}", recoder.get_codes("G20")?);
/// ```
#[derive(Debug, Clone)]
pub struct Recoder {
    tree: RecodeTree,
    stats: ParseStats,
}

impl Recoder {
    /// Reads and parses a recode table file.
    ///
    /// # Errors
    /// File access problems are reported as [`RecodeError::FileNotFound`] or
    /// [`RecodeError::Io`], structural problems as
    /// [`RecodeError::MalformedTable`].
    pub fn from_path<P: AsRef<Path>>(path: P, config: ParseConfig) -> RecodeResult<Self> {
        let path = path.as_ref();
        let text = read_table(path)?;
        let recoder = Self::parse(&text, config)?;
        tracing::info!(
            path = %path.display(),
            leaves = recoder.stats.leaves,
            rules = recoder.stats.rules,
            "Loaded recode table"
        );
        Ok(recoder)
    }

    /// Parses a recode table from its text.
    pub fn parse(text: &str, config: ParseConfig) -> RecodeResult<Self> {
        let (tree, stats) = TableParser::new(config).parse(text)?;
        Ok(Self { tree, stats })
    }

    /// Returns the parsed hierarchy.
    pub fn tree(&self) -> &RecodeTree {
        &self.tree
    }

    /// Returns statistics collected while parsing.
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Returns every leaf group whose rules match `code`, in document order.
    ///
    /// # Errors
    /// Returns [`RecodeError::InvalidCodeQuery`] if `code` is empty or holds
    /// characters other than letters, digits, `.` and `*`. A well-formed code
    /// that matches nothing yields an empty list.
    pub fn find_leaves(&self, code: &str) -> RecodeResult<Vec<&Group>> {
        let query = CodeQuery::parse(code).map_err(|_| RecodeError::InvalidCodeQuery {
            query: code.to_string(),
        })?;
        Ok(self
            .tree
            .leaves()
            .map(|(_, group)| group)
            .filter(|group| group.matches(&query))
            .collect())
    }

    /// Returns the recode values of every leaf matching `code`, in document order.
    ///
    /// Each matching leaf contributes its value once, however many of its
    /// rules match.
    pub fn get_codes(&self, code: &str) -> RecodeResult<Vec<&str>> {
        Ok(self
            .find_leaves(code)?
            .into_iter()
            .filter_map(|group| group.recode.as_deref())
            .collect())
    }

    /// Returns every leaf group that contains a whole group of codes, in
    /// document order.
    ///
    /// `codes` is written like the code list of a table row
    /// (`"A01-A10, C90-C99"`). A leaf qualifies when each listed item lies
    /// entirely inside one of its rules; a group that is only partly covered
    /// matches nothing.
    ///
    /// # Errors
    /// Returns [`RecodeError::InvalidCodeQuery`] if an item is not a code,
    /// range or wildcard, or if a range is inverted.
    pub fn find_leaves_for_group(&self, codes: &str) -> RecodeResult<Vec<&Group>> {
        let invalid = || RecodeError::InvalidCodeQuery {
            query: codes.to_string(),
        };
        let rules = parse_code_list(codes).map_err(|_| invalid())?;
        if rules.iter().any(|rule| rule.is_inverted()) {
            return Err(invalid());
        }
        Ok(self
            .tree
            .leaves()
            .map(|(_, group)| group)
            .filter(|group| group.contains_all(&rules))
            .collect())
    }

    /// Returns the recode values of every leaf containing the whole group of
    /// codes; see [`Recoder::find_leaves_for_group`].
    pub fn get_codes_for_group(&self, codes: &str) -> RecodeResult<Vec<&str>> {
        Ok(self
            .find_leaves_for_group(codes)?
            .into_iter()
            .filter_map(|group| group.recode.as_deref())
            .collect())
    }

    /// Looks up many codes; results are in input order.
    #[cfg(feature = "parallel")]
    pub fn get_codes_batch<S: AsRef<str> + Sync>(&self, codes: &[S]) -> Vec<RecodeResult<Vec<&str>>> {
        codes
            .par_iter()
            .map(|code| self.get_codes(code.as_ref()))
            .collect()
    }

    /// Looks up many codes; results are in input order.
    #[cfg(not(feature = "parallel"))]
    pub fn get_codes_batch<S: AsRef<str> + Sync>(&self, codes: &[S]) -> Vec<RecodeResult<Vec<&str>>> {
        codes.iter().map(|code| self.get_codes(code.as_ref())).collect()
    }

    /// Returns (label, recode value) for every leaf, in document order.
    pub fn leaf_recodes(&self) -> Vec<(&str, &str)> {
        self.tree
            .leaves()
            .filter_map(|(_, group)| Some((group.label.as_str(), group.recode.as_deref()?)))
            .collect()
    }

    /// Renders the hierarchy as an indented table that parses back to the same leaves.
    pub fn describe(&self) -> String {
        render::describe(&self.tree)
    }
}

impl FromStr for Recoder {
    type Err = RecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, ParseConfig::default())
    }
}
