//! Code matching rules.
//!
//! A recode table row lists one or more code items, each of which becomes a
//! [`CodeRule`]. Queries are normalized into a [`CodeQuery`] once and then
//! tested against every rule.

use std::fmt;

use crate::icd10::{IcdCode, IcdCodeParseError};

/// A matcher for one or more ICD-10 codes.
///
/// # Examples
///
/// ```
/// use icd_recode_types::{CodeQuery, CodeRule};
///
/// let rule = CodeRule::range("G20".parse().unwrap(), "G21".parse().unwrap());
/// assert!(rule.matches(&CodeQuery::parse("G21.4").unwrap()));
/// assert!(!rule.matches(&CodeQuery::parse("G22").unwrap()));
///
/// let wildcard = CodeRule::wildcard("g2*").unwrap();
/// assert_eq!(wildcard.to_string(), "G2*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum CodeRule {
    /// A single code. A category-level code names the whole category.
    Exact {
        /// The literal code.
        code: IcdCode,
    },
    /// An inclusive range of codes.
    Range {
        /// First code in the range.
        lower: IcdCode,
        /// Last code in the range; all of its subdivisions are included.
        upper: IcdCode,
    },
    /// Every code sharing a textual prefix (`G2*`).
    Wildcard {
        /// The normalized prefix, without the trailing `*`.
        prefix: String,
    },
}

impl CodeRule {
    /// Creates an exact rule.
    pub fn exact(code: IcdCode) -> Self {
        Self::Exact { code }
    }

    /// Creates a range rule. Bounds are kept as given; see [`CodeRule::is_inverted`].
    pub fn range(lower: IcdCode, upper: IcdCode) -> Self {
        Self::Range { lower, upper }
    }

    /// Creates a wildcard rule from a pattern such as `G2*`, `G20.*` or `C141*`.
    ///
    /// The pattern is uppercased and a missing decimal point after the
    /// category is inserted, as for [`IcdCode::parse`].
    pub fn wildcard(pattern: &str) -> Result<Self, IcdCodeParseError> {
        let trimmed = pattern.trim();
        let prefix = trimmed.strip_suffix('*').unwrap_or(trimmed);
        let prefix = prefix.strip_prefix('*').unwrap_or(prefix);
        let prefix = normalize_prefix(prefix)
            .ok_or_else(|| IcdCodeParseError::InvalidFormat(trimmed.to_string()))?;
        Ok(Self::Wildcard { prefix })
    }

    /// Returns true for a range whose upper bound sorts before its lower bound.
    ///
    /// An upper bound that covers the lower bound (`G20.5-G20`) is not inverted.
    pub fn is_inverted(&self) -> bool {
        match self {
            Self::Range { lower, upper } => upper < lower && !upper.covers(lower),
            _ => false,
        }
    }

    /// Returns the rule with range bounds swapped if they were inverted.
    pub fn normalized(self) -> Self {
        match self {
            Self::Range { lower, upper } if upper < lower && !upper.covers(&lower) => Self::Range {
                lower: upper,
                upper: lower,
            },
            other => other,
        }
    }

    /// Returns true if the query falls under this rule.
    ///
    /// A category-level query (`G20`) matches any rule that matches at least
    /// one subcategory of that category.
    pub fn matches(&self, query: &CodeQuery) -> bool {
        match (self, query.code()) {
            (Self::Exact { code }, Some(q)) => {
                code.covers(q) || (q.is_category_level() && code.category_key() == q.category_key())
            }
            (Self::Range { lower, upper }, Some(q)) if q.is_category_level() => {
                lower.category_key() <= q.category_key() && q.category_key() <= upper.category_key()
            }
            (Self::Range { lower, upper }, Some(q)) => lower <= q && (q <= upper || upper.covers(q)),
            (Self::Exact { .. } | Self::Range { .. }, None) => false,
            (Self::Wildcard { prefix }, q) => {
                query.text().starts_with(prefix.as_str())
                    || q.is_some_and(|q| q.is_category_level() && prefix.starts_with(query.text()))
            }
        }
    }

    /// Returns true if every code matched by `other` is also matched by `self`.
    ///
    /// `C10-C13` contains `C11`, `C10-C11` and `C13.9` but not `C12-C14`;
    /// `G2*` contains `G20-G29`.
    pub fn contains(&self, other: &CodeRule) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some((lower, upper)), Some((other_lower, other_upper))) => {
                lower <= other_lower && reaches(&upper, &other_upper)
            }
            _ => false,
        }
    }

    /// First and last code of the rule. The last code stands for itself and
    /// all of its subdivisions.
    fn bounds(&self) -> Option<(IcdCode, IcdCode)> {
        match self {
            Self::Exact { code } => Some((code.clone(), code.clone())),
            Self::Range { lower, upper } => Some((lower.clone(), upper.clone())),
            Self::Wildcard { prefix } => {
                let prefix = prefix.trim_end_matches('.');
                let fill = 3usize.saturating_sub(prefix.len());
                let lower = IcdCode::parse(&format!("{}{}", prefix, "0".repeat(fill))).ok()?;
                let upper = IcdCode::parse(&format!("{}{}", prefix, "9".repeat(fill))).ok()?;
                Some((lower, upper))
            }
        }
    }
}

/// Returns true if `upper` and its subdivisions extend at least as far as
/// `other` and its subdivisions.
fn reaches(upper: &IcdCode, other: &IcdCode) -> bool {
    upper.covers(other) || (other < upper && !other.covers(upper))
}

impl fmt::Display for CodeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact { code } => write!(f, "{}", code),
            Self::Range { lower, upper } => write!(f, "{}-{}", lower, upper),
            Self::Wildcard { prefix } => write!(f, "{}*", prefix),
        }
    }
}

/// Normalizes a wildcard prefix: `[A-Z](\d(\d(\.?\d*)?)?)?`.
fn normalize_prefix(prefix: &str) -> Option<String> {
    let upper = prefix.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    let first = *bytes.first()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    if !bytes.iter().skip(1).take(2).all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() <= 3 {
        return Some(upper);
    }

    let rest = &upper[3..];
    let digits = rest.strip_prefix('.').unwrap_or(rest);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}.{}", &upper[..3], digits))
}

/// A normalized lookup query.
///
/// The text is uppercased with whitespace removed. If it parses as an ICD-10
/// code the canonical code is kept too; otherwise only textual matching
/// (exact text, wildcard prefix) can succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeQuery {
    text: String,
    code: Option<IcdCode>,
}

impl CodeQuery {
    /// Normalizes a raw query string.
    ///
    /// Fails only for empty input or characters outside letters, digits,
    /// `.` and `*`.
    pub fn parse(raw: &str) -> Result<Self, IcdCodeParseError> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        if compact.is_empty() {
            return Err(IcdCodeParseError::Empty);
        }
        if !compact
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '*')
        {
            return Err(IcdCodeParseError::InvalidCharacter(raw.trim().to_string()));
        }

        match IcdCode::parse(&compact) {
            Ok(code) => Ok(Self {
                text: code.to_string(),
                code: Some(code),
            }),
            Err(_) => Ok(Self {
                text: compact,
                code: None,
            }),
        }
    }

    /// Returns the normalized query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the parsed code, if the query is a well-formed ICD-10 code.
    pub fn code(&self) -> Option<&IcdCode> {
        self.code.as_ref()
    }
}

impl fmt::Display for CodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
