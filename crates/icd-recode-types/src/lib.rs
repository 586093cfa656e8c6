//! # icd-recode-types
//!
//! Type definitions for mapping ICD-10 cause-of-death codes onto the
//! CDC/NCHS "Selected Causes of Death" recode groups.
//!
//! This crate provides the parsed code type, the matching rules a recode
//! table row is made of, and the hierarchy node those rules hang from.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use icd_recode_types::{CodeQuery, CodeRule, Group, IcdCode};
//!
//! let lower: IcdCode = "C10".parse().unwrap();
//! let upper: IcdCode = "C13".parse().unwrap();
//!
//! let mut pharynx = Group::new("Of pharynx", 3, 42);
//! pharynx.rules.push(CodeRule::range(lower, upper));
//! pharynx.rules.push(CodeRule::exact("C14.0".parse().unwrap()));
//! pharynx.recode = Some("07400".to_string());
//!
//! assert!(pharynx.matches(&CodeQuery::parse("c11.2").unwrap()));
//! assert!(pharynx.matches(&CodeQuery::parse("C140").unwrap()));
//! ```

#![warn(missing_docs)]

mod group;
mod icd10;
mod rule;

// Re-export all public types at crate root
pub use group::{Group, GroupId};
pub use icd10::{IcdCode, IcdCodeParseError};
pub use rule::{CodeQuery, CodeRule};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let code: IcdCode = "G20".parse().unwrap();
        let _rule = CodeRule::exact(code);
        let _group = Group::new("root", 0, 0);
        let _id = GroupId(0);
        let _query = CodeQuery::parse("G20").unwrap();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let mut group = Group::new("Of pharynx", 3, 42);
        group.rules.push(CodeRule::range(
            "C10".parse().unwrap(),
            "C13".parse().unwrap(),
        ));
        group.rules.push(CodeRule::wildcard("C14*").unwrap());
        group.recode = Some("07400".to_string());

        let json = serde_json::to_string(&group).unwrap();
        assert!(json.contains("\"lower\":\"C10\""));
        let parsed: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(group, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_invalid_code() {
        let result: Result<IcdCode, _> = serde_json::from_str("\"not a code\"");
        assert!(result.is_err());
    }
}
