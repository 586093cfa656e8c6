//! Recode table parser.
//!
//! Turns the indentation-driven text layout of a recode table into a
//! [`RecodeTree`]. Every line is classified by the regular expressions below,
//! tried in order:
//!
//! ```text
//! blank    := ws*
//! comment  := ws* ("#" | "//") any*
//! entry    := indent recode "=" label "(" codelist ")"     ; leaf in one line
//! rule     := indent codelist "=" recode                   ; rules for the open group
//! heading  := indent label ":"                             ; opens a group
//! codelist := item ("," item)*
//! item     := code ("-" code)? | prefix "*"
//! ```
//!
//! Indentation width decides nesting: a new heading or entry closes every
//! open group indented at least as deep as itself.

use std::time::Instant;

use icd_recode_types::{CodeRule, Group, GroupId, IcdCode};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::tree::RecodeTree;
use crate::types::{DataAnomaly, MalformedReason, ParseConfig, ParseStats, RecodeError, RecodeResult};

static COMMENT_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:#|//)").unwrap());

static ENTRY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?P<recode>\d+)\s*=\s*(?P<label>.+?)\s*\((?P<codes>[^()]*)\)\s*$")
        .unwrap()
});

static RULE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?P<codes>\*?[A-Za-z][^=:]*?)\s*=\s*(?P<recode>\d+)\s*$").unwrap()
});

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<indent>[ \t]*)(?P<label>[^\s#=][^=]*?)\s*:\s*$").unwrap());

static CODE_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<lower>\*?[A-Za-z]\d\d(?:\.?\d+)?)(?:\s*-\s*(?P<upper>\*?[A-Za-z]\d\d(?:\.?\d+)?))?$",
    )
    .unwrap()
});

/// One classified table line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    Heading {
        indent: &'a str,
        label: &'a str,
    },
    Entry {
        indent: &'a str,
        recode: &'a str,
        label: &'a str,
        codes: &'a str,
    },
    Rule {
        indent: &'a str,
        codes: &'a str,
        recode: &'a str,
    },
}

fn classify(line: &str) -> Option<Line<'_>> {
    if line.trim().is_empty() || COMMENT_LINE.is_match(line) {
        return Some(Line::Skip);
    }
    if let Some(caps) = ENTRY_LINE.captures(line) {
        return Some(Line::Entry {
            indent: caps.name("indent")?.as_str(),
            recode: caps.name("recode")?.as_str(),
            label: caps.name("label")?.as_str(),
            codes: caps.name("codes")?.as_str(),
        });
    }
    if let Some(caps) = RULE_LINE.captures(line) {
        return Some(Line::Rule {
            indent: caps.name("indent")?.as_str(),
            codes: caps.name("codes")?.as_str(),
            recode: caps.name("recode")?.as_str(),
        });
    }
    if let Some(caps) = HEADING_LINE.captures(line) {
        return Some(Line::Heading {
            indent: caps.name("indent")?.as_str(),
            label: caps.name("label")?.as_str(),
        });
    }
    None
}

/// Parses the code list of a table line into rules, in the order written.
///
/// Range bounds are returned as written; inversion is checked by the caller.
pub fn parse_code_list(codes: &str) -> Result<Vec<CodeRule>, MalformedReason> {
    codes.split(',').map(|item| parse_code_item(item.trim())).collect()
}

fn parse_code_item(item: &str) -> Result<CodeRule, MalformedReason> {
    let invalid = || MalformedReason::InvalidCode {
        token: item.to_string(),
    };

    if item.len() > 1 && item.ends_with('*') {
        return CodeRule::wildcard(item).map_err(|_| invalid());
    }

    let caps = CODE_ITEM.captures(item).ok_or_else(invalid)?;
    let lower = caps
        .name("lower")
        .and_then(|m| IcdCode::parse(m.as_str()).ok())
        .ok_or_else(invalid)?;
    match caps.name("upper") {
        Some(upper) => {
            let upper = IcdCode::parse(upper.as_str()).map_err(|_| invalid())?;
            Ok(CodeRule::range(lower, upper))
        }
        None => Ok(CodeRule::exact(lower)),
    }
}

/// Measures leading whitespace, counting a tab as `tab_width` columns.
fn indent_width(indent: &str, tab_width: usize) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

/// An open group on the nesting stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    indent: usize,
    id: GroupId,
}

/// Builds a [`RecodeTree`] from the text of a recode table.
#[derive(Debug, Clone, Default)]
pub struct TableParser {
    config: ParseConfig,
}

impl TableParser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    /// Returns the parser configuration.
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parses a whole table.
    ///
    /// # Errors
    /// Returns [`RecodeError::MalformedTable`] for the first line that cannot
    /// be classified or that breaks the tree structure. No partial tree is
    /// returned.
    pub fn parse(&self, text: &str) -> RecodeResult<(RecodeTree, ParseStats)> {
        let started = Instant::now();
        let mut state = ParseState {
            config: &self.config,
            tree: RecodeTree::new(),
            stack: vec![Frame {
                indent: 0,
                id: RecodeTree::ROOT,
            }],
            stats: ParseStats::default(),
        };

        // Handle UTF-8 BOM at start of file
        let text = text.trim_start_matches('\u{feff}');

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            state.stats.total_lines += 1;

            if index < self.config.skip_header_lines {
                state.stats.skipped_lines += 1;
                continue;
            }

            let malformed = |reason| RecodeError::MalformedTable {
                line_number,
                line: raw.to_string(),
                reason,
            };

            match classify(raw).ok_or_else(|| malformed(MalformedReason::Unrecognized))? {
                Line::Skip => state.stats.skipped_lines += 1,
                Line::Heading { indent, label } => {
                    let width = indent_width(indent, self.config.tab_width);
                    state
                        .open_group(width, Group::new(label.trim(), 0, line_number))
                        .map_err(malformed)?;
                }
                Line::Entry {
                    indent,
                    recode,
                    label,
                    codes,
                } => {
                    let width = indent_width(indent, self.config.tab_width);
                    let rules = state.rules(codes, line_number).map_err(malformed)?;
                    state.stats.rules += rules.len();
                    state.stats.leaves += 1;

                    let mut group = Group::new(label.trim(), 0, line_number);
                    group.rules = rules;
                    group.recode = Some(recode.to_string());
                    state.open_group(width, group).map_err(malformed)?;
                }
                Line::Rule {
                    indent,
                    codes,
                    recode,
                } => {
                    let width = indent_width(indent, self.config.tab_width);
                    let rules = state.rules(codes, line_number).map_err(malformed)?;
                    state.attach_rules(width, rules, recode).map_err(malformed)?;
                }
            }
        }

        let ParseState {
            tree, mut stats, ..
        } = state;

        stats.groups = tree.len() - 1;
        stats.empty_groups = tree
            .leaves()
            .filter(|(_, group)| group.rules.is_empty())
            .count();
        stats.parse_time_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(
            groups = stats.groups,
            leaves = stats.leaves,
            rules = stats.rules,
            empty_groups = stats.empty_groups,
            anomalies = stats.anomalies.len(),
            "Parsed recode table"
        );

        Ok((tree, stats))
    }
}

struct ParseState<'c> {
    config: &'c ParseConfig,
    tree: RecodeTree,
    stack: Vec<Frame>,
    stats: ParseStats,
}

impl ParseState<'_> {
    /// Closes open groups indented at least `indent` deep and returns the new top.
    fn unwind_to(&mut self, indent: usize) -> GroupId {
        while self.stack.len() > 1 && self.stack.last().is_some_and(|top| top.indent >= indent) {
            self.stack.pop();
        }
        self.stack.last().map_or(RecodeTree::ROOT, |top| top.id)
    }

    fn open_group(&mut self, indent: usize, mut group: Group) -> Result<GroupId, MalformedReason> {
        let parent_id = self.unwind_to(indent);
        let parent = self.tree.get_mut(parent_id);
        if parent.recode.is_some() {
            return Err(MalformedReason::RecodeWithChildren {
                label: parent.label.clone(),
            });
        }

        group.depth = self.stack.len();
        let id = self.tree.add_child(parent_id, group);
        self.stack.push(Frame { indent, id });
        Ok(id)
    }

    fn attach_rules(
        &mut self,
        indent: usize,
        rules: Vec<CodeRule>,
        recode: &str,
    ) -> Result<(), MalformedReason> {
        let target_id = self.unwind_to(indent);
        if target_id == RecodeTree::ROOT {
            return Err(MalformedReason::RuleOutsideGroup);
        }

        let target = self.tree.get_mut(target_id);
        if !target.children.is_empty() {
            return Err(MalformedReason::RecodeWithChildren {
                label: target.label.clone(),
            });
        }
        match &target.recode {
            Some(existing) if existing != recode => {
                return Err(MalformedReason::ConflictingRecode {
                    label: target.label.clone(),
                    existing: existing.clone(),
                    found: recode.to_string(),
                });
            }
            Some(_) => {}
            None => {
                target.recode = Some(recode.to_string());
                self.stats.leaves += 1;
            }
        }

        self.stats.rules += rules.len();
        target.rules.extend(rules);
        Ok(())
    }

    /// Parses a code list, rejecting or repairing inverted ranges per config.
    fn rules(&mut self, codes: &str, line_number: usize) -> Result<Vec<CodeRule>, MalformedReason> {
        let mut rules = parse_code_list(codes)?;
        for rule in rules.iter_mut() {
            if !rule.is_inverted() {
                continue;
            }
            let CodeRule::Range { lower, upper } = &*rule else {
                continue;
            };
            if !self.config.allow_inverted_ranges {
                return Err(MalformedReason::InvertedRange {
                    lower: lower.to_string(),
                    upper: upper.to_string(),
                });
            }

            let message = format!("inverted range {}-{} swapped", lower, upper);
            tracing::warn!(line_number, "{}", message);
            self.stats.anomalies.push(DataAnomaly {
                line_number,
                message,
            });
            *rule = rule.clone().normalized();
        }
        Ok(rules)
    }
}
