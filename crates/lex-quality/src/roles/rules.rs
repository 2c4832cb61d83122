//! Versioned rule table for role suggestion.
//!
//! Each rule scores a candidate column for one role; `None` means the rule
//! does not apply. Rules for a role are tried in table order and the first
//! rule with any candidate decides, picking its highest score (ties go to the
//! earliest column).

use crate::types::{ColumnProfile, SemanticType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bumped whenever a rule, its order, or a vocabulary changes.
pub const RULESET_VERSION: u32 = 2;

/// Singular analytical roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Id,
    Target,
    Time,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Id => "id",
            Role::Target => "target",
            Role::Time => "time",
        }
    }
}

pub const OUTCOME_VOCABULARY: [&str; 9] = [
    "grade", "score", "outcome", "target", "label", "status", "readmit", "pass", "result",
];

pub const TIME_VOCABULARY: [&str; 7] = [
    "date", "time", "semester", "quarter", "period", "year", "month",
];

/// Substring that marks a column name as an identifier.
const IDENTIFIER_MARKER: &str = "id";

/// Tokens that never count as a dataset's dominant noun.
const STOP_TOKENS: [&str; 8] = ["id", "the", "and", "for", "per", "num", "number", "count"];

const MIN_ID_UNIQUENESS: f64 = 0.95;
const MIN_NOUN_SIMILARITY: u32 = 3;

/// Dataset-wide facts some rules need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleContext {
    /// Most frequent name token shared by at least two columns.
    pub dominant_noun: Option<String>,
}

impl RuleContext {
    pub fn from_columns(columns: &[ColumnProfile]) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();

        for column in columns {
            let mut tokens = name_tokens(&column.name);
            tokens.sort();
            tokens.dedup();
            for token in tokens {
                if token.len() < 3 || STOP_TOKENS.contains(&token.as_str()) {
                    continue;
                }
                match index.get(&token) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        index.insert(token.clone(), counts.len());
                        counts.push((token, 1));
                    }
                }
            }
        }

        let mut dominant: Option<(String, usize)> = None;
        for (token, count) in counts {
            if count >= 2 && dominant.as_ref().is_none_or(|(_, best)| count > *best) {
                dominant = Some((token, count));
            }
        }

        Self {
            dominant_noun: dominant.map(|(token, _)| token),
        }
    }
}

/// One entry of the rule table.
pub struct RoleRule {
    pub name: &'static str,
    pub role: Role,
    pub score: fn(&ColumnProfile, &RuleContext) -> Option<u32>,
}

/// Ordered rule table.
pub static RULES: [RoleRule; 7] = [
    RoleRule {
        name: "id_named_unique_identifier",
        role: Role::Id,
        score: id_named_unique_identifier,
    },
    RoleRule {
        name: "id_first_identifier",
        role: Role::Id,
        score: id_first_identifier,
    },
    RoleRule {
        name: "target_outcome_vocabulary",
        role: Role::Target,
        score: target_outcome_vocabulary,
    },
    RoleRule {
        name: "target_first_boolean",
        role: Role::Target,
        score: target_first_boolean,
    },
    RoleRule {
        name: "target_dominant_noun",
        role: Role::Target,
        score: target_dominant_noun,
    },
    RoleRule {
        name: "time_datetime",
        role: Role::Time,
        score: time_datetime,
    },
    RoleRule {
        name: "time_named_categorical",
        role: Role::Time,
        score: time_named_categorical,
    },
];

static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]?[a-z]+|[A-Z]+|[0-9]+").expect("Invalid regex: word"));

/// Split a column name into lowercase tokens on separators and camelCase
/// boundaries ("StudentID" -> ["student", "id"]).
pub fn name_tokens(name: &str) -> Vec<String> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .flat_map(|segment| WORD_PATTERN.find_iter(segment))
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

fn contains_any(name: &str, vocabulary: &[&str]) -> bool {
    let lower = name.to_lowercase();
    vocabulary.iter().any(|word| lower.contains(word))
}

fn common_prefix_len(a: &str, b: &str) -> u32 {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count() as u32
}

fn id_named_unique_identifier(column: &ColumnProfile, _: &RuleContext) -> Option<u32> {
    (contains_any(&column.name, &[IDENTIFIER_MARKER])
        && column.inferred_type == SemanticType::IdentifierText
        && column.distinct_ratio() >= MIN_ID_UNIQUENESS)
        .then_some(1)
}

fn id_first_identifier(column: &ColumnProfile, _: &RuleContext) -> Option<u32> {
    (column.inferred_type == SemanticType::IdentifierText).then_some(1)
}

fn target_outcome_vocabulary(column: &ColumnProfile, _: &RuleContext) -> Option<u32> {
    let eligible = matches!(
        column.inferred_type,
        SemanticType::Numeric | SemanticType::Boolean
    );
    (eligible && contains_any(&column.name, &OUTCOME_VOCABULARY)).then_some(1)
}

fn target_first_boolean(column: &ColumnProfile, _: &RuleContext) -> Option<u32> {
    (column.inferred_type == SemanticType::Boolean).then_some(1)
}

fn target_dominant_noun(column: &ColumnProfile, ctx: &RuleContext) -> Option<u32> {
    if column.inferred_type != SemanticType::Numeric {
        return None;
    }
    let noun = ctx.dominant_noun.as_deref()?;
    name_tokens(&column.name)
        .iter()
        .map(|token| common_prefix_len(token, noun))
        .max()
        .filter(|&similarity| similarity >= MIN_NOUN_SIMILARITY)
}

fn time_datetime(column: &ColumnProfile, _: &RuleContext) -> Option<u32> {
    (column.inferred_type == SemanticType::Datetime).then_some(1)
}

fn time_named_categorical(column: &ColumnProfile, _: &RuleContext) -> Option<u32> {
    (column.inferred_type == SemanticType::Categorical
        && contains_any(&column.name, &TIME_VOCABULARY))
    .then_some(1)
}
