pub mod assigner;
pub mod evaluator;
pub mod matcher;
pub mod report;
pub mod resolver;

pub use crate::domain::model::{AssignmentDecision, Issue, IssuePatch, Resolution, Strategy};
pub use crate::domain::ports::IssueTracker;
pub use crate::domain::rule::{Field, PatternCache, Rule, RuleSet, UserRules};
pub use crate::utils::error::Result;
