pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::github::GitHubClient;
pub use config::auth::{AuthConfig, Credentials};
pub use config::rules::{load_rule_set, RulesConfig};
pub use core::assigner::{Assigner, RunSettings};
pub use core::report::{IssueOutcome, OutcomeStatus, RunReport};
pub use domain::model::{AssignmentDecision, Issue, Strategy};
pub use domain::rule::{Field, Rule, RuleSet, UserRules};
pub use utils::error::{AssignerError, Result};
