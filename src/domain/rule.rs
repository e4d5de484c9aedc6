//! Pattern rules and the per-user rule sets they are grouped into.

use crate::utils::error::{AssignerError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The part of an issue a rule is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Text,
    Label,
    Any,
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(Field::Title),
            "text" => Ok(Field::Text),
            "label" => Ok(Field::Label),
            "any" => Ok(Field::Any),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Text => "text",
            Field::Label => "label",
            Field::Any => "any",
        };
        f.write_str(name)
    }
}

/// Compiled regexes keyed by their source text.
///
/// `Regex` is reference counted internally, so handing out clones shares one compiled
/// program between every rule that uses the same pattern.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Regex>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&mut self, pattern: &str) -> Result<Regex> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern).map_err(|source| AssignerError::PatternCompileError {
            pattern: pattern.to_string(),
            source,
        })?;
        self.compiled.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// A single `<field>:<pattern>` rule.
#[derive(Debug, Clone)]
pub struct Rule {
    field: Field,
    regex: Regex,
}

impl Rule {
    /// Parses one configuration line. The line is split at the first `:`; everything
    /// after it, further colons and trailing whitespace included, is the pattern.
    pub fn parse(line: &str, cache: &mut PatternCache) -> Result<Self> {
        // Leading indentation comes from TOML multi-line strings
        let line = line.trim_start();
        let (field_name, pattern) = line.split_once(':').ok_or_else(|| {
            AssignerError::config(format!(
                "rule '{}' is missing the ':' between field and pattern",
                line
            ))
        })?;

        let field = field_name
            .trim()
            .parse::<Field>()
            .map_err(|_| AssignerError::InvalidFieldError {
                field: field_name.trim().to_string(),
                line: line.to_string(),
            })?;

        Ok(Self {
            field,
            regex: cache.compile(pattern)?,
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.pattern())
    }
}

/// All rules configured for one user, in declaration order.
#[derive(Debug, Clone)]
pub struct UserRules {
    pub user: String,
    pub rules: Vec<Rule>,
}

impl UserRules {
    /// Parses a newline-delimited rule block, skipping blank lines.
    pub fn parse_block(user: &str, block: &str, cache: &mut PatternCache) -> Result<Self> {
        let rules = block
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Rule::parse(line, cache))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            user: user.to_string(),
            rules,
        })
    }
}

/// The complete rule configuration of a run.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub users: Vec<UserRules>,
    pub fallback_label: Option<String>,
}

impl RuleSet {
    /// Builds a rule set from `(user, rule block)` pairs. GitHub logins are
    /// case-insensitive, so `Alice` and `alice` count as the same user.
    pub fn from_blocks<'a, I>(blocks: I, fallback_label: Option<String>) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut cache = PatternCache::new();
        let mut seen = HashMap::new();
        let mut users = Vec::new();

        for (user, block) in blocks {
            let user = user.trim();
            if user.is_empty() {
                return Err(AssignerError::config("rule block with an empty user name"));
            }
            if let Some(previous) = seen.insert(user.to_lowercase(), user.to_string()) {
                return Err(AssignerError::config(format!(
                    "duplicate user '{}' (already defined as '{}')",
                    user, previous
                )));
            }
            let user_rules = UserRules::parse_block(user, block, &mut cache)?;
            for rule in &user_rules.rules {
                tracing::trace!("Rule for {}: {}", user, rule);
            }
            users.push(user_rules);
        }

        tracing::debug!(
            "Loaded rules for {} users ({} distinct patterns)",
            users.len(),
            cache.len()
        );

        Ok(Self {
            users,
            fallback_label,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.users.iter().map(|u| u.rules.len()).sum()
    }
}
