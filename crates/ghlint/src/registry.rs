//! Functionality for registering rules and collecting their findings.

use std::process::ExitCode;

use indexmap::IndexMap;

use crate::{
    config::Config,
    finding::Finding,
    models::InputKey,
    rule::{
        Rule, RuleState, invalid_expression_usage::InvalidExpressionUsageRule,
        invalid_local_action_path::InvalidLocalActionPathRule, redundant_shell::RedundantShellRule,
    },
};

/// The exit code for a run that reported at least one finding.
///
/// Distinct from the generic failure code `1`, which means the run itself failed.
pub const FINDINGS_EXIT_CODE: u8 = 10;

pub struct RuleRegistry {
    rules: IndexMap<&'static str, Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self {
            rules: Default::default(),
        }
    }

    /// Constructs a new [`RuleRegistry`] with all default rules registered.
    pub fn default_rules(state: &RuleState) -> Self {
        let mut registry = Self::empty();

        registry.register(Box::new(RedundantShellRule));
        registry.register(Box::new(InvalidExpressionUsageRule));
        registry.register(Box::new(InvalidLocalActionPathRule::new(state)));

        registry
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registers `rule` under its name, replacing any rule of the same name.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.insert(rule.name(), rule);
    }

    pub fn iter_rules(&self) -> indexmap::map::Iter<'_, &'static str, Box<dyn Rule>> {
        self.rules.iter()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// A finding, along with the input it was found in.
#[derive(Debug)]
pub struct KeyedFinding<'a> {
    pub key: &'a InputKey,
    pub finding: Finding<'a>,
}

/// A registry of all findings discovered during a `ghlint` run.
#[derive(Debug, Default)]
pub struct FindingRegistry<'a> {
    ignored: Vec<KeyedFinding<'a>>,
    findings: Vec<KeyedFinding<'a>>,
}

impl<'a> FindingRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the findings for the input `key`, moving the ones `config`
    /// disables into the ignored set.
    pub fn extend(&mut self, config: &Config, key: &'a InputKey, results: Vec<Finding<'a>>) {
        for finding in results {
            let keyed = KeyedFinding { key, finding };
            if config.ignores(&keyed.finding) {
                self.ignored.push(keyed);
            } else {
                self.findings.push(keyed);
            }
        }
    }

    /// The total count of all findings, regardless of status.
    pub fn count(&self) -> usize {
        self.findings.len() + self.ignored.len()
    }

    /// All non-ignored findings.
    pub fn findings(&self) -> &[KeyedFinding<'a>] {
        &self.findings
    }

    /// All ignored findings.
    pub fn ignored(&self) -> &[KeyedFinding<'a>] {
        &self.ignored
    }

    /// Returns an appropriate exit code: success when nothing was found,
    /// and [`FINDINGS_EXIT_CODE`] otherwise. Ignored findings don't count.
    pub fn exit_code(&self) -> ExitCode {
        if self.findings.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(FINDINGS_EXIT_CODE)
        }
    }
}
