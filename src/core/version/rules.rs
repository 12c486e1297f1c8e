// ─── Rule Evaluation ───
// Decides whether a platform-conditional library or argument applies.

use serde::Deserialize;

use crate::core::platform::HostOs;

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    /// Launcher feature flags (demo mode, custom resolution, …).
    #[serde(default)]
    pub features: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Where a rule list is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleContext {
    /// Library inclusion. Feature rules take part like any other rule.
    Library,
    /// JVM/game argument expansion. Feature rules are skipped since no
    /// launcher features are tracked.
    Argument,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
            features: None,
        }
    }

    pub fn disallow() -> Self {
        Self {
            action: RuleAction::Disallow,
            os: None,
            features: None,
        }
    }

    pub fn for_os(mut self, name: &str) -> Self {
        self.os = Some(OsRule {
            name: Some(name.to_string()),
            ..OsRule::default()
        });
        self
    }

    /// Whether the rule names exactly this OS.
    fn names_os(&self, os: HostOs) -> bool {
        self.os
            .as_ref()
            .and_then(|o| o.name.as_deref())
            .is_some_and(|name| name == os.manifest_name())
    }

    /// New accumulator value after this rule, given the previous one.
    fn apply(&self, allowed: bool, os: HostOs) -> bool {
        match self.action {
            RuleAction::Allow if self.os.is_none() || self.names_os(os) => true,
            RuleAction::Disallow if self.names_os(os) => false,
            _ => allowed,
        }
    }
}

/// Evaluate a rule list for `os`.
///
/// - No rules → allowed.
/// - Otherwise start disallowed and fold over the rules in declared order;
///   every matching rule overwrites the state, so the last match wins and a
///   trailing `disallow` revokes any earlier `allow`.
pub fn evaluate(rules: &[Rule], os: HostOs, context: RuleContext) -> bool {
    if rules.is_empty() {
        return true;
    }

    rules
        .iter()
        .filter(|rule| context == RuleContext::Library || rule.features.is_none())
        .fold(false, |allowed, rule| rule.apply(allowed, os))
}
