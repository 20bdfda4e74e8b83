pub mod conditions;
pub mod fields;

pub use conditions::evaluate;
pub use fields::FieldValue;

use super::domain::{Lead, RoutingRule};

/// Stateless rule matcher over a captured rule set. Callers load the rules,
/// build an engine, and persist whatever assignment it returns; the engine
/// itself never touches storage.
pub struct RoutingEngine {
    ordered: Vec<RoutingRule>,
}

impl RoutingEngine {
    /// Keep only active rules and fix the evaluation order up front. The
    /// ordering key is explicitly `(priority, insertion_index)`, so rules
    /// sharing a priority keep their original collection order.
    pub fn new(rules: Vec<RoutingRule>) -> Self {
        let mut indexed: Vec<(usize, RoutingRule)> = rules
            .into_iter()
            .enumerate()
            .filter(|(_, rule)| rule.is_active)
            .collect();
        indexed.sort_by_key(|(index, rule)| (rule.priority, *index));

        Self {
            ordered: indexed.into_iter().map(|(_, rule)| rule).collect(),
        }
    }

    /// Owner of the first rule whose conditions are all true, or `None` when
    /// no active rule fully matches (the caller leaves the lead unassigned).
    pub fn assign(&self, lead: &Lead) -> Option<&str> {
        self.ordered
            .iter()
            .find(|rule| rule_matches(rule, lead))
            .map(|rule| rule.assign_to.as_str())
    }

    /// Every fully matching rule in evaluation order, for diagnostics and
    /// rule-builder previews.
    pub fn matching_rules(&self, lead: &Lead) -> Vec<&RoutingRule> {
        self.ordered
            .iter()
            .filter(|rule| rule_matches(rule, lead))
            .collect()
    }
}

/// AND semantics: one false condition disqualifies the rule. Zero-condition
/// rules are rejected at write time and never match here either.
fn rule_matches(rule: &RoutingRule, lead: &Lead) -> bool {
    !rule.conditions.is_empty()
        && rule
            .conditions
            .iter()
            .all(|condition| evaluate(lead, condition))
}
