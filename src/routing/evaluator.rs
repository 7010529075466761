//! Constraint evaluation.
//!
//! # Responsibilities
//! - Decide whether a rule's constraints hold for the current context
//! - Each evaluator owns a key prefix and ignores other constraint keys
//! - Combine evaluators with AND semantics
//!
//! # Design Decisions
//! - Matching is exact and case-sensitive, no wildcards
//! - A null expectation matches an absent attribute
//! - No constraints under an evaluator's prefix = matches (unconstrained)

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::context::RoutingContext;
use crate::routing::rule::ConstraintModel;

/// Constraint keys checked against the routing context.
pub const CONTEXT_RULE_PREFIX: &str = "mdc/";

/// Constraint keys checked against deployment metadata.
pub const DEPLOYMENT_RULE_PREFIX: &str = "env/";

/// Decides whether constraints are satisfied.
pub trait ConstraintEvaluator: Send + Sync + std::fmt::Debug {
    fn evaluate(&self, constraints: &ConstraintModel, ctx: &RoutingContext) -> bool;
}

/// Matches `mdc/`-prefixed constraints against the routing context attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextConstraintEvaluator;

impl ConstraintEvaluator for ContextConstraintEvaluator {
    fn evaluate(&self, constraints: &ConstraintModel, ctx: &RoutingContext) -> bool {
        evaluate_against(constraints, CONTEXT_RULE_PREFIX, ctx.attributes())
    }
}

/// Matches `env/`-prefixed constraints against static deployment metadata
/// (region, stack, environment...).
#[derive(Debug, Clone, Default)]
pub struct DeploymentConstraintEvaluator {
    metadata: BTreeMap<String, String>,
}

impl DeploymentConstraintEvaluator {
    pub fn new(metadata: BTreeMap<String, String>) -> Self {
        Self { metadata }
    }
}

impl ConstraintEvaluator for DeploymentConstraintEvaluator {
    fn evaluate(&self, constraints: &ConstraintModel, _ctx: &RoutingContext) -> bool {
        evaluate_against(constraints, DEPLOYMENT_RULE_PREFIX, &self.metadata)
    }
}

/// Combines evaluators with AND semantics. An empty chain matches everything.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorChain {
    evaluators: Vec<Arc<dyn ConstraintEvaluator>>,
}

impl EvaluatorChain {
    pub fn new(evaluators: Vec<Arc<dyn ConstraintEvaluator>>) -> Self {
        Self { evaluators }
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

impl ConstraintEvaluator for EvaluatorChain {
    fn evaluate(&self, constraints: &ConstraintModel, ctx: &RoutingContext) -> bool {
        self.evaluators.iter().all(|e| e.evaluate(constraints, ctx))
    }
}

fn evaluate_against(
    constraints: &ConstraintModel,
    prefix: &str,
    attributes: &BTreeMap<String, String>,
) -> bool {
    let include_match = !has_rules(&constraints.include, prefix)
        || matches_all(&constraints.include, prefix, attributes);

    let exclude_match = has_rules(&constraints.exclude, prefix)
        && matches_all(&constraints.exclude, prefix, attributes);

    include_match && !exclude_match
}

fn has_rules(rules: &BTreeMap<String, Option<String>>, prefix: &str) -> bool {
    rules.keys().any(|k| k.starts_with(prefix))
}

fn matches_all(
    rules: &BTreeMap<String, Option<String>>,
    prefix: &str,
    attributes: &BTreeMap<String, String>,
) -> bool {
    rules
        .iter()
        .filter_map(|(key, expected)| key.strip_prefix(prefix).map(|attr| (attr, expected)))
        .all(|(attr, expected)| attributes.get(attr).map(String::as_str) == expected.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(include: &[(&str, Option<&str>)], exclude: &[(&str, Option<&str>)]) -> ConstraintModel {
        let to_map = |entries: &[(&str, Option<&str>)]| -> BTreeMap<String, Option<String>> {
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect()
        };
        ConstraintModel {
            include: to_map(include),
            exclude: to_map(exclude),
        }
    }

    #[test]
    fn test_unconstrained_always_matches() {
        let evaluator = ContextConstraintEvaluator;
        let empty = ConstraintModel::default();
        assert!(evaluator.evaluate(&empty, &RoutingContext::new()));
        assert!(evaluator.evaluate(&empty, &RoutingContext::new().with("tenant", "beta")));
    }

    #[test]
    fn test_include() {
        let evaluator = ContextConstraintEvaluator;
        let c = constraints(&[("mdc/tenant", Some("beta")), ("mdc/user", Some("alice"))], &[]);

        let both = RoutingContext::new().with("tenant", "beta").with("user", "alice");
        assert!(evaluator.evaluate(&c, &both));

        let one = RoutingContext::new().with("tenant", "beta");
        assert!(!evaluator.evaluate(&c, &one));

        let case = RoutingContext::new().with("tenant", "Beta").with("user", "alice");
        assert!(!evaluator.evaluate(&c, &case));
    }

    #[test]
    fn test_null_matches_absence() {
        let evaluator = ContextConstraintEvaluator;
        let c = constraints(&[("mdc/canary", None)], &[]);

        assert!(evaluator.evaluate(&c, &RoutingContext::new()));
        assert!(!evaluator.evaluate(&c, &RoutingContext::new().with("canary", "v")));

        let excluded = constraints(&[], &[("mdc/canary", None)]);
        assert!(!evaluator.evaluate(&excluded, &RoutingContext::new()));
        assert!(evaluator.evaluate(&excluded, &RoutingContext::new().with("canary", "v")));
    }

    #[test]
    fn test_exclude_requires_all_entries() {
        let evaluator = ContextConstraintEvaluator;
        let c = constraints(&[], &[("mdc/tenant", Some("prod")), ("mdc/region", Some("eu"))]);

        let both = RoutingContext::new().with("tenant", "prod").with("region", "eu");
        assert!(!evaluator.evaluate(&c, &both));

        let partial = RoutingContext::new().with("tenant", "prod");
        assert!(evaluator.evaluate(&c, &partial));
    }

    #[test]
    fn test_include_and_exclude_combined() {
        let evaluator = ContextConstraintEvaluator;
        let c = constraints(&[("mdc/tenant", Some("beta"))], &[("mdc/user", Some("bob"))]);

        assert!(evaluator.evaluate(&c, &RoutingContext::new().with("tenant", "beta").with("user", "alice")));
        assert!(!evaluator.evaluate(&c, &RoutingContext::new().with("tenant", "beta").with("user", "bob")));
    }

    #[test]
    fn test_foreign_prefixes_are_ignored() {
        let evaluator = ContextConstraintEvaluator;
        let c = constraints(&[("env/region", Some("eu"))], &[("tenant", Some("beta"))]);
        assert!(evaluator.evaluate(&c, &RoutingContext::new().with("tenant", "beta")));
    }

    #[test]
    fn test_deployment_evaluator() {
        let metadata = [("region".to_string(), "us-east-1".to_string())].into_iter().collect();
        let evaluator = DeploymentConstraintEvaluator::new(metadata);

        let matching = constraints(&[("env/region", Some("us-east-1"))], &[]);
        let other = constraints(&[("env/region", Some("eu-west-1"))], &[]);
        let absent = constraints(&[("env/stack", None)], &[]);

        assert!(evaluator.evaluate(&matching, &RoutingContext::new()));
        assert!(!evaluator.evaluate(&other, &RoutingContext::new()));
        assert!(evaluator.evaluate(&absent, &RoutingContext::new()));
    }

    #[test]
    fn test_chain_uses_and_semantics() {
        let metadata = [("region".to_string(), "eu".to_string())].into_iter().collect();
        let chain = EvaluatorChain::new(vec![
            Arc::new(ContextConstraintEvaluator),
            Arc::new(DeploymentConstraintEvaluator::new(metadata)),
        ]);
        let c = constraints(&[("mdc/tenant", Some("beta")), ("env/region", Some("eu"))], &[]);

        assert!(chain.evaluate(&c, &RoutingContext::new().with("tenant", "beta")));
        assert!(!chain.evaluate(&c, &RoutingContext::new().with("tenant", "prod")));

        let empty = EvaluatorChain::default();
        assert!(empty.is_empty());
        assert!(empty.evaluate(&c, &RoutingContext::new()));
    }
}
