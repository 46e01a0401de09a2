//! Evaluation of allow/disallow rule lists against the host environment.

use crate::error::Result;
use crate::launch::models::{Rule, RuleAction};
use crate::launch::platform::{
    arch_matches, os_name_matches, os_version_matches, FeatureFlags, HostDescriptor,
};

/// Reduce an ordered rule list to a single boolean.
///
/// A rule's predicate is the conjunction of every constraint it declares.
/// A matching `disallow` vetoes immediately, no matter what came before or
/// after; a matching `allow` only records permission and keeps scanning,
/// so a later disallow can still veto. An empty list allows nothing.
pub fn is_allowed(
    rules: &[Rule],
    host: &HostDescriptor,
    features: &FeatureFlags,
) -> Result<bool> {
    let mut allowed = false;
    for rule in rules {
        if rule_matches(rule, host, features)? {
            match rule.action {
                RuleAction::Allow => allowed = true,
                RuleAction::Disallow => return Ok(false),
            }
        }
    }
    Ok(allowed)
}

fn rule_matches(rule: &Rule, host: &HostDescriptor, features: &FeatureFlags) -> Result<bool> {
    if let Some(os) = &rule.os {
        if let Some(arch) = &os.arch {
            if !arch_matches(arch, &host.os_arch) {
                return Ok(false);
            }
        }
        if let Some(name) = &os.name {
            if !os_name_matches(name, &host.os_name) {
                return Ok(false);
            }
        }
        if let Some(version) = &os.version {
            if !os_version_matches(version, &host.os_version)? {
                return Ok(false);
            }
        }
    }
    if let Some(required) = &rule.features {
        for (feature, required_value) in required {
            // An absent flag never satisfies a constraint, even a `false` one.
            if features.get(feature) != Some(required_value) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
