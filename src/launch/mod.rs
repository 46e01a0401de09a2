//! The launch-profile resolver and its pipeline.

/// Pipeline orchestration over a rooted game directory.
pub mod core;
/// `${placeholder}` template expansion.
pub mod format;
/// Library store resolution and native extraction.
pub mod libraries;
/// Manifest and launch-plan data model.
pub mod models;
/// Host platform detection and rule predicates.
pub mod platform;
/// Patch resolution and chain composition.
pub mod resolver;
/// Allow/disallow rule evaluation.
pub mod rules;
