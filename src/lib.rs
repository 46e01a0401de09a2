//! glauncher: a lightweight Minecraft launcher built around a rule-based
//! launch-profile resolver.
//!
//! The core of the crate reduces a hierarchical version descriptor (a
//! patch chain with platform- and feature-conditional rules) to one
//! concrete launch plan for the current host: resolved argument lists, a
//! resolved classpath and a single main class. Login, account persistence
//! and process spawning are a thin shell around that core.

pub mod auth;
pub mod error;
pub mod launch;
pub mod utils;

pub use auth::AuthAccount;
pub use error::{Error, Result};
pub use launch::core::{LaunchCore, ResolvedLaunch};
pub use launch::models::LaunchPlan;
pub use launch::platform::{default_features, FeatureFlags, HostDescriptor};
