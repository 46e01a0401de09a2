//! Utility modules for the launcher.

/// Layout of the rooted game directory.
pub mod paths;
