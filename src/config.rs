//! Centralized configuration for frostview.
//!
//! Goals:
//! - Single place for read-view defaults instead of scattering env lookups.
//! - FrostConfig::from_env() reads FV_* variables; the builder covers
//!   programmatic setup. ReadViewOptions::from_config consumes the result.
//!
//! Env variables (truthy = "1|true|yes|on", case-insensitive):
//! - FV_NEEDS_FIELD_NAMES
//! - FV_NEEDS_SPACE_UPGRADE
//! - FV_NEEDS_TEMPORARY_SPACES

/// Default feature flags for read views opened by this process.
#[derive(Clone, Debug, Default)]
pub struct FrostConfig {
    /// Build a private named tuple format per space read view.
    /// Env: FV_NEEDS_FIELD_NAMES (default false)
    pub needs_field_names: bool,

    /// Snapshot in-flight schema migrations into read views.
    /// Env: FV_NEEDS_SPACE_UPGRADE (default false)
    pub needs_space_upgrade: bool,

    /// Include temporary spaces into read views.
    /// Env: FV_NEEDS_TEMPORARY_SPACES (default false)
    pub needs_temporary_spaces: bool,
}

fn env_bool(name: &str) -> Option<bool> {
    let v = std::env::var(name).ok()?;
    let s = v.trim().to_ascii_lowercase();
    Some(s == "1" || s == "true" || s == "yes" || s == "on")
}

impl FrostConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(b) = env_bool("FV_NEEDS_FIELD_NAMES") {
            cfg.needs_field_names = b;
        }
        if let Some(b) = env_bool("FV_NEEDS_SPACE_UPGRADE") {
            cfg.needs_space_upgrade = b;
        }
        if let Some(b) = env_bool("FV_NEEDS_TEMPORARY_SPACES") {
            cfg.needs_temporary_spaces = b;
        }
        cfg
    }

    pub fn builder() -> FrostConfigBuilder {
        FrostConfigBuilder {
            cfg: Self::default(),
        }
    }
}

/// Builder over FrostConfig.
pub struct FrostConfigBuilder {
    cfg: FrostConfig,
}

impl FrostConfigBuilder {
    pub fn needs_field_names(mut self, v: bool) -> Self {
        self.cfg.needs_field_names = v;
        self
    }

    pub fn needs_space_upgrade(mut self, v: bool) -> Self {
        self.cfg.needs_space_upgrade = v;
        self
    }

    pub fn needs_temporary_spaces(mut self, v: bool) -> Self {
        self.cfg.needs_temporary_spaces = v;
        self
    }

    pub fn build(self) -> FrostConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_flags() {
        let cfg = FrostConfig::builder()
            .needs_field_names(true)
            .needs_temporary_spaces(true)
            .build();
        assert!(cfg.needs_field_names);
        assert!(!cfg.needs_space_upgrade);
        assert!(cfg.needs_temporary_spaces);
    }

    #[test]
    fn defaults_are_all_off() {
        let cfg = FrostConfig::default();
        assert!(!cfg.needs_field_names);
        assert!(!cfg.needs_space_upgrade);
        assert!(!cfg.needs_temporary_spaces);
    }
}
