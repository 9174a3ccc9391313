//! Identity adapter backed by an explicit flag or the config file.
//!
//! No ambient session state: whoever constructs the adapter decides the owner,
//! and the value travels into mutating operations as an argument.

use crate::ports::config_port::ConfigPort;
use crate::ports::identity_port::IdentityPort;

pub struct StaticIdentityAdapter {
    owner: Option<String>,
}

impl StaticIdentityAdapter {
    pub fn new(owner: Option<String>) -> Self {
        Self { owner }
    }

    /// A `--owner` flag wins over `[identity] owner` in the config file.
    pub fn from_sources(flag: Option<&str>, config: &dyn ConfigPort) -> Self {
        let owner = flag
            .map(str::to_string)
            .or_else(|| config.get_string("identity", "owner"));
        Self { owner }
    }
}

impl IdentityPort for StaticIdentityAdapter {
    fn current_owner(&self) -> Option<String> {
        self.owner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::ports::identity_port::require_owner;

    #[test]
    fn flag_wins_over_config() {
        let config =
            FileConfigAdapter::from_string("[identity]\nowner = config-owner\n").unwrap();
        let identity = StaticIdentityAdapter::from_sources(Some("flag-owner"), &config);
        assert_eq!(identity.current_owner(), Some("flag-owner".to_string()));
    }

    #[test]
    fn config_used_when_no_flag() {
        let config =
            FileConfigAdapter::from_string("[identity]\nowner = config-owner\n").unwrap();
        let identity = StaticIdentityAdapter::from_sources(None, &config);
        assert_eq!(identity.current_owner(), Some("config-owner".to_string()));
    }

    #[test]
    fn unauthenticated_when_neither_present() {
        let config = FileConfigAdapter::from_string("[plan]\n").unwrap();
        let identity = StaticIdentityAdapter::from_sources(None, &config);
        assert_eq!(identity.current_owner(), None);
        assert!(require_owner(&identity).is_err());
    }
}
