//! Caller role checks.

use agora_types::Identity;

use crate::error::ElectionError;
use crate::registry::VoterRegistry;

/// Holds the single authority identity, fixed for the election's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessControl {
    authority: Identity,
}

impl AccessControl {
    pub fn new(authority: Identity) -> Self {
        Self { authority }
    }

    pub fn authority(&self) -> &Identity {
        &self.authority
    }

    pub fn require_authority(&self, caller: &Identity) -> Result<(), ElectionError> {
        if caller != &self.authority {
            return Err(ElectionError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    pub fn require_registered_voter(
        &self,
        registry: &VoterRegistry,
        caller: &Identity,
    ) -> Result<(), ElectionError> {
        if !registry.is_registered(caller) {
            return Err(ElectionError::Unauthorized(caller.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_authority_passes() {
        let access = AccessControl::new(Identity::new("admin"));
        assert!(access.require_authority(&Identity::new("admin")).is_ok());
        assert_eq!(
            access.require_authority(&Identity::new("mallory")),
            Err(ElectionError::Unauthorized(Identity::new("mallory")))
        );
    }

    #[test]
    fn registered_voter_check_follows_registry() {
        let access = AccessControl::new(Identity::new("admin"));
        let mut registry = VoterRegistry::new();
        let alice = Identity::new("alice");
        assert!(access.require_registered_voter(&registry, &alice).is_err());
        registry.register(&alice).unwrap();
        assert!(access.require_registered_voter(&registry, &alice).is_ok());
    }

    #[test]
    fn authority_is_not_implicitly_a_voter() {
        let access = AccessControl::new(Identity::new("admin"));
        let registry = VoterRegistry::new();
        assert!(access
            .require_registered_voter(&registry, &Identity::new("admin"))
            .is_err());
    }
}
