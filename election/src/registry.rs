//! Voter registry.
//!
//! Every identity has an implicit default record (unregistered, not voted),
//! so lookups never fail. Phase and authority gating happen in
//! [`Election`](crate::Election); the registry only enforces its own state rules.

use agora_types::{Identity, ProposalIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ElectionError;

/// Registration and ballot state for one identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub registered: bool,
    pub has_voted: bool,
    /// Set together with `has_voted`, never changed afterwards.
    pub voted_proposal: Option<ProposalIndex>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoterRegistry {
    voters: BTreeMap<Identity, Voter>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_records(voters: BTreeMap<Identity, Voter>) -> Self {
        Self { voters }
    }

    /// The voter record for `id`, or the default record if never referenced.
    pub fn get(&self, id: &Identity) -> Voter {
        self.voters.get(id).cloned().unwrap_or_default()
    }

    pub fn is_registered(&self, id: &Identity) -> bool {
        self.voters.get(id).is_some_and(|v| v.registered)
    }

    /// Check that `id` could be registered, without changing anything.
    pub fn check_register(&self, id: &Identity) -> Result<(), ElectionError> {
        if self.is_registered(id) {
            return Err(ElectionError::AlreadyRegistered(id.clone()));
        }
        Ok(())
    }

    pub fn register(&mut self, id: &Identity) -> Result<(), ElectionError> {
        self.check_register(id)?;
        self.voters.entry(id.clone()).or_default().registered = true;
        Ok(())
    }

    /// Register every identity not yet registered, skipping the rest.
    ///
    /// Unlike [`register`](Self::register), duplicates are not an error. An
    /// identity repeated within `ids` is registered once. Returns the newly
    /// registered identities in input order.
    pub fn register_many<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a Identity>,
    ) -> Vec<Identity> {
        let mut added = Vec::new();
        for id in ids {
            if self.register(id).is_ok() {
                added.push(id.clone());
            }
        }
        added
    }

    pub fn check_unregister(&self, id: &Identity) -> Result<(), ElectionError> {
        if !self.is_registered(id) {
            return Err(ElectionError::NotRegistered(id.clone()));
        }
        Ok(())
    }

    pub fn unregister(&mut self, id: &Identity) -> Result<(), ElectionError> {
        self.check_unregister(id)?;
        if let Some(voter) = self.voters.get_mut(id) {
            voter.registered = false;
        }
        Ok(())
    }

    /// Check that `id` has not voted yet.
    pub fn check_ballot(&self, id: &Identity) -> Result<(), ElectionError> {
        if self.voters.get(id).is_some_and(|v| v.has_voted) {
            return Err(ElectionError::AlreadyVoted(id.clone()));
        }
        Ok(())
    }

    /// Mark `id` as having voted for `proposal`.
    pub(crate) fn record_ballot(
        &mut self,
        id: &Identity,
        proposal: ProposalIndex,
    ) -> Result<(), ElectionError> {
        self.check_ballot(id)?;
        let voter = self.voters.entry(id.clone()).or_default();
        voter.has_voted = true;
        voter.voted_proposal = Some(proposal);
        Ok(())
    }

    /// Number of identities currently registered.
    pub fn registered_count(&self) -> usize {
        self.voters.values().filter(|v| v.registered).count()
    }

    /// Number of identities that have cast a ballot.
    pub fn voted_count(&self) -> usize {
        self.voters.values().filter(|v| v.has_voted).count()
    }

    /// All identities ever referenced, in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identity, &Voter)> {
        self.voters.iter()
    }

    pub(crate) fn records(&self) -> &BTreeMap<Identity, Voter> {
        &self.voters
    }
}
