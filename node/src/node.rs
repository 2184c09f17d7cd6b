//! The election node: the single serialization point for one election.
//!
//! Mutating calls take the write lock, so exactly one is applied at a time
//! in arrival order. Queries take the read lock and always see the last
//! fully applied and persisted state.

use std::sync::Arc;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::RwLock;
use tracing::Instrument;

use agora_election::{
    Election, ElectionCall, ElectionEvent, ElectionSnapshot, Proposal, TallyResult, Voter,
};
use agora_store::ElectionStore;
use agora_store_lmdb::{LmdbElectionStore, LmdbEnvironment};
use agora_types::{Clock, Identity, Phase, ProposalIndex, SystemClock};

use crate::config::NodeConfig;
use crate::event_bus::EventBus;
use crate::journal::{decode_entries, replay, JournalEntry};
use crate::metrics::ElectionMetrics;
use crate::tracing_spans::call_span;
use crate::NodeError;

/// State guarded by the node's lock: the election and the next journal slot.
struct Ledger {
    election: Election,
    next_seq: u64,
}

pub struct ElectionNode<S: ElectionStore> {
    ledger: RwLock<Ledger>,
    store: S,
    clock: Arc<dyn Clock>,
    events: EventBus,
    metrics: Option<ElectionMetrics>,
}

impl ElectionNode<LmdbElectionStore> {
    /// Open the LMDB store in `config.data_dir` and restore the election from it.
    pub fn open_lmdb(config: &NodeConfig) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())
            .map_err(agora_store::StoreError::from)?;
        Self::open(config, env.election_store(), Arc::new(SystemClock))
    }
}

impl<S: ElectionStore> ElectionNode<S> {
    /// Restore the election held in `store`, or start a fresh one if the
    /// store is empty.
    pub fn open(config: &NodeConfig, store: S, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        let entries = decode_entries(store.entries()?)?;
        let election = match store.get_snapshot()? {
            Some(bytes) => {
                let election = Election::load_state(&bytes)?;
                if config.verify_journal_on_open {
                    check_journal(&election, &entries)?;
                }
                election
            }
            None if entries.is_empty() => Election::new(config.authority.clone()),
            None => {
                tracing::warn!(
                    entries = entries.len(),
                    "no snapshot stored, rebuilding election from journal"
                );
                replay(config.authority.clone(), &entries)?
            }
        };

        if election.authority() != &config.authority {
            return Err(NodeError::AuthorityMismatch {
                configured: config.authority.clone(),
                stored: election.authority().clone(),
            });
        }

        let metrics = config.enable_metrics.then(ElectionMetrics::new);
        if let Some(m) = &metrics {
            m.observe(&election);
        }

        tracing::info!(
            authority = %election.authority(),
            phase = %election.phase(),
            journal = entries.len(),
            "election node opened"
        );

        Ok(Self {
            ledger: RwLock::new(Ledger {
                election,
                next_seq: entries.len() as u64,
            }),
            store,
            clock,
            events: EventBus::new(),
            metrics,
        })
    }

    /// Register a listener for events of accepted calls.
    ///
    /// Listeners are added before the node is shared.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ElectionEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Apply one call: check it, persist it, then publish it.
    ///
    /// A rejected call and a call that fails to persist both leave the
    /// election, the store and the event stream unchanged.
    pub async fn submit(&self, call: ElectionCall) -> Result<Vec<ElectionEvent>, NodeError> {
        let span = call_span(call.name(), call.caller().as_str());
        self.submit_inner(call).instrument(span).await
    }

    async fn submit_inner(&self, call: ElectionCall) -> Result<Vec<ElectionEvent>, NodeError> {
        let op = call.name();
        let mut ledger = self.ledger.write().await;

        let mut next = ledger.election.clone();
        let events = match next.apply(&call) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(reason = %e, "call rejected");
                if let Some(m) = &self.metrics {
                    m.calls_rejected.with_label_values(&[op, e.kind()]).inc();
                }
                return Err(e.into());
            }
        };

        let is_vote = matches!(call, ElectionCall::Vote { .. });
        let entry = JournalEntry {
            seq: ledger.next_seq,
            accepted_at: self.clock.now(),
            call,
        };
        if let Err(e) = self.persist(&entry, &next) {
            tracing::error!(error = %e, seq = entry.seq, "failed to persist accepted call");
            if let Some(m) = &self.metrics {
                m.store_failures.inc();
            }
            return Err(e);
        }

        ledger.election = next;
        ledger.next_seq += 1;

        if let Some(m) = &self.metrics {
            m.calls_accepted.with_label_values(&[op]).inc();
            if is_vote {
                m.votes_cast.inc();
            }
            m.observe(&ledger.election);
        }
        for event in &events {
            tracing::debug!(event = event.name(), seq = entry.seq, "event emitted");
            self.events.emit(event);
        }
        Ok(events)
    }

    /// Write the journal entry and the resulting snapshot in one commit.
    ///
    /// The commit is a blocking write transaction. On a multi-thread runtime
    /// the worker hands its other tasks off for the duration.
    fn persist(&self, entry: &JournalEntry, election: &Election) -> Result<(), NodeError> {
        let bytes = entry.encode()?;
        let snapshot = election.save_state()?;
        let commit = || self.store.commit(entry.seq, &bytes, &snapshot);
        match Handle::try_current().map(|h| h.runtime_flavor()) {
            Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(commit)?,
            _ => commit()?,
        }
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub async fn phase(&self) -> Phase {
        self.ledger.read().await.election.phase()
    }

    pub async fn voter(&self, id: &Identity) -> Voter {
        self.ledger.read().await.election.voter(id)
    }

    pub async fn proposal(&self, index: ProposalIndex) -> Result<Proposal, NodeError> {
        Ok(self.ledger.read().await.election.proposal(index)?.clone())
    }

    pub async fn proposal_count(&self) -> ProposalIndex {
        self.ledger.read().await.election.proposal_count()
    }

    pub async fn proposals(&self) -> Vec<Proposal> {
        self.ledger.read().await.election.proposals().to_vec()
    }

    pub async fn tally_result(&self) -> Result<TallyResult, NodeError> {
        Ok(self.ledger.read().await.election.tally_result()?.clone())
    }

    /// A consistent copy of the whole election state.
    pub async fn snapshot(&self) -> ElectionSnapshot {
        self.ledger.read().await.election.snapshot()
    }

    /// Number of accepted calls so far.
    pub async fn journal_len(&self) -> u64 {
        self.ledger.read().await.next_seq
    }

    /// Every accepted call, in acceptance order.
    pub fn journal(&self) -> Result<Vec<JournalEntry>, NodeError> {
        decode_entries(self.store.entries()?)
    }

    /// Check that replaying the stored journal reproduces the live election.
    pub async fn verify_journal(&self) -> Result<(), NodeError> {
        let ledger = self.ledger.read().await;
        let entries = decode_entries(self.store.entries()?)?;
        check_journal(&ledger.election, &entries)
    }

    pub fn metrics(&self) -> Option<&ElectionMetrics> {
        self.metrics.as_ref()
    }
}

fn check_journal(election: &Election, entries: &[JournalEntry]) -> Result<(), NodeError> {
    let replayed = replay(election.authority().clone(), entries)?;
    if &replayed != election {
        return Err(NodeError::JournalMismatch(format!(
            "replayed {} entries to phase {}, stored election is in phase {}",
            entries.len(),
            replayed.phase(),
            election.phase()
        )));
    }
    Ok(())
}
