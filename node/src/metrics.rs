//! Prometheus metrics for the election node.
//!
//! [`ElectionMetrics`] owns a dedicated [`Registry`] that callers can encode
//! into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use agora_election::Election;

use crate::NodeError;

pub struct ElectionMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Accepted calls, labelled by operation.
    pub calls_accepted: IntCounterVec,
    /// Rejected calls, labelled by operation and rejection reason.
    pub calls_rejected: IntCounterVec,
    /// Ballots recorded.
    pub votes_cast: IntCounter,
    /// Calls that passed every check but could not be persisted.
    pub store_failures: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub registered_voters: IntGauge,
    /// Proposals including the abstention sentinel.
    pub proposals: IntGauge,
    /// Current phase as its workflow position (0 = registration).
    pub phase: IntGauge,
}

impl ElectionMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let calls_accepted = register_int_counter_vec_with_registry!(
            Opts::new("agora_calls_accepted_total", "Calls applied to the election"),
            &["op"],
            registry
        )
        .expect("failed to register calls_accepted counter");

        let calls_rejected = register_int_counter_vec_with_registry!(
            Opts::new("agora_calls_rejected_total", "Calls rejected by the election"),
            &["op", "reason"],
            registry
        )
        .expect("failed to register calls_rejected counter");

        let votes_cast = register_int_counter_with_registry!(
            Opts::new("agora_votes_cast_total", "Ballots recorded"),
            registry
        )
        .expect("failed to register votes_cast counter");

        let store_failures = register_int_counter_with_registry!(
            Opts::new(
                "agora_store_failures_total",
                "Accepted calls dropped because persistence failed"
            ),
            registry
        )
        .expect("failed to register store_failures counter");

        let registered_voters = register_int_gauge_with_registry!(
            Opts::new("agora_registered_voters", "Identities currently registered"),
            registry
        )
        .expect("failed to register registered_voters gauge");

        let proposals = register_int_gauge_with_registry!(
            Opts::new("agora_proposals", "Proposals in the ledger, sentinel included"),
            registry
        )
        .expect("failed to register proposals gauge");

        let phase = register_int_gauge_with_registry!(
            Opts::new("agora_phase", "Current election phase position"),
            registry
        )
        .expect("failed to register phase gauge");

        Self {
            registry,
            calls_accepted,
            calls_rejected,
            votes_cast,
            store_failures,
            registered_voters,
            proposals,
            phase,
        }
    }

    /// Refresh the gauges from the current election state.
    pub fn observe(&self, election: &Election) {
        self.registered_voters
            .set(election.registered_count() as i64);
        self.proposals.set(i64::from(election.proposal_count()));
        self.phase.set(i64::from(election.phase().index()));
    }

    /// Encode every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| NodeError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| NodeError::Metrics(e.to_string()))
    }
}

impl Default for ElectionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
