use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for type builds and constructions.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub types: BTreeMap<String, TypeCounters>,

    /// Build rejections keyed by stable error kind.
    pub rejections: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Builder
    pub types_built: u64,
    pub types_rejected: u64,

    // Constructor
    pub records_constructed: u64,
    pub construct_rejections: u64,
    pub defaults_applied: u64,
    pub factory_calls: u64,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeCounters {
    pub builds: u64,
    pub records_constructed: u64,
    pub construct_rejections: u64,
    pub defaults_applied: u64,
    pub factory_calls: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,

    /// Per-type counters and averages, ordered by type name.
    pub type_summaries: Vec<TypeSummary>,
}

///
/// TypeSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub records_constructed: u64,
    pub construct_rejections: u64,
    pub factory_calls: u64,
    pub avg_defaults_per_record: f64,
}

/// Build a report from the in-memory counters.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let type_summaries = snap
        .types
        .iter()
        .map(|(name, c)| TypeSummary {
            name: name.clone(),
            records_constructed: c.records_constructed,
            construct_rejections: c.construct_rejections,
            factory_calls: c.factory_calls,
            avg_defaults_per_record: if c.records_constructed > 0 {
                c.defaults_applied as f64 / c.records_constructed as f64
            } else {
                0.0
            },
        })
        .collect();

    EventReport {
        counters: snap,
        type_summaries,
    }
}
