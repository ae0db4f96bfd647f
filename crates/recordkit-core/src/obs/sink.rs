//! Metrics sink boundary.
//!
//! Builder and constructor logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{error::ErrorKind, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Vec<Rc<dyn MetricsSink>>> = const { RefCell::new(Vec::new()) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    TypeBuilt {
        type_name: &'a str,
        fields: usize,
    },
    TypeRejected {
        type_name: &'a str,
        kind: ErrorKind,
    },
    RecordConstructed {
        type_name: &'a str,
        defaults_applied: u64,
    },
    FactoryInvoked {
        type_name: &'a str,
    },
    ConstructRejected {
        type_name: &'a str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::TypeBuilt { type_name, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.types_built = m.ops.types_built.saturating_add(1);
                    let entry = m.types.entry(type_name.to_string()).or_default();
                    entry.builds = entry.builds.saturating_add(1);
                });
            }

            MetricsEvent::TypeRejected { kind, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.types_rejected = m.ops.types_rejected.saturating_add(1);
                    let entry = m.rejections.entry(kind.as_str().to_string()).or_default();
                    *entry = entry.saturating_add(1);
                });
            }

            MetricsEvent::RecordConstructed {
                type_name,
                defaults_applied,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.records_constructed = m.ops.records_constructed.saturating_add(1);
                    m.ops.defaults_applied = m.ops.defaults_applied.saturating_add(defaults_applied);

                    let entry = m.types.entry(type_name.to_string()).or_default();
                    entry.records_constructed = entry.records_constructed.saturating_add(1);
                    entry.defaults_applied = entry.defaults_applied.saturating_add(defaults_applied);
                });
            }

            MetricsEvent::FactoryInvoked { type_name } => {
                metrics::with_state_mut(|m| {
                    m.ops.factory_calls = m.ops.factory_calls.saturating_add(1);
                    let entry = m.types.entry(type_name.to_string()).or_default();
                    entry.factory_calls = entry.factory_calls.saturating_add(1);
                });
            }

            MetricsEvent::ConstructRejected { type_name } => {
                metrics::with_state_mut(|m| {
                    m.ops.construct_rejections = m.ops.construct_rejections.saturating_add(1);
                    let entry = m.types.entry(type_name.to_string()).or_default();
                    entry.construct_rejections = entry.construct_rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

/// Route one event to the innermost override, or the global sink.
pub(crate) fn record(event: MetricsEvent<'_>) {
    let current = SINK_OVERRIDE.with(|cell| cell.borrow().last().cloned());

    match current {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics counters on this thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with `sink` receiving every event emitted on this thread.
/// Overrides nest; the previous sink is restored on exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard;

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                cell.borrow_mut().pop();
            });
        }
    }

    SINK_OVERRIDE.with(|cell| cell.borrow_mut().push(sink));
    let _guard = Guard;

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    #[derive(Default)]
    struct CountingSink {
        calls: Cell<usize>,
    }

    impl MetricsSink for CountingSink {
        fn record(&self, _: MetricsEvent<'_>) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn built(type_name: &str) -> MetricsEvent<'_> {
        MetricsEvent::TypeBuilt {
            type_name,
            fields: 0,
        }
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        let outer = Rc::new(CountingSink::default());
        let inner = Rc::new(CountingSink::default());

        with_metrics_sink(outer.clone(), || {
            record(built("A"));
            assert_eq!(outer.calls.get(), 1);

            with_metrics_sink(inner.clone(), || record(built("B")));

            // inner override was restored to outer
            record(built("C"));
        });

        assert_eq!(outer.calls.get(), 2);
        assert_eq!(inner.calls.get(), 1);
        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_empty()));
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        let sink = Rc::new(CountingSink::default());

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(sink.clone(), || {
                record(built("A"));
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();

        assert!(panicked);
        assert_eq!(sink.calls.get(), 1);
        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_empty()));

        record(built("B"));
        assert_eq!(sink.calls.get(), 1);
    }

    #[test]
    fn global_sink_accumulates_per_type_counters() {
        metrics_reset_all();

        record(built("Point"));
        record(MetricsEvent::RecordConstructed {
            type_name: "Point",
            defaults_applied: 2,
        });
        record(MetricsEvent::FactoryInvoked { type_name: "Point" });
        record(MetricsEvent::ConstructRejected { type_name: "Point" });
        record(MetricsEvent::TypeRejected {
            type_name: "Bad",
            kind: ErrorKind::DuplicateField,
        });

        let report = metrics_report();
        let ops = &report.counters.ops;
        assert_eq!(ops.types_built, 1);
        assert_eq!(ops.types_rejected, 1);
        assert_eq!(ops.records_constructed, 1);
        assert_eq!(ops.defaults_applied, 2);
        assert_eq!(ops.factory_calls, 1);
        assert_eq!(ops.construct_rejections, 1);
        assert_eq!(report.counters.rejections.get("duplicate_field"), Some(&1));

        let point = &report.type_summaries[0];
        assert_eq!(point.name, "Point");
        assert!((point.avg_defaults_per_record - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_clears_everything() {
        record(built("Point"));
        metrics_reset_all();

        let report = metrics_report();
        assert_eq!(report.counters.ops.types_built, 0);
        assert!(report.type_summaries.is_empty());
    }
}
