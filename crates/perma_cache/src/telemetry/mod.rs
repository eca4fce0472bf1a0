// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured logs and metrics for memoized method calls.
//!
//! Telemetry is opt-in twice: the `logs` and `metrics` features compile the
//! recording paths in, and a [`Telemetry`] value attached to a memoized
//! method turns them on for that method.

use std::time::Duration;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, MeterProvider},
};

pub(crate) mod attributes;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

/// Telemetry configuration for a memoized method.
///
/// The default value records nothing. Enable logs with `with_logs` (requires
/// the `logs` feature) and metrics with `with_metrics` (requires the `metrics`
/// feature).
///
/// # Examples
///
/// ```
/// use perma_cache::Telemetry;
///
/// let telemetry = Telemetry::new();
/// assert!(!telemetry.is_enabled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Telemetry {
    #[cfg(any(feature = "logs", test))]
    logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    instruments: Option<Instruments>,
}

#[cfg(any(feature = "metrics", test))]
#[derive(Clone, Debug)]
struct Instruments {
    event_counter: Counter<u64>,
    operation_duration: Histogram<f64>,
}

impl Telemetry {
    /// Creates a telemetry configuration with everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a `tracing` event for every memoized call.
    ///
    /// Hits, misses and bypasses log at debug level, forced rebuilds at info,
    /// and failures at error.
    #[cfg(any(feature = "logs", test))]
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logging_enabled: true,
            ..self
        }
    }

    /// Records an event counter and an operation duration histogram using the
    /// given meter provider.
    #[cfg(any(feature = "metrics", test))]
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        let meter = metrics::create_meter(provider);
        self.instruments = Some(Instruments {
            event_counter: metrics::create_event_counter(&meter),
            operation_duration: metrics::create_operation_duration_histogram(&meter),
        });
        self
    }

    /// Returns `true` when either logs or metrics are switched on.
    #[must_use]
    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(clippy::unused_self, reason = "always disabled without telemetry features")
    )]
    pub fn is_enabled(&self) -> bool {
        #[cfg(any(feature = "logs", test))]
        if self.logging_enabled {
            return true;
        }

        #[cfg(any(feature = "metrics", test))]
        if self.instruments.is_some() {
            return true;
        }

        false
    }

    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(unused_variables, clippy::unused_self, reason = "recording compiles to nothing without telemetry features")
    )]
    #[cfg_attr(
        all(feature = "metrics", not(any(feature = "logs", test))),
        expect(unused_variables, reason = "the cache key is only written to logs")
    )]
    pub(crate) fn record(&self, method: &str, key: Option<&str>, operation: Operation, activity: Activity, duration: Duration) {
        #[cfg(any(feature = "metrics", test))]
        if let Some(instruments) = &self.instruments {
            let attrs = [
                KeyValue::new(attributes::METHOD_NAME, method.to_owned()),
                KeyValue::new(attributes::OPERATION_NAME, operation.as_str()),
                KeyValue::new(attributes::ACTIVITY_NAME, activity.as_str()),
            ];
            instruments.event_counter.add(1, &attrs);
            instruments.operation_duration.record(duration.as_secs_f64(), &attrs);
        }

        #[cfg(any(feature = "logs", test))]
        if self.logging_enabled {
            Self::emit(method, key, operation, activity, duration);
        }
    }

    #[cfg(any(feature = "logs", test))]
    fn emit(method: &str, key: Option<&str>, operation: Operation, activity: Activity, duration: Duration) {
        let op = operation.as_str();
        let ac = activity.as_str();
        let key = key.unwrap_or_default();
        let duration_ns = duration.as_nanos();

        // Field names must match the constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    perma_cache.method = method,
                    perma_cache.key = key,
                    perma_cache.operation = op,
                    perma_cache.activity = ac,
                    perma_cache.duration_ns = ?duration_ns,
                    "perma_cache.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Info => emit_event!(info),
            Severity::Debug => emit_event!(debug),
        }
    }
}

/// The entry point a caller used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    ReadThrough,
    Rebuild,
    Get,
    Bypass,
}

impl Operation {
    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(dead_code, reason = "labels are only read by telemetry features")
    )]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadThrough => "perma_cache.read_through",
            Self::Rebuild => "perma_cache.rebuild",
            Self::Get => "perma_cache.get",
            Self::Bypass => "perma_cache.bypass",
        }
    }
}

/// What happened during an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activity {
    Hit,
    Miss,
    Rebuilt,
    Bypassed,
    Error,
}

impl Activity {
    #[cfg_attr(
        not(any(feature = "logs", feature = "metrics", test)),
        expect(dead_code, reason = "labels are only read by telemetry features")
    )]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "perma_cache.hit",
            Self::Miss => "perma_cache.miss",
            Self::Rebuilt => "perma_cache.rebuilt",
            Self::Bypassed => "perma_cache.bypassed",
            Self::Error => "perma_cache.error",
        }
    }

    #[cfg(any(feature = "logs", test))]
    fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Bypassed => Severity::Debug,
            Self::Rebuilt => Severity::Info,
            Self::Error => Severity::Error,
        }
    }
}

#[cfg(any(feature = "logs", test))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Debug,
    Info,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::testing::{LogCapture, MetricTester};

    #[test]
    fn operation_as_str() {
        assert_eq!(Operation::ReadThrough.as_str(), "perma_cache.read_through");
        assert_eq!(Operation::Rebuild.as_str(), "perma_cache.rebuild");
        assert_eq!(Operation::Get.as_str(), "perma_cache.get");
        assert_eq!(Operation::Bypass.as_str(), "perma_cache.bypass");
    }

    #[test]
    fn activity_as_str() {
        assert_eq!(Activity::Hit.as_str(), "perma_cache.hit");
        assert_eq!(Activity::Miss.as_str(), "perma_cache.miss");
        assert_eq!(Activity::Rebuilt.as_str(), "perma_cache.rebuilt");
        assert_eq!(Activity::Bypassed.as_str(), "perma_cache.bypassed");
        assert_eq!(Activity::Error.as_str(), "perma_cache.error");
    }

    #[test]
    fn activity_severity() {
        assert_eq!(Activity::Hit.severity(), Severity::Debug);
        assert_eq!(Activity::Miss.severity(), Severity::Debug);
        assert_eq!(Activity::Bypassed.severity(), Severity::Debug);
        assert_eq!(Activity::Rebuilt.severity(), Severity::Info);
        assert_eq!(Activity::Error.severity(), Severity::Error);
    }

    #[test]
    fn default_is_disabled() {
        let telemetry = Telemetry::new();
        assert!(!telemetry.is_enabled());

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        telemetry.record("method1", Some("k"), Operation::Get, Activity::Hit, Duration::ZERO);
        assert!(capture.output().is_empty());
    }

    #[test]
    fn logs_contain_all_fields() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let telemetry = Telemetry::new().with_logs();
        assert!(telemetry.is_enabled());
        telemetry.record(
            "method1",
            Some("perma_cache/v1/KlassOne/method1"),
            Operation::ReadThrough,
            Activity::Miss,
            Duration::from_nanos(12345),
        );

        capture.assert_contains(attributes::METHOD_NAME);
        capture.assert_contains(attributes::KEY_NAME);
        capture.assert_contains(attributes::OPERATION_NAME);
        capture.assert_contains(attributes::ACTIVITY_NAME);
        capture.assert_contains(attributes::DURATION_NAME);
        capture.assert_contains(attributes::EVENT_NAME);

        capture.assert_contains("perma_cache/v1/KlassOne/method1");
        capture.assert_contains("12345");
        capture.assert_contains(Activity::Miss.as_str());
    }

    #[test]
    fn logs_use_activity_severity() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let telemetry = Telemetry::new().with_logs();

        telemetry.record("a", None, Operation::Rebuild, Activity::Rebuilt, Duration::ZERO);
        capture.assert_contains("INFO");

        telemetry.record("b", None, Operation::Get, Activity::Error, Duration::ZERO);
        capture.assert_contains("ERROR");
    }

    #[test]
    fn metrics_carry_method_operation_and_activity() {
        let tester = MetricTester::new();
        let telemetry = Telemetry::new().with_metrics(tester.meter_provider());
        assert!(telemetry.is_enabled());

        telemetry.record("method3", None, Operation::Bypass, Activity::Bypassed, Duration::from_millis(2));

        tester.assert_attributes_contain(&[
            KeyValue::new(attributes::METHOD_NAME, "method3"),
            KeyValue::new(attributes::OPERATION_NAME, Operation::Bypass.as_str()),
            KeyValue::new(attributes::ACTIVITY_NAME, Activity::Bypassed.as_str()),
        ]);
    }

    #[test]
    fn metrics_only_does_not_log() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        let tester = MetricTester::new();

        Telemetry::new()
            .with_metrics(tester.meter_provider())
            .record("quiet", None, Operation::Get, Activity::Miss, Duration::ZERO);

        capture.assert_not_contains("quiet");
    }
}
