//! The Configuration Processor: normalize, then run independent audit
//! analyzers, then assemble a [`crate::report::Report`].

use crate::audit;
use crate::cancel::Cancellation;
use crate::error::{CoreError, Result};
use crate::model::CommonDevice;
use crate::normalize::normalize;
use crate::report::{ConfigInfo, ConfigStatistics, FindingsStore, ProcessorConfig, Report};
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, info};

/// Normalizes `cfg` and runs the enabled audit analyzers against it,
/// producing a [`Report`].
///
/// Checks `cancel` once before any work begins, per the same contract as
/// [`crate::engine::compare_configs`]. Everything past that point is a
/// finding, never a thrown error: an analyzer that panics is caught at its
/// own boundary and surfaces as a single critical finding carrying the
/// panic message, and `process_config` still returns `Ok`.
pub fn process_config(cfg: &CommonDevice, config: &ProcessorConfig) -> Result<Report> {
    process_config_cancellable(cfg, config, &Cancellation::new())
}

/// As [`process_config`], but checks an explicit cancellation token before
/// starting work.
pub fn process_config_cancellable(
    cfg: &CommonDevice,
    config: &ProcessorConfig,
    cancel: &Cancellation,
) -> Result<Report> {
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    info!("processing configuration");
    let normalized = normalize(cfg);
    let store = FindingsStore::new();
    let threshold = config.performance_rule_threshold;

    // Each closure borrows only `&normalized`/`threshold`/`store`, so they
    // can run as independent jobs on rayon's shared pool — the "bounded
    // worker pool" of spec §5 — without any coordination between them.
    let jobs: Vec<(bool, &str, Box<dyn Fn(&CommonDevice) -> Vec<crate::report::Finding> + Sync>)> = vec![
        (
            config.enable_dead_rule_check,
            "dead-rule",
            Box::new(audit::analyze_dead_rule),
        ),
        (
            config.enable_unused_interface_check,
            "unused-interface",
            Box::new(audit::analyze_unused_interface),
        ),
        (
            config.enable_consistency_check,
            "consistency",
            Box::new(audit::analyze_consistency),
        ),
        (
            config.enable_security_analysis,
            "security",
            Box::new(audit::analyze_security),
        ),
        (
            config.enable_performance_analysis,
            "performance",
            Box::new(move |cfg: &CommonDevice| audit::analyze_performance_with_threshold(cfg, threshold)),
        ),
        (
            config.enable_compliance_check,
            "compliance",
            Box::new(audit::analyze_compliance),
        ),
    ];

    let enabled: Vec<_> = jobs.into_iter().filter(|(on, ..)| *on).collect();

    rayon::scope(|scope| {
        for (_, name, analyzer) in &enabled {
            let store = &store;
            let analyzer = analyzer.as_ref();
            scope.spawn(move |_| {
                run_guarded(name, analyzer, &normalized, store, cancel);
            });
        }
    });

    let findings = store.into_findings();
    let statistics = ConfigStatistics::compute(&normalized, &findings);

    Ok(Report {
        generated_at: chrono::Utc::now(),
        config_info: ConfigInfo::from_device(&normalized),
        normalized_config: normalized,
        statistics,
        findings,
        processor_config: *config,
    })
}

/// Runs one analyzer behind a panic-recovery boundary, pushing either its
/// findings or a single critical finding carrying the panic message.
///
/// Checks `cancel` once more immediately before the analyzer runs, per spec
/// §5: a token that fires after the jobs are scheduled but before a given
/// job actually starts must still stop that job from running.
fn run_guarded(
    name: &str,
    analyzer: &(dyn Fn(&CommonDevice) -> Vec<crate::report::Finding> + Sync),
    cfg: &CommonDevice,
    store: &FindingsStore,
    cancel: &Cancellation,
) {
    if cancel.is_cancelled() {
        return;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| analyzer(cfg))) {
        Ok(findings) => store.extend(findings),
        Err(panic) => {
            let message = panic_message(&panic);
            error!(analyzer = name, message = %message, "audit analyzer panicked");
            store.push(
                crate::report::Finding::new(
                    crate::report::Severity::Critical,
                    name,
                    "Audit analyzer panicked",
                    format!("analyzer panicked: {message}"),
                    name,
                )
                .with_recommendation("investigate and report this as a bug"),
            );
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
