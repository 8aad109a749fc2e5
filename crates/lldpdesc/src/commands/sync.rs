//! Sync command: reconcile LLDP into descriptions on each named device.

use futures_util::{StreamExt, stream};
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, error};

use lldpdesc_core::{
    ChangeEvent, CoreError, DeviceReport, Session, SyncOptions, SyncOutcome, sync_device,
};

use crate::cli::{GlobalOpts, OutputFormat, SyncArgs};
use crate::config::{self, DeviceTemplate};
use crate::error::CliError;
use crate::output;

// ── Result shape ────────────────────────────────────────────────────

/// What happened on one device, as rendered to the operator.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum DeviceResult {
    Ok(DeviceReport),
    Failed { device: String, error: String },
}

impl DeviceResult {
    fn device(&self) -> &str {
        match self {
            Self::Ok(report) => &report.device,
            Self::Failed { device, .. } => device,
        }
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Event")]
    kind: String,
    #[tabled(rename = "Was")]
    was: String,
    #[tabled(rename = "Now")]
    now: String,
}

impl EventRow {
    fn new(device: &str, event: &ChangeEvent, color: bool) -> Self {
        let show = |identity: &Option<lldpdesc_core::RemoteIdentity>| {
            identity.as_ref().map(ToString::to_string).unwrap_or_default()
        };
        Self {
            device: device.to_owned(),
            port: event.local_port.clone(),
            kind: output::paint_kind(event.kind, color),
            was: show(&event.previous),
            now: show(&event.current),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Neighbors")]
    neighbors: String,
    #[tabled(rename = "Changes")]
    changes: String,
    #[tabled(rename = "Result")]
    result: String,
}

fn summary_row(result: &DeviceResult, color: bool) -> SummaryRow {
    match result {
        DeviceResult::Ok(report) => SummaryRow {
            device: report.device.clone(),
            neighbors: report.neighbors.to_string(),
            changes: report.changes.len().to_string(),
            result: outcome_label(report.outcome).into(),
        },
        DeviceResult::Failed { device, error } => SummaryRow {
            device: device.clone(),
            neighbors: "-".into(),
            changes: "-".into(),
            result: output::paint_failure(&format!("failed: {error}"), color),
        },
    }
}

fn outcome_label(outcome: SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::NoChanges => "no changes",
        SyncOutcome::DryRun => "dry run, not committed",
        SyncOutcome::Committed => "committed",
    }
}

fn plain_lines(result: &DeviceResult) -> String {
    match result {
        DeviceResult::Ok(report) => report
            .events
            .iter()
            .map(|event| format!("{}: {event}", report.device))
            .chain(std::iter::once(format!(
                "{}: {}",
                report.device,
                outcome_label(report.outcome)
            )))
            .collect::<Vec<_>>()
            .join("\n"),
        DeviceResult::Failed { device, error } => format!("{device}: failed: {error}"),
    }
}

fn render_table(results: &[DeviceResult], color: bool) -> String {
    let events: Vec<EventRow> = results
        .iter()
        .filter_map(|result| match result {
            DeviceResult::Ok(report) => Some(report),
            DeviceResult::Failed { .. } => None,
        })
        .flat_map(|report| {
            report
                .events
                .iter()
                .map(|event| EventRow::new(&report.device, event, color))
        })
        .collect();
    let summary: Vec<SummaryRow> = results.iter().map(|r| summary_row(r, color)).collect();

    let mut out = output::render_table(&events);
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&output::render_table(&summary));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SyncArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let template = config::resolve_template(global, &cfg)?;

    let options = SyncOptions {
        dry_run: args.dry_run,
        commit_comment: args
            .comment
            .unwrap_or_else(|| cfg.defaults.commit_comment.clone()),
    };
    let concurrency = args.concurrency.unwrap_or(cfg.defaults.concurrency).max(1);
    debug!(devices = args.devices.len(), concurrency, "starting sync");

    let outcomes: Vec<(String, Result<DeviceReport, CoreError>)> = stream::iter(&args.devices)
        .map(|host| {
            let template = &template;
            let options = &options;
            async move { (host.clone(), sync_one(template, host, options).await) }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let total = outcomes.len();
    let mut failures = Vec::new();
    let mut results = Vec::with_capacity(total);
    for (host, outcome) in outcomes {
        match outcome {
            Ok(report) => results.push(DeviceResult::Ok(report)),
            Err(err) => {
                error!(device = %host, "{err}");
                results.push(DeviceResult::Failed {
                    device: host,
                    error: err.to_string(),
                });
                failures.push(err);
            }
        }
    }

    let color = output::should_color(&global.color);
    let rendered = match global.output {
        OutputFormat::Table => render_table(&results, color),
        ref format => output::render_list(
            format,
            &results,
            |r| summary_row(r, color),
            plain_lines,
        ),
    };
    output::print_output(&rendered, global.quiet);

    debug!(
        devices = ?results.iter().map(DeviceResult::device).collect::<Vec<_>>(),
        failed = failures.len(),
        "sync finished"
    );

    if failures.is_empty() {
        return Ok(());
    }
    // A lone device keeps its specific exit code.
    if total == 1 {
        if let Some(err) = failures.pop() {
            return Err(CliError::from_core(err, &template.profile_name));
        }
    }
    Err(CliError::SyncFailed {
        failed: failures.len(),
        total,
    })
}

async fn sync_one(
    template: &DeviceTemplate,
    host: &str,
    options: &SyncOptions,
) -> Result<DeviceReport, CoreError> {
    let session = Session::open(&template.for_host(host))?;
    sync_device(&session, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldpdesc_core::{DescriptionChangeSet, RemoteIdentity};

    fn report(outcome: SyncOutcome) -> DeviceReport {
        let mut changes = DescriptionChangeSet::new();
        changes.insert("ge-0/0/1", "LLDP: r1 ge-0/0/10");
        DeviceReport {
            device: "sw1".into(),
            neighbors: 1,
            events: vec![ChangeEvent::up(
                "ge-0/0/1",
                None,
                RemoteIdentity::new("r1", "ge-0/0/10"),
            )],
            changes,
            outcome,
        }
    }

    #[test]
    fn plain_lists_events_then_outcome() {
        let out = plain_lines(&DeviceResult::Ok(report(SyncOutcome::DryRun)));
        assert_eq!(
            out,
            "sw1: ge-0/0/1 LLDP Up. Now: r1 ge-0/0/10\nsw1: dry run, not committed"
        );
    }

    #[test]
    fn failed_device_in_plain_output() {
        let out = plain_lines(&DeviceResult::Failed {
            device: "sw2".into(),
            error: "Cannot connect to sw2: refused".into(),
        });
        assert_eq!(out, "sw2: failed: Cannot connect to sw2: refused");
    }

    #[test]
    fn json_is_tagged_by_status() {
        let results = vec![
            DeviceResult::Ok(report(SyncOutcome::Committed)),
            DeviceResult::Failed {
                device: "sw2".into(),
                error: "boom".into(),
            },
        ];
        let value = serde_json::to_value(&results).unwrap_or_default();
        assert_eq!(value[0]["status"], "ok");
        assert_eq!(value[0]["outcome"], "committed");
        assert_eq!(value[0]["changes"]["ge-0/0/1"], "LLDP: r1 ge-0/0/10");
        assert_eq!(value[0]["events"][0]["kind"], "Up");
        assert_eq!(value[1]["status"], "failed");
        assert_eq!(value[1]["error"], "boom");
    }

    #[test]
    fn table_shows_events_and_summary() {
        let out = render_table(&[DeviceResult::Ok(report(SyncOutcome::Committed))], false);
        assert!(out.contains("ge-0/0/10"));
        assert!(out.contains("committed"));
        assert!(out.contains("Neighbors"));
    }
}
