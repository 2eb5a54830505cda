use console::style;

use querysync_core::TrackedState;
use querysync_core::session::SyncReport;
use querysync_core::sync::{Inbound, Outbound};

pub fn format_state(state: &TrackedState) -> String {
    if state.is_empty() {
        return style("{}").dim().to_string();
    }
    let pairs: Vec<String> = state.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

/// One-word summary of a session step, colored by what moved.
pub fn describe(report: &SyncReport) -> String {
    let mut parts = Vec::new();
    match &report.inbound {
        Some(Inbound::Applied(_)) => parts.push(style("url→state").green().to_string()),
        Some(Inbound::Reset) => parts.push(style("reset").yellow().to_string()),
        Some(Inbound::SelfPushed) => parts.push(style("self-pushed").dim().to_string()),
        Some(Inbound::Unchanged) | None => {}
    }
    if let Outbound::Navigated { mode, .. } = &report.outbound {
        parts.push(style(format!("state→url ({mode})")).cyan().to_string());
    }
    if let Some(Inbound::Applied(_)) = &report.echo {
        parts.push(style("echo applied").red().to_string());
    }
    if parts.is_empty() {
        style("-").dim().to_string()
    } else {
        parts.join(" ")
    }
}
