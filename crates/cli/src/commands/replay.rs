use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Deserialize;
use tracing::info;

use querysync_core::filters::{DATE_FROM, DATE_TO, DatePreset};
use querysync_core::session::SyncReport;
use querysync_core::{Location, MemoryLocation, PageSession, QuerySync, TrackedKeys, TrackedState};

use crate::config::{AppConfig, PageConfig};
use crate::output;

#[derive(Args)]
pub struct ReplayArgs {
    /// Navigation script (TOML)
    script: PathBuf,

    /// Page to replay against, overriding the script's `page`
    #[arg(long)]
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Script {
    pub page: Option<String>,
    /// Initial href; defaults to the page path
    pub start: Option<String>,
    /// Reference date for presets; defaults to the local date
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    Set { key: String, value: String },
    Clear { key: String },
    Reset,
    Preset { name: String },
    Visit { href: String },
    Back,
    Forward,
}

impl Step {
    fn label(&self) -> String {
        match self {
            Step::Set { key, value } => format!("set {key}={value}"),
            Step::Clear { key } => format!("clear {key}"),
            Step::Reset => "reset".to_string(),
            Step::Preset { name } => format!("preset {name}"),
            Step::Visit { href } => format!("visit {href}"),
            Step::Back => "back".to_string(),
            Step::Forward => "forward".to_string(),
        }
    }
}

/// A page session driven by script steps.
pub struct Replay {
    session: PageSession<TrackedState>,
    keys: TrackedKeys,
    today: NaiveDate,
    external: Rc<Cell<usize>>,
}

impl Replay {
    pub fn new(page: &PageConfig, start: Option<&str>, today: NaiveDate) -> Self {
        let external = Rc::new(Cell::new(0));
        let counter = Rc::clone(&external);
        let sync = QuerySync::new(page.tracked_keys())
            .with_mode(page.mode())
            .on_external_change(move |next| {
                counter.set(counter.get() + 1);
                info!(filters = next.len(), "Filters changed from the URL");
            });
        let location = MemoryLocation::new(start.unwrap_or(&page.path));
        Self {
            session: PageSession::new(TrackedState::new(), location, sync),
            keys: page.tracked_keys(),
            today,
            external,
        }
    }

    pub fn mount(&mut self) -> SyncReport {
        self.session.mount()
    }

    /// Run one step. `None` when a history move had nowhere to go.
    pub fn step(&mut self, step: &Step) -> Result<Option<SyncReport>> {
        let report = match step {
            Step::Set { key, value } => Some(self.session.update(|s| s.set(key, value))),
            Step::Clear { key } => Some(self.session.update(|s| {
                s.remove(key);
            })),
            Step::Reset => {
                let keys = &self.keys;
                Some(self.session.update(|s| {
                    for key in keys.iter() {
                        s.remove(key);
                    }
                }))
            }
            Step::Preset { name } => {
                let range = name.parse::<DatePreset>()?.range(self.today);
                Some(self.session.update(|s| {
                    for (key, date) in [(DATE_FROM, range.start), (DATE_TO, range.end)] {
                        match date {
                            Some(d) => s.set(key, d.format("%Y-%m-%d").to_string()),
                            None => {
                                s.remove(key);
                            }
                        }
                    }
                }))
            }
            Step::Visit { href } => Some(self.session.visit(href)),
            Step::Back => self.session.back(),
            Step::Forward => self.session.forward(),
        };
        Ok(report)
    }

    pub fn state(&self) -> &TrackedState {
        self.session.state()
    }

    pub fn href(&self) -> String {
        self.session.location().href()
    }

    pub fn history_len(&self) -> usize {
        self.session.location().len()
    }

    pub fn external_changes(&self) -> usize {
        self.external.get()
    }
}

pub fn run(args: ReplayArgs, config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let content = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script: {}", args.script.display()))?;
    let script: Script = toml::from_str(&content).context("failed to parse replay script")?;

    let name = args
        .page
        .or_else(|| script.page.clone())
        .ok_or_else(|| anyhow::anyhow!("no page given (use --page or set `page` in the script)"))?;
    let page = config
        .find_page(&name)
        .ok_or_else(|| anyhow::anyhow!("unknown page: {name}"))?;
    let today = script
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut replay = Replay::new(page, script.start.as_deref(), today);
    info!(page = %page.name, steps = script.steps.len(), mode = %page.mode(), "Replaying script");

    println!(
        "{:<4} {:<28} {:<48} {:<40} EFFECTS",
        "STEP", "ACTION", "URL", "STATE"
    );
    println!("{}", "-".repeat(132));

    let report = replay.mount();
    print_row(0, "mount", &replay, Some(&report));
    for (i, step) in script.steps.iter().enumerate() {
        let report = replay.step(step)?;
        print_row(i + 1, &step.label(), &replay, report.as_ref());
    }

    println!();
    println!("Final URL:        {}", replay.href());
    println!("History entries:  {}", replay.history_len());
    println!("External changes: {}", replay.external_changes());
    Ok(())
}

fn print_row(index: usize, action: &str, replay: &Replay, report: Option<&SyncReport>) {
    let effects = match report {
        Some(report) => output::describe(report),
        None => "no history".to_string(),
    };
    println!(
        "{:<4} {:<28} {:<48} {:<40} {}",
        index,
        action,
        replay.href(),
        output::format_state(replay.state()),
        effects
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
        page = "distributions"
        today = "2024-08-15"

        [[steps]]
        action = "set"
        key = "deliveryStatus"
        value = "PENDING"

        [[steps]]
        action = "preset"
        name = "7d"

        [[steps]]
        action = "visit"
        href = "/retailer/distributions?shopId=4"

        [[steps]]
        action = "back"

        [[steps]]
        action = "reset"
    "#;

    fn distributions() -> PageConfig {
        AppConfig::default()
            .find_page("distributions")
            .cloned()
            .unwrap()
    }

    #[test]
    fn script_parses_tagged_steps() {
        let script: Script = toml::from_str(SCRIPT).unwrap();
        assert_eq!(script.page.as_deref(), Some("distributions"));
        assert_eq!(script.today, NaiveDate::from_ymd_opt(2024, 8, 15));
        assert_eq!(script.steps.len(), 5);
        assert!(matches!(script.steps[3], Step::Back));
    }

    #[test]
    fn replay_walks_history() {
        let script: Script = toml::from_str(SCRIPT).unwrap();
        let mut replay = Replay::new(&distributions(), None, script.today.unwrap());
        replay.mount();

        replay.step(&script.steps[0]).unwrap();
        replay.step(&script.steps[1]).unwrap();
        assert_eq!(
            replay.href(),
            "/retailer/distributions?deliveryStatus=PENDING&dateFrom=2024-08-09&dateTo=2024-08-15"
        );

        replay.step(&script.steps[2]).unwrap();
        assert_eq!(replay.state().get("shopId"), Some("4"));
        assert_eq!(replay.state().get("deliveryStatus"), Some("PENDING"));
        assert_eq!(
            replay.href(),
            "/retailer/distributions?shopId=4&deliveryStatus=PENDING&dateFrom=2024-08-09&dateTo=2024-08-15"
        );
        assert_eq!(replay.external_changes(), 1);

        // Going back merges the earlier URL into state; shopId stays.
        replay.step(&script.steps[3]).unwrap();
        assert_eq!(replay.state().get("deliveryStatus"), Some("PENDING"));
        assert_eq!(replay.state().get("shopId"), Some("4"));
        assert_eq!(replay.history_len(), 2);
        assert_eq!(replay.external_changes(), 2);

        replay.step(&script.steps[4]).unwrap();
        assert!(replay.state().is_empty());
        assert_eq!(replay.href(), "/retailer/distributions");
        assert_eq!(replay.external_changes(), 2);
    }

    #[test]
    fn forward_at_end_of_history_is_a_no_op() {
        let mut replay = Replay::new(&distributions(), None, NaiveDate::MIN);
        replay.mount();
        assert!(replay.step(&Step::Forward).unwrap().is_none());
    }

    #[test]
    fn preset_at_earliest_date_leaves_start_open() {
        let mut replay = Replay::new(&distributions(), None, NaiveDate::MIN);
        replay.mount();
        replay
            .step(&Step::Preset {
                name: "7d".into(),
            })
            .unwrap();
        assert_eq!(replay.state().get("dateFrom"), None);
        assert!(replay.state().get("dateTo").is_some());
    }

    #[test]
    fn unknown_preset_fails_the_step() {
        let mut replay = Replay::new(&distributions(), None, NaiveDate::MIN);
        let err = replay
            .step(&Step::Preset {
                name: "90d".into(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("unknown date preset"));
    }
}
