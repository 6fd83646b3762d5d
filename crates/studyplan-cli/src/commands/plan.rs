//! Daily plan command.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use clap::Args;

use studyplan_core::error::Result;
use studyplan_core::scheduler::DEFAULT_PREVIEW_DAYS;
use studyplan_core::validation::validate_inputs;
use studyplan_core::{
    busy_or_empty, generate_plan, today_bounds, weekly_preview, Assignment, BusyInterval, Config,
    CoreError, DayPreview, GoogleCalendarSource, PlanSlot, PlanSummary, SlotKind, WorkloadStats,
};

#[derive(Args)]
pub struct PlanArgs {
    /// JSON file with an array of assignments
    #[arg(long)]
    tasks: PathBuf,
    /// JSON file with an array of busy intervals
    #[arg(long)]
    busy: Option<PathBuf>,
    /// Override the preferred start hour (0-23)
    #[arg(long)]
    start_hour: Option<u32>,
    /// Override the study budget in minutes
    #[arg(long)]
    minutes: Option<u32>,
    /// Also pull busy time from Google Calendar
    #[arg(long)]
    calendar: bool,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Plan as if it were this instant (RFC 3339)
    #[arg(long)]
    now: Option<String>,
}

pub fn run(args: PlanArgs) -> Result<()> {
    let config = Config::load_or_default();

    let mut request = config.plan_request();
    if let Some(hour) = args.start_hour {
        request.start_hour = hour;
    }
    if let Some(minutes) = args.minutes {
        request.minutes_available = minutes;
    }

    let now: DateTime<FixedOffset> = match &args.now {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Custom(format!("invalid --now '{s}': {e}")))?,
        None => Local::now().into(),
    };

    let items: Vec<Assignment> = read_json(&args.tasks)?;
    let mut busy: Vec<BusyInterval> = match &args.busy {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    // Only user-supplied input is checked; calendar data is sanitized by
    // `busy_or_empty` and must never fail the command.
    if let Err(errors) = validate_inputs(&items, &busy, &request) {
        let mut errors = errors.into_iter();
        if let Some(first) = errors.next() {
            for e in errors {
                eprintln!("invalid input: {e}");
            }
            return Err(first.into());
        }
    }

    if args.calendar || config.calendar.enabled {
        busy.extend(fetch_calendar_busy(&config, &now)?);
    }

    let plan = generate_plan(&items, &busy, &request, &now);
    let summary = PlanSummary::from_slots(&plan);
    let workload = WorkloadStats::from_assignments(&items);
    let preview = weekly_preview(&items, &busy, &now, DEFAULT_PREVIEW_DAYS);
    tracing::info!(slots = plan.len(), work_minutes = summary.work_minutes, "plan ready");

    if args.json {
        let out = serde_json::json!({
            "slots": plan,
            "summary": summary,
            "workload": workload,
            "preview": preview,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_table(&plan, &summary, &now.timezone()));
        print!("{}", render_outlook(&workload, &preview));
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Custom(format!("cannot read {}: {e}", path.display())))?;
    Ok(serde_json::from_str(&content)?)
}

fn fetch_calendar_busy(config: &Config, now: &DateTime<FixedOffset>) -> Result<Vec<BusyInterval>> {
    let Some((day_start, day_end)) = today_bounds(now) else {
        tracing::warn!("cannot resolve today's bounds; skipping calendar");
        return Ok(Vec::new());
    };

    let source = GoogleCalendarSource::from_env().with_api_base(config.calendar.api_base.clone());
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(busy_or_empty(&source, day_start, day_end)))
}

fn render_table<Tz: TimeZone>(plan: &[PlanSlot], summary: &PlanSummary, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if plan.is_empty() {
        return "nothing to plan today\n".to_string();
    }

    let mut out = String::new();
    for slot in plan {
        let (label, what) = match &slot.kind {
            SlotKind::Work { assignment } => {
                let title = match &assignment.subject_name {
                    Some(subject) => format!("{} ({subject})", assignment.title),
                    None => assignment.title.clone(),
                };
                ("WORK", title)
            }
            SlotKind::Break => ("REST", String::new()),
            SlotKind::Busy => ("BUSY", String::new()),
        };
        let line = format!(
            "{}  {:>4} min  {label}  {what}",
            slot.start_label(tz),
            slot.duration_minutes
        );
        let _ = writeln!(out, "{}  [{}]", line.trim_end(), slot.reason);
    }
    let _ = writeln!(
        out,
        "today: {:.1}h of study in {} block(s)",
        summary.work_hours, summary.work_slots
    );
    out
}

fn render_outlook(workload: &WorkloadStats, preview: &[DayPreview]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "pending: {}  urgent: {}", workload.pending, workload.urgent);
    for day in preview {
        let focus = match &day.focus {
            Some(a) => a.title.as_str(),
            None => "-",
        };
        let _ = writeln!(
            out,
            "{:<5} {:<6}  {} event(s)  {} due  focus: {focus}",
            day.label, day.date_label, day.events_count, day.due_count
        );
    }
    out
}
