//! Report rendering and terminal utilities

use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crate::stage::{stage_progress, StageProgress, STAGES};
use crate::poller::TrackingSnapshot;
use crate::{TrackerError, TrackingView};

const WIDTH: usize = 72;

/// Clear terminal screen
pub fn clear_terminal() -> Result<(), TrackerError> {
    // ANSI escape sequence to clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush()?;
    Ok(())
}

fn marker(progress: StageProgress) -> &'static str {
    match progress {
        StageProgress::Completed => "✅",
        StageProgress::Current => "🚚",
        StageProgress::Upcoming => "⚪",
    }
}

/// Render the delivery stepper and details for one view
pub fn render_report(delivery_id: &str, view: &TrackingView) -> Result<String, fmt::Error> {
    let updated: DateTime<Local> = view.fetched_at.with_timezone(&Local);
    let mut out = String::new();

    writeln!(out, "{}", "=".repeat(WIDTH))?;
    writeln!(out, "DELIVERY {delivery_id} @ {}", updated.format("%H:%M:%S"))?;
    writeln!(out, "{}", "=".repeat(WIDTH))?;

    for (index, stage) in STAGES.iter().enumerate() {
        let progress = stage_progress(view.stage_ordinal, index);
        writeln!(out, "{} {}", marker(progress), stage.label)?;
        if progress == StageProgress::Current {
            writeln!(out, "   {}", stage.description)?;
        }
    }

    writeln!(out, "{}", "-".repeat(WIDTH))?;
    writeln!(out, "⏱️  ETA: {}", view.eta_text)?;

    match (view.record.status(), view.record.status.as_deref()) {
        (Some(status), _) => writeln!(out, "📦 Status: {status}")?,
        (None, Some(raw)) => writeln!(out, "📦 Status: {raw} (unrecognized)")?,
        (None, None) => writeln!(out, "📦 Status: unknown")?,
    }

    let address = if view.record.delivery_address.is_empty() {
        "N/A"
    } else {
        view.record.delivery_address.as_str()
    };
    writeln!(out, "📍 Address: {address}")?;

    match view.driver_name() {
        Some(name) => writeln!(out, "🧑 Driver: {name}")?,
        None => writeln!(out, "🧑 Driver: not assigned yet")?,
    }
    write!(out, "{}", "=".repeat(WIDTH))?;
    Ok(out)
}

/// Render whatever the poller currently knows: the stepper when a view is
/// held, and the last fetch error when there is one.
pub fn render_snapshot(delivery_id: &str, snapshot: &TrackingSnapshot) -> Result<String, fmt::Error> {
    let mut out = match &snapshot.view {
        Some(view) => render_report(delivery_id, view)?,
        None => {
            let mut header = String::new();
            writeln!(header, "{}", "=".repeat(WIDTH))?;
            writeln!(header, "DELIVERY {delivery_id}")?;
            write!(header, "{}", "=".repeat(WIDTH))?;
            header
        }
    };

    match (&snapshot.view, &snapshot.last_error) {
        (_, Some(error)) => write!(out, "\n❌ Last refresh failed: {error}")?,
        (None, None) => write!(out, "\n⏳ Waiting for delivery data...")?,
        (Some(_), None) => {}
    }
    Ok(out)
}

/// Clear the terminal and print the current snapshot
pub fn print_tracking_report(delivery_id: &str, snapshot: &TrackingSnapshot) -> Result<(), TrackerError> {
    let report = render_snapshot(delivery_id, snapshot)?;
    clear_terminal()?;
    println!("{report}");
    Ok(())
}
