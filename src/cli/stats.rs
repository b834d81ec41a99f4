use std::path::Path;

use anyhow::Result;
use ansi_term::Colour;
use chrono::Local;

use crate::{
    daemon::{
        counter::{state::ActivityState, ActivityCounter},
        storage::snapshot_storage::{FileSnapshotStore, SnapshotStore},
    },
    utils::time::minute_slot,
};

use super::output::{charts::render_bar_chart, label::format_count};

const BAR_WIDTH: usize = 40;

/// Prints today's counters as stored by the daemon.
pub async fn print_stats(counts_dir: &Path) -> Result<()> {
    let now = Local::now();
    let today = now.date_naive();
    let state = ActivityState::restore(FileSnapshotStore::new(counts_dir).load(today).await, today);
    let counter = ActivityCounter::resume(state, now);

    println!("{}", render_stats(counter.state(), minute_slot(&now)));
    Ok(())
}

fn render_stats(state: &ActivityState, current_slot: usize) -> String {
    let minute_labels = (0..state.minutes_chart(current_slot).len())
        .rev()
        .map(|back| if back == 0 { "now".to_owned() } else { format!("-{back}m") })
        .collect::<Vec<_>>();
    let hour_labels = (0..24).map(|h| format!("{h:02}h")).collect::<Vec<_>>();
    let alphabet_labels = ('a'..='z').map(String::from).collect::<Vec<_>>();
    let symbol_labels = ('!'..='9').map(String::from).collect::<Vec<_>>();

    [
        format_count(state.total()),
        render_bar_chart(
            "Last minutes",
            &minute_labels,
            &state.minutes_chart(current_slot),
            BAR_WIDTH,
            Colour::Green,
        ),
        render_bar_chart("Hours", &hour_labels, &state.hours_chart(), BAR_WIDTH, Colour::Blue),
        render_bar_chart(
            "Letters",
            &alphabet_labels,
            &state.alphabet_chart(),
            BAR_WIDTH,
            Colour::Cyan,
        ),
        render_bar_chart(
            "Symbols",
            &symbol_labels,
            &state.symbols_chart(),
            BAR_WIDTH,
            Colour::Purple,
        ),
    ]
    .join("\n")
}
