use std::fmt::Write;

use ansi_term::Colour;

const BAR: &str = "█";

/// Scales values so the largest one spans `width` cells. Any non-zero value gets at least one
/// cell, so a single key press stays visible next to thousands.
pub fn bar_lengths(values: &[u64], width: usize) -> Vec<usize> {
    let max = values.iter().copied().max().unwrap_or(0);
    values
        .iter()
        .map(|&value| {
            if value == 0 || max == 0 {
                0
            } else {
                ((value as u128 * width as u128 / max as u128) as usize).max(1)
            }
        })
        .collect()
}

/// Horizontal bar chart with one row per label.
pub fn render_bar_chart<L: AsRef<str>>(
    title: &str,
    labels: &[L],
    values: &[u64],
    width: usize,
    colour: Colour,
) -> String {
    let label_width = labels.iter().map(|l| l.as_ref().chars().count()).max().unwrap_or(0);
    let mut text = format!("{}\n", Colour::White.bold().paint(title));

    for ((label, value), length) in labels.iter().zip(values).zip(bar_lengths(values, width)) {
        let _ = writeln!(
            text,
            "{:>label_width$} {} {value}",
            label.as_ref(),
            colour.paint(BAR.repeat(length)),
        );
    }
    text
}
