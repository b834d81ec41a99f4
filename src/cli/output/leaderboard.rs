use std::fmt::Write;

use crate::daemon::reporting::Leaderboard;

/// Renders one line per player in rank order. The leader gets a party popper.
pub fn render_leaderboard(leaderboard: &Leaderboard) -> String {
    let mut text = String::new();
    for (rank, player) in leaderboard.ranked() {
        let _ = write!(text, "    @{}\t{}", player.username, player.score);
        if rank == 1 {
            text.push_str("   🎉");
        }
        text.push('\n');
    }
    text
}
