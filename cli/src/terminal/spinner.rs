use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_FRAMES: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Spinner shown while the discovery window is open. The caller clears
/// it before printing results.
pub fn start(msg: &str) -> ProgressBar {
    let pb: ProgressBar = ProgressBar::new_spinner();
    let style: ProgressStyle = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .expect("static spinner template")
        .tick_strings(TICK_FRAMES);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(msg.to_string());
    pb
}
