//! Terminal progress for catalog downloads.

use bangumi_fetch::FetchProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// An indicatif bar driven by download percentages.
pub(crate) struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    /// When `quiet` is true the bar is never drawn.
    pub(crate) fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new(100);
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template("  {spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
            .tick_chars("/-\\|");
        pb.set_style(style);
        pb.set_message("Downloading collection...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub(crate) fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl FetchProgress for BarProgress {
    fn on_progress(&self, percent: u8) {
        // Percentages can dip when the estimate was high; never move backwards.
        if u64::from(percent) > self.pb.position() {
            self.pb.set_position(u64::from(percent));
        }
    }
}
