use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use psync_sync::{SubmitPhase, SubmitProgress};

use crate::ui;

/// Terminal feedback for a batch submission.
///
/// Follows [`SubmitProgress`] events: the bar is re-labelled when the
/// submitter falls back from bulk to individual submission.
pub struct SubmitBar {
    bar: Option<ProgressBar>,
    phase: Option<SubmitPhase>,
}

fn phase_message(phase: SubmitPhase) -> &'static str {
    match phase {
        SubmitPhase::Bulk => "bulk submission",
        SubmitPhase::Individual => "submitting one by one",
    }
}

impl SubmitBar {
    #[must_use]
    pub fn new(total: usize) -> Self {
        if !ui::prefs().progress || total == 0 {
            return Self {
                bar: None,
                phase: None,
            };
        }

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {wide_bar:.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message(phase_message(SubmitPhase::Bulk));
        Self {
            bar: Some(bar),
            phase: None,
        }
    }

    pub fn update(&mut self, event: SubmitProgress) {
        let Some(bar) = &self.bar else {
            return;
        };
        if self.phase != Some(event.phase) {
            self.phase = Some(event.phase);
            bar.set_message(phase_message(event.phase));
            bar.set_length(event.total as u64);
        }
        bar.set_position(event.completed as u64);
    }

    pub fn finish(&self, summary: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(summary.to_string());
        }
    }
}

/// Spinner for single remote lookups.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    #[must_use]
    pub fn start(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
