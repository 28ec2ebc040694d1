//! Terminal progress for stream transfers.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tubefetch_core::download::ProgressReporter;

const BAR_TEMPLATE: &str =
    "{msg:>6} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes} ({bytes_per_sec})";

/// Draws one bar per transfer on stderr.
///
/// A bar is used when the size is known, a spinner otherwise. With
/// `hidden` set nothing is drawn.
#[derive(Debug)]
pub struct IndicatifProgress {
    hidden: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl IndicatifProgress {
    pub fn new(hidden: bool) -> Self {
        Self {
            hidden,
            current: Mutex::new(None),
        }
    }

    fn new_bar(&self, total: Option<u64>) -> ProgressBar {
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(BAR_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            }
        };
        let target = if self.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        bar.set_draw_target(target);
        bar
    }
}

impl ProgressReporter for IndicatifProgress {
    fn on_start(&self, label: &str, total: Option<u64>) {
        let bar = self.new_bar(total);
        bar.set_message(label.to_string());
        if let Ok(mut current) = self.current.lock()
            && let Some(previous) = current.replace(bar)
        {
            previous.finish_and_clear();
        }
    }

    fn on_progress(&self, downloaded: u64, _total: Option<u64>) {
        if let Ok(current) = self.current.lock()
            && let Some(bar) = current.as_ref()
        {
            bar.set_position(downloaded);
        }
    }

    fn on_finish(&self) {
        if let Ok(mut current) = self.current.lock()
            && let Some(bar) = current.take()
        {
            bar.finish_and_clear();
        }
    }
}
