use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Per-file progress on stderr, shared by the reading workers.
///
/// Hidden entirely when the session is not interactive.
pub struct FileProgress {
    bar: Option<ProgressBar>,
    start: Instant,
}

impl FileProgress {
    pub fn new(interactive: bool, total: usize) -> Self {
        let bar = interactive.then(|| {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::with_template("  {spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏").progress_chars("=> "));
            }
            bar.set_message("Reading geometry files");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self {
            bar,
            start: Instant::now(),
        }
    }

    /// Marks one file as read; callable from any worker thread.
    pub fn inc(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Clears the bar and prints a one-line summary with the elapsed time.
    pub fn finish(self, summary: &str) {
        let Some(bar) = self.bar else {
            return;
        };
        bar.finish_and_clear();

        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.2}s",
            summary,
            self.start.elapsed().as_secs_f64()
        );
    }
}
