use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use paeconst::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SPINNER_TICK: Duration = Duration::from_millis(80);

struct PhaseDisplay {
    bar: ProgressBar,
    current: Option<(&'static str, Instant)>,
}

impl PhaseDisplay {
    fn handle(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => {
                self.current = Some((name, Instant::now()));
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar.set_message(name);
                self.bar.enable_steady_tick(SPINNER_TICK);
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                match self.current.take() {
                    Some((name, started)) => {
                        let elapsed = started.elapsed();
                        debug!("Phase '{}' finished in {:.2?}", name, elapsed);
                        self.bar
                            .finish_with_message(format!("✓ {} ({:.2?})", name, elapsed));
                    }
                    None => self.bar.finish_with_message("✓ Done"),
                }
            }
            Progress::TaskStart { total_steps } => {
                self.bar.disable_steady_tick();
                self.bar.set_length(total_steps);
                self.bar.set_position(0);
                self.bar.set_style(bar_style());
            }
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => {
                if let Some(length) = self.bar.length() {
                    self.bar.set_position(length);
                }
            }
            Progress::Message(msg) => self.bar.println(format!("  {}", msg)),
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} clusters")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// Renders engine progress events on stderr: a spinner per phase, a bar while
/// clusters are classified, and the phase's wall time once it finishes.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<PhaseDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Tracks state without drawing anything.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            display: Arc::new(Mutex::new(PhaseDisplay { bar, current: None })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = Arc::clone(&self.display);
        Box::new(move |event: Progress| match display.lock() {
            Ok(mut display) => display.handle(event),
            Err(_) => warn!("Progress display mutex was poisoned; dropping event."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = CliProgressHandler::hidden();
        let display = handler.display.lock().unwrap();
        assert_eq!(display.bar.length(), Some(0));
        assert!(display.bar.is_finished());
        assert!(display.current.is_none());
    }

    #[test]
    fn classification_phase_drives_the_bar() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Classifying Regions",
        });
        {
            let display = handler.display.lock().unwrap();
            assert_eq!(display.bar.message(), "Classifying Regions");
            assert!(!display.bar.is_finished());
            assert_eq!(display.current.map(|(name, _)| name), Some("Classifying Regions"));
        }

        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskIncrement);
        {
            let display = handler.display.lock().unwrap();
            assert_eq!(display.bar.length(), Some(4));
            assert_eq!(display.bar.position(), 1);
        }

        callback(Progress::TaskFinish);
        assert_eq!(handler.display.lock().unwrap().bar.position(), 4);

        callback(Progress::PhaseFinish);
        let display = handler.display.lock().unwrap();
        assert!(display.bar.is_finished());
        assert!(display.bar.message().starts_with("✓ Classifying Regions ("));
        assert!(display.current.is_none());
    }

    #[test]
    fn finish_without_start_still_completes() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();
        callback(Progress::PhaseStart { name: "Clustering" });
        callback(Progress::PhaseFinish);
        callback(Progress::PhaseFinish);
        assert_eq!(handler.display.lock().unwrap().bar.message(), "✓ Done");
    }

    #[test]
    fn callback_can_be_sent_to_another_thread() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Resolving Gaps",
            });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let display = handler.display.lock().unwrap();
        assert!(display.bar.is_finished());
        assert!(display.bar.message().starts_with("✓ Resolving Gaps"));
    }
}
