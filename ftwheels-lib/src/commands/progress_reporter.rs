use crate::wheels::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;

type ProgressCallback = Box<dyn Fn() -> (u64, u64, String) + Send + Sync>;

/// Refresh rate for progress updates (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len} {msg}";

/// A progress bar that stays hidden until a delay has passed.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    visible_after: Instant,
    visible: Arc<AtomicBool>,
    callback: Arc<Mutex<ProgressCallback>>,
    refresh_task: Arc<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// Short runs finish before `delay` and never draw anything. When `use_colors` is false
    /// the bar is rendered without ANSI styling. Must be called within a Tokio runtime.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template(if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR })
                .expect("could not create progress bar style")
                .progress_chars("=> "),
        );

        let visible_after = Instant::now() + delay;
        let visible = Arc::new(AtomicBool::new(false));
        let callback = Arc::new(Mutex::new(Box::new(|| (0u64, 0u64, String::new())) as ProgressCallback));

        Self {
            refresh_task: Arc::new(tokio::spawn(refresh_task(
                bar.clone(),
                visible_after,
                Arc::clone(&visible),
                Arc::clone(&callback),
            ))),
            bar,
            visible_after,
            visible,
            callback,
        }
    }

    /// Whether the bar has been drawn at least once.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Relaxed)
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    fn set_determinate(&self, callback: Box<dyn Fn() -> (u64, u64, String) + Send + Sync + 'static>) {
        *self.callback.lock().expect("lock poisoned") = callback;
        self.bar.set_length(0);
        self.bar.set_position(0);
    }

    fn done(&self) {
        self.refresh_task.abort();
        if self.is_visible() {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .field("callback", &"<callback>")
            .field("refresh_task", &"<task>")
            .finish()
    }
}

/// Background refresh task that periodically updates the progress bar.
async fn refresh_task(bar: ProgressBar, visible_after: Instant, visible: Arc<AtomicBool>, callback: Arc<Mutex<ProgressCallback>>) {
    let mut interval = tokio::time::interval(Duration::from_millis(REFRESH_INTERVAL_MS));
    #[expect(clippy::infinite_loop, reason = "task runs until aborted")]
    loop {
        _ = interval.tick().await;

        if !visible.load(Ordering::Relaxed) {
            if Instant::now() < visible_after {
                continue;
            }
            visible.store(true, Ordering::Relaxed);
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }

        let (length, position, message) = {
            let callback_guard = callback.lock().expect("lock poisoned");
            callback_guard()
        };

        if length > 0 {
            bar.set_length(length);
            bar.set_position(position);
        }
        bar.set_message(message);
    }
}
