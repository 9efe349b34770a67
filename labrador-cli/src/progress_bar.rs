use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use labrador::progress::ProgressNotifier;

#[derive(Debug)]
struct ProgressBarState {
    length: u64,
    initialized: bool,
}

/// Spinner shown while loading input, turned into a bar once a computation
/// reports its number of iterations.
#[derive(Debug, Clone)]
pub(crate) struct LabradorProgressBar {
    bar: ProgressBar,
    state: Arc<Mutex<ProgressBarState>>,
}

impl LabradorProgressBar {
    pub fn new() -> LabradorProgressBar {
        let init_bar = ProgressBar::hidden();
        init_bar.set_style(ProgressStyle::default_spinner());
        init_bar.enable_steady_tick(Duration::from_millis(50));
        init_bar.set_message("Loading contacts...");

        Self {
            bar: init_bar,
            state: Arc::new(Mutex::new(ProgressBarState {
                length: 0,
                initialized: false,
            })),
        }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear()
    }

    pub fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    #[inline]
    fn init(&self) {
        let mut state = self.state.lock().unwrap();
        if state.initialized {
            return;
        }

        self.bar.set_position(0);
        if state.length == 0 {
            self.bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {pos}/? ({per_sec}) {msg}")
                    .expect("Invalid progress bar template"),
            );
        } else {
            self.bar.set_length(state.length);
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} {wide_bar} {pos}/{len} [ETA {eta}]")
                    .expect("Invalid progress bar template"),
            );
        }
        state.initialized = true;
    }

    pub fn set_length(&self, length: u64) {
        let mut state = self.state.lock().unwrap();

        state.initialized = false;
        state.length = length;
    }

    pub fn inc(&self, value: u64) {
        self.init();
        self.bar.inc(value);
    }

    pub fn println<I: AsRef<str>>(&self, msg: I) {
        self.bar.println(msg);
    }
}

impl ProgressNotifier for LabradorProgressBar {
    fn set_iter_num(&self, num_iter: u64) {
        self.set_length(num_iter);
    }

    fn inc_iter(&self) {
        self.inc(1);
    }
}
