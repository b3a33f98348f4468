use indicatif::{ProgressDrawTarget, ProgressStyle};
use std::sync::mpsc::Sender;

const BAR_TEMPLATE: &str = "[{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} ({eta})";

pub trait ProgressCallback {
    fn on_start(&mut self, total: Option<usize>);
    fn on_advance(&mut self, current: usize, total: Option<usize>);
    fn on_finish(&mut self, current: usize, total: Option<usize>);
}

/// Terminal bar backed by `indicatif`; a spinner when the total is unknown
#[derive(Default)]
pub struct ConsoleProgressCallback {
    bar: Option<indicatif::ProgressBar>,
    hidden: bool,
}

impl ConsoleProgressCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track progress without drawing anything
    pub fn hidden() -> Self {
        Self {
            bar: None,
            hidden: true,
        }
    }

    /// The bar currently running, if any
    pub fn bar(&self) -> Option<&indicatif::ProgressBar> {
        self.bar.as_ref()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_start(&mut self, total: Option<usize>) {
        let bar = match total {
            Some(total) => {
                let bar = indicatif::ProgressBar::new(total as u64);
                bar.set_style(bar_style());
                bar
            }
            None => indicatif::ProgressBar::new_spinner(),
        };
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        self.bar = Some(bar);
    }

    fn on_advance(&mut self, current: usize, _total: Option<usize>) {
        if let Some(bar) = &self.bar {
            bar.set_position(current as u64);
        }
    }

    fn on_finish(&mut self, current: usize, _total: Option<usize>) {
        if let Some(bar) = self.bar.take() {
            bar.set_position(current as u64);
            bar.finish();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressMessage {
    Started { total: Option<usize> },
    Advanced { current: usize, total: Option<usize> },
    Finished { current: usize, total: Option<usize> },
}

// For reporting to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_start(&mut self, total: Option<usize>) {
        let _ = self.sender.send(ProgressMessage::Started { total });
    }

    fn on_advance(&mut self, current: usize, total: Option<usize>) {
        let _ = self.sender.send(ProgressMessage::Advanced { current, total });
    }

    fn on_finish(&mut self, current: usize, total: Option<usize>) {
        let _ = self.sender.send(ProgressMessage::Finished { current, total });
    }
}

/// Counter that advances once per call and starts a fresh bar after
/// `n_trials` steps.
pub struct ProgressBar<C: ProgressCallback> {
    n_trials: Option<usize>,
    position: Option<usize>,
    callback: C,
}

impl<C: ProgressCallback> ProgressBar<C> {
    pub fn new(n_trials: Option<usize>, callback: C) -> Self {
        Self {
            n_trials,
            position: None,
            callback,
        }
    }

    pub fn n_trials(&self) -> Option<usize> {
        self.n_trials
    }

    pub fn set_n_trials(&mut self, n_trials: Option<usize>) {
        self.n_trials = n_trials;
    }

    /// Steps taken on the current bar, `None` before the first step
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }

    pub fn process(&mut self) {
        let current = match (self.position, self.n_trials) {
            (None, _) => {
                self.callback.on_start(self.n_trials);
                0
            }
            (Some(current), Some(total)) if current >= total => {
                self.callback.on_finish(current, self.n_trials);
                self.callback.on_start(self.n_trials);
                0
            }
            (Some(current), _) => current,
        };

        let next = current + 1;
        self.position = Some(next);
        self.callback.on_advance(next, self.n_trials);
    }

    /// Wrap `func` so every call advances the bar first. A missing or zero
    /// `n_trials` leaves the bar untouched.
    pub fn decorate<'a, A, R, F>(&'a mut self, mut func: F) -> impl FnMut(A) -> R + 'a
    where
        A: 'a,
        R: 'a,
        F: FnMut(A) -> R + 'a,
    {
        move |args| {
            if matches!(self.n_trials, Some(n) if n > 0) {
                self.process();
            }
            func(args)
        }
    }

    /// Close the current bar, if one is running
    pub fn finish(&mut self) {
        if let Some(current) = self.position.take() {
            self.callback.on_finish(current, self.n_trials);
        }
    }
}
