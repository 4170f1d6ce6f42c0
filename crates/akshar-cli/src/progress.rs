// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal progress display, driven over a channel from the pipeline.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Messages from the pipeline to the display thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// `done` of `total` pages have been recognised.
    Page { done: usize, total: usize },
}

/// A spinner/bar running on its own thread.
///
/// The display ends when every [`Sender`] is dropped; [`finish`](Self::finish)
/// drops the one it owns and waits for the thread.
pub struct ProgressDisplay {
    sender: Sender<ProgressEvent>,
    handle: JoinHandle<u64>,
}

impl ProgressDisplay {
    /// Start the display. A disabled display consumes events without drawing.
    pub fn spawn(enabled: bool, message: &str) -> Self {
        let (sender, receiver) = mpsc::channel();
        let message = message.to_string();
        let handle = thread::spawn(move || {
            let bar = if enabled {
                ProgressBar::new_spinner()
            } else {
                ProgressBar::hidden()
            };
            bar.set_message(message);
            bar.enable_steady_tick(Duration::from_millis(120));
            drive(&bar, receiver)
        });
        Self { sender, handle }
    }

    /// A sender for the pipeline's page callback.
    pub fn sender(&self) -> Sender<ProgressEvent> {
        self.sender.clone()
    }

    /// Signal completion and wait for the display to clear. Returns the last
    /// reported position.
    pub fn finish(self) -> u64 {
        drop(self.sender);
        self.handle.join().unwrap_or_default()
    }
}

/// Apply events until the channel closes, then clear the bar.
fn drive(bar: &ProgressBar, events: Receiver<ProgressEvent>) -> u64 {
    let mut styled = false;
    for event in events {
        match event {
            ProgressEvent::Page { done, total } => {
                if !styled {
                    if let Ok(style) =
                        ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len} pages")
                    {
                        bar.set_style(style.progress_chars("#>-"));
                    }
                    styled = true;
                }
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            }
        }
    }
    let position = bar.position();
    bar.finish_and_clear();
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishes_when_sender_dropped() {
        let display = ProgressDisplay::spawn(false, "Recognising");
        let tx = display.sender();
        for done in 1..=3 {
            tx.send(ProgressEvent::Page { done, total: 3 }).unwrap();
        }
        drop(tx);
        assert_eq!(display.finish(), 3);
    }

    #[test]
    fn finish_without_events() {
        let display = ProgressDisplay::spawn(false, "Recognising");
        assert_eq!(display.finish(), 0);
    }
}
