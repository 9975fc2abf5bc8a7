use std::io::BufRead;
use std::thread;

use crate::stop::{StopReason, StopSignal};

/// `q`, `Q` or Ctrl+Q.
fn is_quit_key(line: &str) -> bool {
    matches!(line.trim(), "q" | "Q" | "\u{11}")
}

/// Reads console lines until a quit key, end of input, or an external stop.
pub fn watch_lines<R: BufRead>(reader: R, stop: &StopSignal) {
    for line in reader.lines() {
        if stop.is_stopped() {
            return;
        }
        match line {
            Ok(line) if is_quit_key(&line) => {
                log::info!("Hotkey quit received. Shutting down...");
                stop.stop(StopReason::Hotkey);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                log::debug!("Console input unavailable: {}", e);
                return;
            }
        }
    }
}

/// Watches stdin on a detached thread. Blocking console reads cannot be
/// cancelled, so the thread is never joined; it only ever sets `stop`.
pub fn spawn(stop: StopSignal) {
    let spawned = thread::Builder::new()
        .name("hotkey".to_string())
        .spawn(move || watch_lines(std::io::stdin().lock(), &stop));
    if let Err(e) = spawned {
        log::warn!("Hotkey watcher unavailable: {}", e);
    }
}
