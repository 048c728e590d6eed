//! Debounced free-text search.
//!
//! [`Debounce`] is the pure state machine: it holds the latest input and its
//! deadline, and emits only once the deadline passes with a value different
//! from the last one emitted. [`SearchTrigger`] drives it from a tokio task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Quiet period used when none is configured.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debounce {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: Option<String>,
}

impl Debounce {
    pub fn new(quiet: Duration) -> Self {
        Debounce {
            quiet,
            pending: None,
            last_emitted: None,
        }
    }

    /// Record an input at `now`, restarting the quiet period.
    pub fn push(&mut self, value: String, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Emit the pending value if its quiet period is over at `now` and it
    /// differs from the previous emission.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match self.pending.take() {
            Some((value, at)) if at <= now => {
                if self.last_emitted.as_deref() == Some(value.as_str()) {
                    return None;
                }
                self.last_emitted = Some(value.clone());
                Some(value)
            }
            other => {
                self.pending = other;
                None
            }
        }
    }
}

/// Background task turning keystroke-level input into debounced search terms.
///
/// Dropping the trigger aborts the task; nothing is emitted afterwards.
pub struct SearchTrigger {
    input: mpsc::UnboundedSender<String>,
    output: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<()>,
}

impl SearchTrigger {
    pub fn spawn(quiet: Duration) -> Self {
        let (input, mut input_rx) = mpsc::unbounded_channel::<String>();
        let (output_tx, output) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut debounce = Debounce::new(quiet);
            loop {
                let deadline = debounce.deadline();
                tokio::select! {
                    value = input_rx.recv() => match value {
                        Some(value) => debounce.push(value, Instant::now()),
                        None => break,
                    },
                    _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                        if let Some(term) = debounce.fire(Instant::now()) {
                            debug!(term = %term, "search term settled");
                            if output_tx.send(term).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        SearchTrigger {
            input,
            output,
            task,
        }
    }

    /// Feed the current contents of the search box.
    pub fn push(&self, value: impl Into<String>) {
        // The task only stops when this trigger is dropped.
        let _ = self.input.send(value.into());
    }

    /// Wait for the next settled search term.
    pub async fn next(&mut self) -> Option<String> {
        self.output.recv().await
    }
}

impl Drop for SearchTrigger {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine_emits_once_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(300));
        let mut emitted = Vec::new();

        // "abc" typed over 250 ms, then a 350 ms pause.
        for (offset, value) in [(0, "a"), (125, "ab"), (250, "abc")] {
            let now = start + Duration::from_millis(offset);
            emitted.extend(d.fire(now));
            d.push(value.to_string(), now);
        }
        for step in (260..=600).step_by(10) {
            emitted.extend(d.fire(start + Duration::from_millis(step)));
        }

        assert_eq!(emitted, vec!["abc".to_string()]);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn test_state_machine_suppresses_repeat_value() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(300));
        d.push("x".into(), start);
        assert_eq!(d.fire(start + Duration::from_millis(300)), Some("x".into()));

        d.push("xy".into(), start + Duration::from_millis(400));
        d.push("x".into(), start + Duration::from_millis(450));
        assert_eq!(d.fire(start + Duration::from_millis(800)), None);
    }

    #[test]
    fn test_fire_before_deadline_keeps_pending() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(300));
        d.push("a".into(), start);
        assert_eq!(d.fire(start + Duration::from_millis(299)), None);
        assert!(d.deadline().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_emits_settled_term() {
        let mut trigger = SearchTrigger::spawn(Duration::from_millis(300));

        trigger.push("a");
        tokio::time::sleep(Duration::from_millis(125)).await;
        trigger.push("ab");
        tokio::time::sleep(Duration::from_millis(125)).await;
        trigger.push("abc");

        let first = tokio::time::timeout(Duration::from_millis(350), trigger.next())
            .await
            .expect("term should settle");
        assert_eq!(first.as_deref(), Some("abc"));

        let second = tokio::time::timeout(Duration::from_secs(2), trigger.next()).await;
        assert!(second.is_err(), "no further emission expected");
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_skips_unchanged_term() {
        let mut trigger = SearchTrigger::spawn(Duration::from_millis(300));

        trigger.push("gps");
        assert_eq!(trigger.next().await.as_deref(), Some("gps"));

        trigger.push("gpx");
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.push("gps");
        let again = tokio::time::timeout(Duration::from_secs(1), trigger.next()).await;
        assert!(again.is_err());
    }
}
