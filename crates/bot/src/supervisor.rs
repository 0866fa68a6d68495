//! Restarting supervisor around the notification cycle.
//!
//! A cycle runs the dispatcher until the first surfaced failure. The failure
//! is logged, reported to the maintainer, and a new cycle starts with the same
//! poller, so the cursor carries over and delivered attempts are not resent.

use std::time::Duration;

use dvmn_common::config::DEFAULT_REPORTER_SOURCE;
use dvmn_common::error::DispatchError;
use dvmn_common::types::{Cursor, Severity};
use dvmn_engine::Dispatcher;
use dvmn_notifier::{DiagnosticSink, MessageSender};
use dvmn_poller::{AttemptFeed, AttemptPoller};

pub struct Supervisor<F, S, D> {
    poller: AttemptPoller<F>,
    dispatcher: Dispatcher<S>,
    sink: D,
    source: String,
    restart_delay: Duration,
    failed_cycles: u64,
}

impl<F, S, D> Supervisor<F, S, D>
where
    F: AttemptFeed,
    S: MessageSender,
    D: DiagnosticSink,
{
    pub fn new(poller: AttemptPoller<F>, dispatcher: Dispatcher<S>, sink: D) -> Self {
        Self {
            poller,
            dispatcher,
            sink,
            source: DEFAULT_REPORTER_SOURCE.to_string(),
            restart_delay: Duration::ZERO,
            failed_cycles: 0,
        }
    }

    /// Name prefixed to every maintainer report.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_restart_delay(mut self, restart_delay: Duration) -> Self {
        self.restart_delay = restart_delay;
        self
    }

    pub fn poller(&self) -> &AttemptPoller<F> {
        &self.poller
    }

    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn failed_cycles(&self) -> u64 {
        self.failed_cycles
    }

    /// Run one cycle to its failure, then log and report that failure.
    pub async fn run_cycle(&mut self) -> DispatchError {
        let err = match self.dispatcher.run(&mut self.poller).await {
            Ok(never) => match never {},
            Err(e) => e,
        };
        self.failed_cycles += 1;

        tracing::error!(
            error = %err,
            details = ?err,
            failed_cycles = self.failed_cycles,
            cursor = ?self.poller.cursor().map(Cursor::as_str),
            "Notification cycle failed, restarting"
        );
        self.sink
            .report(Severity::Error, &self.source, &err.to_string())
            .await;

        err
    }

    /// Run forever. Only returns if the surrounding task is dropped.
    pub async fn run(mut self) {
        self.sink
            .report(Severity::Info, &self.source, "Start long polling.")
            .await;

        loop {
            self.run_cycle().await;

            if self.restart_delay.is_zero() {
                // A cycle can fail without ever awaiting I/O.
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.restart_delay).await;
            }
        }
    }
}
