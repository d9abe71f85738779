//! Draw completion contract between scheduler and provider
//!
//! Every dispatched draw carries a [`DrawTicket`]. The provider resolves it
//! exactly once — completed, cancelled, or failed — and the event travels
//! back over a channel that the scheduler drains on its own thread, so state
//! transitions never race with each other.

use flume::Sender;

use crate::cancel::CancellationToken;
use crate::provider::DrawError;

/// Identifies one dispatched draw. A page can be drawn many times (it is
/// cancelled and replaced on each new request); the id tells completions of
/// superseded draws apart from the live one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawId(pub u64);

/// Terminal state of one draw.
#[derive(Debug)]
pub enum DrawOutcome {
    Completed,
    /// Cancellation is not an error: it never logs as a failure and leaves
    /// the page's generation stamp unset.
    Cancelled,
    Failed(DrawError),
}

/// Completion message delivered back to the scheduling thread.
#[derive(Debug)]
pub struct DrawEvent {
    pub page: u32,
    pub id: DrawId,
    /// Generation captured when the draw was requested, never re-read later.
    pub generation: u64,
    pub outcome: DrawOutcome,
}

/// Single-use completion handle given to the provider with each draw.
///
/// Dropping a ticket without resolving it counts as a failure so an
/// abandoned draw can never stall a concurrency slot.
#[derive(Debug)]
pub struct DrawTicket {
    inner: Option<TicketInner>,
}

#[derive(Debug)]
struct TicketInner {
    page: u32,
    id: DrawId,
    generation: u64,
    token: CancellationToken,
    completion: Sender<DrawEvent>,
}

impl DrawTicket {
    pub(crate) fn new(
        page: u32,
        id: DrawId,
        generation: u64,
        token: CancellationToken,
        completion: Sender<DrawEvent>,
    ) -> Self {
        Self {
            inner: Some(TicketInner {
                page,
                id,
                generation,
                token,
                completion,
            }),
        }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.inner.as_ref().map_or(0, |inner| inner.page)
    }

    /// Whether the scheduler has since cancelled this draw. Providers should
    /// poll this between units of work.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.token.is_cancelled())
    }

    /// Report a finished draw. Resolves as cancelled instead when the token
    /// fired while the work was still in flight, so a cancelled draw can
    /// never stamp its page.
    pub fn complete(mut self) {
        if let Some(inner) = self.inner.take() {
            let outcome = if inner.token.is_cancelled() {
                DrawOutcome::Cancelled
            } else {
                DrawOutcome::Completed
            };
            inner.send(outcome);
        }
    }

    /// Report a draw that stopped in response to cancellation.
    pub fn cancelled(mut self) {
        if let Some(inner) = self.inner.take() {
            inner.send(DrawOutcome::Cancelled);
        }
    }

    /// Report a failed draw. Downgraded to a cancellation when the token had
    /// already fired — obsolete work is never surfaced as an error.
    pub fn fail(mut self, error: DrawError) {
        if let Some(inner) = self.inner.take() {
            let outcome = if inner.token.is_cancelled() {
                DrawOutcome::Cancelled
            } else {
                DrawOutcome::Failed(error)
            };
            inner.send(outcome);
        }
    }
}

impl Drop for DrawTicket {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            let error = DrawError::new(inner.page, "draw abandoned without completion");
            inner.send(DrawOutcome::Failed(error));
        }
    }
}

impl TicketInner {
    fn send(self, outcome: DrawOutcome) {
        // The receiver disappearing just means the scheduler is gone.
        let _ = self.completion.send(DrawEvent {
            page: self.page,
            id: self.id,
            generation: self.generation,
            outcome,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(token: &CancellationToken) -> (DrawTicket, flume::Receiver<DrawEvent>) {
        let (tx, rx) = flume::unbounded();
        (DrawTicket::new(3, DrawId(7), 42, token.clone(), tx), rx)
    }

    #[test]
    fn complete_reports_request_time_generation() {
        let token = CancellationToken::new();
        let (ticket, rx) = ticket(&token);

        ticket.complete();

        let event = rx.try_recv().expect("completion expected");
        assert_eq!(event.page, 3);
        assert_eq!(event.id, DrawId(7));
        assert_eq!(event.generation, 42);
        assert!(matches!(event.outcome, DrawOutcome::Completed));
    }

    #[test]
    fn complete_after_cancel_resolves_as_cancelled() {
        let token = CancellationToken::new();
        let (ticket, rx) = ticket(&token);

        token.cancel();
        ticket.complete();

        let event = rx.try_recv().expect("event expected");
        assert!(matches!(event.outcome, DrawOutcome::Cancelled));
    }

    #[test]
    fn failure_after_cancel_is_not_an_error() {
        let token = CancellationToken::new();
        let (ticket, rx) = ticket(&token);

        token.cancel();
        ticket.fail(DrawError::new(3, "surface lost"));

        let event = rx.try_recv().expect("event expected");
        assert!(matches!(event.outcome, DrawOutcome::Cancelled));
    }

    #[test]
    fn dropped_ticket_reports_failure() {
        let token = CancellationToken::new();
        let (ticket, rx) = ticket(&token);

        drop(ticket);

        let event = rx.try_recv().expect("event expected");
        assert!(matches!(event.outcome, DrawOutcome::Failed(_)));
    }

    #[test]
    fn ticket_resolves_exactly_once() {
        let token = CancellationToken::new();
        let (ticket, rx) = ticket(&token);

        ticket.complete();

        assert_eq!(rx.len(), 1);
    }
}
