use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag flipped once when the owner of a fetch goes away.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Handed out when a fetch starts, checked before its result is committed.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    token: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Generation counter for one table's fetches. Starting a fetch cancels the
/// previous one; only the latest live ticket may commit.
#[derive(Debug, Default)]
pub struct FetchSequence {
    current: u64,
    token: CancellationToken,
}

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> FetchTicket {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.current += 1;
        FetchTicket {
            generation: self.current,
            token: self.token.clone(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.current && !ticket.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}
