//! Interaction tickets for ordering selection results

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Position of one user interaction in the global click order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing tickets, shared by all intent producers
#[derive(Debug, Clone, Default)]
pub struct InteractionClock {
    next: Arc<AtomicU64>,
}

impl InteractionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for an interaction that starts now
    pub fn tick(&self) -> Ticket {
        Ticket(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase_across_clones() {
        let clock = InteractionClock::new();
        let other = clock.clone();
        let a = clock.tick();
        let b = other.tick();
        let c = clock.tick();
        assert!(a < b && b < c);
        assert_eq!(a.value(), 1);
        assert_eq!(c.to_string(), "#3");
    }
}
