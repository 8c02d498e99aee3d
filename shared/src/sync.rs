//! Guards view state against late network responses.
//!
//! Every fetch takes a ticket before it is sent. When the response arrives
//! the ticket is checked: responses older than the last one applied, older
//! than the latest local edit, or issued before the view was torn down are
//! discarded instead of overwriting newer state.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLedger {
    issued: u64,
    last_applied: u64,
    /// Tickets at or below this were issued before a local mutation or a cancel
    floor: u64,
    cancelled: bool,
}

impl RequestLedger {
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// A local edit was committed; responses to requests already in flight
    /// describe the state before it and must not be applied.
    pub fn note_local_mutation(&mut self) {
        self.floor = self.issued;
    }

    /// The owning view is going away; nothing outstanding may be applied
    pub fn cancel_all(&mut self) {
        self.floor = self.issued;
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Returns true, and records the ticket, when its response may be applied
    pub fn accept(&mut self, ticket: RequestTicket) -> bool {
        if self.cancelled || ticket.0 <= self.floor || ticket.0 <= self.last_applied {
            log::debug!("discarding response for request {}", ticket.0);
            return false;
        }
        self.last_applied = ticket.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_responses_apply() {
        let mut ledger = RequestLedger::default();
        let first = ledger.issue();
        assert!(ledger.accept(first));
        let second = ledger.issue();
        assert!(ledger.accept(second));
    }

    #[test]
    fn test_older_response_after_newer_is_discarded() {
        let mut ledger = RequestLedger::default();
        let slow = ledger.issue();
        let fast = ledger.issue();
        assert!(ledger.accept(fast));
        assert!(!ledger.accept(slow));
    }

    #[test]
    fn test_local_mutation_invalidates_in_flight_fetch() {
        let mut ledger = RequestLedger::default();
        let in_flight = ledger.issue();
        ledger.note_local_mutation();
        assert!(!ledger.accept(in_flight));

        let after_edit = ledger.issue();
        assert!(ledger.accept(after_edit));
    }

    #[test]
    fn test_cancel_all_blocks_everything() {
        let mut ledger = RequestLedger::default();
        let outstanding = ledger.issue();
        ledger.cancel_all();
        assert!(ledger.is_cancelled());
        assert!(!ledger.accept(outstanding));
        let late = ledger.issue();
        assert!(!ledger.accept(late));
    }

    #[test]
    fn test_ticket_is_applied_once() {
        let mut ledger = RequestLedger::default();
        let ticket = ledger.issue();
        assert!(ledger.accept(ticket));
        assert!(!ledger.accept(ticket));
        assert_eq!(ticket.id(), 1);
    }
}
