/// Tags outgoing requests so that only the latest response is applied.
///
/// Each reload or search takes a ticket before going out; when its response
/// arrives it is applied only if no newer ticket has been issued since.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_issued_wins() {
        let mut seq = RequestSequencer::new();
        let slow = seq.issue();
        let fast = seq.issue();
        assert!(seq.is_current(fast));
        assert!(!seq.is_current(slow));
    }
}
