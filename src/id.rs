/// Monotonic ID generator shared by every entity type in the store.
///
/// Wars, battles, rounds, laws, and journal entries all draw from the same
/// sequence, so an ID is globally unique and can be referenced from signals
/// and journal entries without carrying its type alongside.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Resume a sequence, e.g. after reloading persisted state.
    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
