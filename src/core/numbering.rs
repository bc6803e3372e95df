/// Line number sequence for a single transaction.
///
/// Issues "1", "2", "3", ... in order. A number is never handed out twice,
/// and nothing rewinds the counter, so lines keep the number they were
/// created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumberSequence {
    next_number: u32,
}

impl Default for LineNumberSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl LineNumberSequence {
    /// Create a new sequence starting at 1.
    pub fn new() -> Self {
        Self { next_number: 1 }
    }

    /// Create a sequence continuing from a given number (must be >= 1).
    pub fn starting_at(next_number: u32) -> Self {
        Self {
            next_number: next_number.max(1),
        }
    }

    /// Issue the next line number.
    pub fn next_number(&mut self) -> String {
        let num = self.next_number;
        self.next_number += 1;
        num.to_string()
    }

    /// Preview the next number without consuming it.
    pub fn peek(&self) -> String {
        self.next_number.to_string()
    }

    /// The next number that will be issued, unformatted.
    pub fn next_raw(&self) -> u32 {
        self.next_number
    }

    /// How many numbers have been issued (assuming the sequence started at 1).
    pub fn issued(&self) -> u32 {
        self.next_number - 1
    }
}
