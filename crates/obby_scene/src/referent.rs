//! Referent tokens.
//!
//! One counter per document. Nothing here is global, so two documents can
//! be built side by side without sharing ids.

/// Sequential referent source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferentCounter {
    issued: u32,
}

impl ReferentCounter {
    /// Creates a counter whose first token is `RBX00000001`.
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Issues the next token.
    pub fn next_token(&mut self) -> String {
        self.issued = self.issued.wrapping_add(1);
        format!("RBX{:08X}", self.issued)
    }

    /// Tokens issued so far.
    #[inline]
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.issued
    }

    /// Starts over from the first token.
    #[inline]
    pub fn reset(&mut self) {
        self.issued = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_fixed_width_hex() {
        let mut counter = ReferentCounter::new();
        assert_eq!(counter.next_token(), "RBX00000001");
        for _ in 0..9 {
            counter.next_token();
        }
        assert_eq!(counter.next_token(), "RBX0000000B");
        assert_eq!(counter.issued(), 11);
    }

    #[test]
    fn test_reset_reproduces() {
        let mut counter = ReferentCounter::new();
        let first: Vec<_> = (0..3).map(|_| counter.next_token()).collect();
        counter.reset();
        let second: Vec<_> = (0..3).map(|_| counter.next_token()).collect();
        assert_eq!(first, second);
    }
}
