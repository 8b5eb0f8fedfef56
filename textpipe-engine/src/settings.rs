//! Engine level knobs
//!
//! User supplied patterns are compiled with the `regex` crate, which matches in linear time,
//! so there is no backtracking blow-up to guard against. The remaining risk is a pattern that
//! compiles to a huge automaton; the size limits below bound that, and a pattern over the
//! limit is handled exactly like an invalid one.

/// Settings shared by every executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound, in bytes, for a compiled user pattern
    pub regex_size_limit: usize,
    /// Upper bound, in bytes, for the lazy DFA cache of a user pattern
    pub regex_dfa_size_limit: usize,
}

impl EngineSettings {
    pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;
    pub const DEFAULT_REGEX_DFA_SIZE_LIMIT: usize = 2 << 20;
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            regex_size_limit: Self::DEFAULT_REGEX_SIZE_LIMIT,
            regex_dfa_size_limit: Self::DEFAULT_REGEX_DFA_SIZE_LIMIT,
        }
    }
}
