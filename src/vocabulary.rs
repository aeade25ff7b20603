//! Dish vocabulary — stable integer indices for observed stimulus tokens.
//!
//! A *dish* (Chinese-Restaurant-Process terminology) is a distinct stimulus
//! identifier, e.g. a target key code from an SRT trial log. Identity is
//! established by first occurrence: the vocabulary assigns each new token the
//! next free index and never forgets it afterwards.
//!
//! # Invariants
//! - Vocabulary size is monotonically non-decreasing — tokens are never
//!   removed and indices are never reused.
//! - One vocabulary is shared across every sample and every restaurant of a
//!   model, so a [`DishId`] is meaningful model-wide.

use hashbrown::HashMap;

/// Stable index of a dish in the vocabulary. Assigned on first occurrence.
pub type DishId = usize;

/// Append-only registry mapping stimulus tokens to [`DishId`]s.
#[derive(Clone, Debug, Default)]
pub struct DishVocabulary {
    /// Tokens in first-occurrence order; `tokens[id]` is the token for `id`.
    tokens: Vec<i64>,
    /// Reverse lookup from token to its index.
    index: HashMap<i64, DishId>,
}

impl DishVocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vocabulary pre-seeded with known tokens, in the given order.
    ///
    /// Duplicates keep their first position.
    pub fn from_tokens(tokens: impl IntoIterator<Item = i64>) -> Self {
        let mut vocab = Self::new();
        for token in tokens {
            vocab.intern(token);
        }
        vocab
    }

    /// Look up a token, registering it with the next free index if unseen.
    pub fn intern(&mut self, token: i64) -> DishId {
        if let Some(&id) = self.index.get(&token) {
            return id;
        }
        let id = self.tokens.len();
        self.tokens.push(token);
        self.index.insert(token, id);
        id
    }

    /// Look up a token without registering it.
    pub fn get(&self, token: i64) -> Option<DishId> {
        self.index.get(&token).copied()
    }

    /// The token registered under `id`, if any.
    pub fn token(&self, id: DishId) -> Option<i64> {
        self.tokens.get(id).copied()
    }

    /// Number of distinct dishes seen so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// `true` until the first token is interned.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All known tokens in first-occurrence order.
    pub fn tokens(&self) -> &[i64] {
        &self.tokens
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_assigns_indices_in_first_occurrence_order() {
        let mut vocab = DishVocabulary::new();
        assert_eq!(vocab.intern(7), 0);
        assert_eq!(vocab.intern(3), 1);
        assert_eq!(vocab.intern(9), 2);
        assert_eq!(vocab.tokens(), &[7, 3, 9]);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut vocab = DishVocabulary::new();
        let first = vocab.intern(42);
        let second = vocab.intern(42);
        assert_eq!(first, second);
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_get_does_not_register() {
        let mut vocab = DishVocabulary::new();
        assert_eq!(vocab.get(5), None);
        assert_eq!(vocab.len(), 0);
        vocab.intern(5);
        assert_eq!(vocab.get(5), Some(0));
    }

    #[test]
    fn test_token_round_trip() {
        let mut vocab = DishVocabulary::new();
        let id = vocab.intern(-12);
        assert_eq!(vocab.token(id), Some(-12));
        assert_eq!(vocab.token(id + 1), None);
    }

    #[test]
    fn test_from_tokens_keeps_first_position_of_duplicates() {
        let vocab = DishVocabulary::from_tokens([3, 1, 3, 1, 2]);
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.get(3), Some(0));
        assert_eq!(vocab.get(1), Some(1));
        assert_eq!(vocab.get(2), Some(2));
    }

    #[test]
    fn test_size_is_monotone() {
        let mut vocab = DishVocabulary::new();
        let mut last = 0;
        for token in [4, 4, 2, 7, 2, 4, 9] {
            vocab.intern(token);
            assert!(vocab.len() >= last);
            last = vocab.len();
        }
        assert_eq!(vocab.len(), 4);
    }
}
