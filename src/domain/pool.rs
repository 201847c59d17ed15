/// Word pool: every token ever submitted, duplicates included.
///
/// The pool only grows. Sampling is with replacement, so a drawn token
/// stays available for later spawns.

use super::random::Uniform;
use super::word::tokenize;

#[derive(Clone, Debug, Default)]
pub struct WordPool {
    tokens: Vec<String>,
}

impl WordPool {
    pub fn new() -> Self {
        WordPool { tokens: Vec::new() }
    }

    /// Tokenize `text` and append the tokens. Returns how many were added.
    pub fn submit(&mut self, text: &str) -> usize {
        let tokens = tokenize(text);
        let added = tokens.len();
        self.tokens.extend(tokens);
        added
    }

    /// Draw one token uniformly at random, leaving it in the pool.
    pub fn sample(&self, rng: &mut dyn Uniform) -> Option<&str> {
        if self.tokens.is_empty() {
            return None;
        }
        let i = rng.index(self.tokens.len());
        Some(self.tokens[i].as_str())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[allow(dead_code)]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::random::Scripted;

    #[test]
    fn submit_appends_tokens() {
        let mut pool = WordPool::new();
        assert_eq!(pool.submit("Hello World foo"), 3);
        assert_eq!(pool.len(), 3);
        assert!(pool.contains("Hello"));
        assert!(pool.contains("World"));
        assert!(pool.contains("foo"));
    }

    #[test]
    fn pool_only_grows() {
        let mut pool = WordPool::new();
        pool.submit("a b");
        pool.submit("   ");
        assert_eq!(pool.len(), 2);
        pool.submit("a a");
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn sample_empty_pool_is_none() {
        let pool = WordPool::new();
        let mut rng = Scripted::new(&[0.3]);
        assert!(pool.sample(&mut rng).is_none());
    }

    #[test]
    fn sample_does_not_remove() {
        let mut pool = WordPool::new();
        pool.submit("only");
        let mut rng = Scripted::new(&[0.0, 0.9, 0.4]);
        for _ in 0..3 {
            assert_eq!(pool.sample(&mut rng), Some("only"));
        }
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn sample_picks_by_index() {
        let mut pool = WordPool::new();
        pool.submit("x y z");
        let mut rng = Scripted::new(&[0.0, 0.5, 0.99]);
        assert_eq!(pool.sample(&mut rng), Some("x"));
        assert_eq!(pool.sample(&mut rng), Some("y"));
        assert_eq!(pool.sample(&mut rng), Some("z"));
    }
}
