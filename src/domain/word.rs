/// Word entities: tokens, falling sprites, and landed (stacked) snapshots.
///
/// A `FallingWord` is plain data; `advance()` is its only motion rule.
/// When it lands it is consumed into a `StackedWord`, which is never
/// mutated again. The only thing that can happen to a stacked word is
/// deletion (see `sim::world::WordFall::remove_by_prefix`).

/// Measures rendered text extent in world units.
/// Provided by whatever surface draws the words.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f32;
}

/// Split a submission into word tokens on runs of whitespace.
/// Empty pieces are discarded; case is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Case-insensitive "does `text` start with `key`".
pub fn starts_with_letter(text: &str, key: char) -> bool {
    let key: String = key.to_lowercase().collect();
    text.to_lowercase().starts_with(&key)
}

/// Axis-aligned bounds in world units (y grows downward).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Debug)]
pub struct FallingWord {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,     // units per tick, > 0
    pub rotation: f32,  // radians, unbounded
    pub spin: f32,      // radians per tick
    pub gray: u8,
}

impl FallingWord {
    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, w: self.width, h: self.height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One tick of motion: straight down, plus spin. No horizontal drift.
pub fn advance(word: &mut FallingWord) {
    word.y += word.speed;
    word.rotation += word.spin;
}

/// A landed word. Fields are readable but the store only hands out
/// shared references, so a snapshot cannot change after landing.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedWord {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub gray: u8,
}

impl StackedWord {
    /// Freeze a falling word at its current x and the resolved landing y.
    pub fn land(word: FallingWord, y: f32) -> Self {
        StackedWord {
            text: word.text,
            x: word.x,
            y,
            width: word.width,
            height: word.height,
            gray: word.gray,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

/// Ordered collection of landed words, oldest first.
#[derive(Clone, Debug, Default)]
pub struct StackedStore {
    words: Vec<StackedWord>,
}

impl StackedStore {
    pub fn new() -> Self {
        StackedStore { words: Vec::new() }
    }

    pub fn push(&mut self, word: StackedWord) {
        self.words.push(word);
    }

    pub fn as_slice(&self) -> &[StackedWord] {
        &self.words
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StackedWord> {
        self.words.iter()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Delete every word whose text starts with `key` (case-insensitive).
    /// Survivors keep their relative order. Returns how many were removed.
    pub fn remove_by_prefix(&mut self, key: char) -> usize {
        let before = self.words.len();
        self.words.retain(|w| !starts_with_letter(&w.text, key));
        before - self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn falling(text: &str, y: f32, speed: f32) -> FallingWord {
        FallingWord {
            text: text.into(),
            x: 10.0,
            y,
            width: 50.0,
            height: 40.0,
            speed,
            rotation: 0.05,
            spin: -0.01,
            gray: 120,
        }
    }

    fn stacked(text: &str) -> StackedWord {
        StackedWord { text: text.into(), x: 0.0, y: 0.0, width: 10.0, height: 40.0, gray: 90 }
    }

    // ── tokenize ──

    #[test]
    fn tokenize_splits_whitespace_runs() {
        assert_eq!(tokenize("Hello World foo"), vec!["Hello", "World", "foo"]);
        assert_eq!(tokenize("  a\t\tb \n c  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokenize_whitespace_only_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }

    #[test]
    fn tokenize_keeps_case_and_duplicates() {
        assert_eq!(tokenize("Foo foo Foo"), vec!["Foo", "foo", "Foo"]);
    }

    // ── prefix match ──

    #[test]
    fn prefix_match_ignores_case() {
        assert!(starts_with_letter("Hello", 'h'));
        assert!(starts_with_letter("hi", 'H'));
        assert!(!starts_with_letter("World", 'h'));
        assert!(!starts_with_letter("oh", 'h'));
    }

    // ── motion ──

    #[test]
    fn advance_moves_down_and_spins() {
        let mut w = falling("a", -40.0, 2.0);
        advance(&mut w);
        assert_eq!(w.y, -38.0);
        assert!((w.rotation - 0.04).abs() < 1e-6);
        assert_eq!(w.x, 10.0);
    }

    #[test]
    fn y_never_decreases() {
        let mut w = falling("a", -40.0, 1.3);
        let mut last = w.y;
        for _ in 0..500 {
            advance(&mut w);
            assert!(w.y >= last);
            last = w.y;
        }
    }

    // ── landing snapshot ──

    #[test]
    fn land_freezes_geometry_and_color() {
        let w = falling("word", 300.0, 2.5);
        let s = StackedWord::land(w, 280.0);
        assert_eq!(s.text, "word");
        assert_eq!(s.x, 10.0);
        assert_eq!(s.y, 280.0);
        assert_eq!((s.width, s.height, s.gray), (50.0, 40.0, 120));
    }

    // ── store ──

    #[test]
    fn store_removes_all_matches_keeping_order() {
        let mut store = StackedStore::new();
        for t in ["Hello", "apple", "Hi", "World", "avocado"] {
            store.push(stacked(t));
        }
        assert_eq!(store.remove_by_prefix('h'), 2);
        let left: Vec<&str> = store.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(left, vec!["apple", "World", "avocado"]);
    }

    #[test]
    fn store_remove_without_match_is_noop() {
        let mut store = StackedStore::new();
        store.push(stacked("World"));
        assert_eq!(store.remove_by_prefix('z'), 0);
        assert_eq!(store.len(), 1);
    }
}
