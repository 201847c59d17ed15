/// Landing rules: when does a falling word stop, and at what y.
///
/// ## Overlap test
///
/// For a falling word `f` and a stacked word `s`, with tolerance `gap`:
///
///   f.x + f.w >  s.x + gap        (f's right edge past s's inset left edge)
///   f.x       <  s.x + s.w - gap  (f's left edge before s's inset right edge)
///   f.y + f.h >= s.y - gap        (f's bottom reached s's top, minus gap)
///
/// The horizontal inset means words that only graze a neighbour's edge
/// slide past it. There is no upper bound on the vertical test: a word
/// whose bottom is anywhere below `s.y - gap` counts as overlapping.
///
/// ## Target selection
///
///   - `First`:   first overlapping word in store order (oldest landed).
///                Not necessarily the closest one.
///   - `Nearest`: overlapping word with the smallest y (topmost surface);
///                ties go to the older word.
///
/// A word target wins over the floor. Without a target, the floor catches
/// any word whose bottom reaches `floor_level`.

use super::word::{Bounds, FallingWord, StackedWord};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LandingPolicy {
    First,
    Nearest,
}

/// What a word landed on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Support {
    Floor,
    /// Index into the stacked store at the time of landing.
    Word(usize),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Landing {
    pub on: Support,
    pub y: f32,
}

pub fn overlaps(falling: Bounds, stacked: Bounds, gap: f32) -> bool {
    falling.x + falling.w > stacked.x + gap
        && falling.x < stacked.x + stacked.w - gap
        && falling.y + falling.h >= stacked.y - gap
}

/// Pick the stacked word `word` would land on, if any.
pub fn find_target(
    word: &FallingWord,
    stacked: &[StackedWord],
    gap: f32,
    policy: LandingPolicy,
) -> Option<usize> {
    let fb = word.bounds();
    let mut hits = stacked
        .iter()
        .enumerate()
        .filter(|(_, s)| overlaps(fb, s.bounds(), gap));

    match policy {
        LandingPolicy::First => hits.next().map(|(i, _)| i),
        LandingPolicy::Nearest => hits
            .fold(None, |best: Option<(usize, f32)>, (i, s)| match best {
                Some((_, by)) if by <= s.y => best,
                _ => Some((i, s.y)),
            })
            .map(|(i, _)| i),
    }
}

/// Decide whether `word` lands this tick, and where.
/// `None` means it keeps falling.
pub fn resolve_landing(
    word: &FallingWord,
    stacked: &[StackedWord],
    floor_level: f32,
    gap: f32,
    policy: LandingPolicy,
) -> Option<Landing> {
    if let Some(i) = find_target(word, stacked, gap, policy) {
        return Some(Landing {
            on: Support::Word(i),
            y: stacked[i].y - word.height,
        });
    }
    if word.bottom() >= floor_level {
        return Some(Landing {
            on: Support::Floor,
            y: floor_level - word.height,
        });
    }
    None
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
