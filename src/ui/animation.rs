//! Staggered entry of search results
//!
//! Result `i` waits `i * ENTRY_STAGGER` seconds, then fades in over
//! `ENTRY_DURATION` while sliding from `ENTRY_OFFSET` to its place.

pub const ENTRY_STAGGER: f64 = 0.1;
pub const ENTRY_DURATION: f64 = 0.3;
/// Vertical start offset in points
pub const ENTRY_OFFSET: f32 = -20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryFrame {
    pub opacity: f32,
    pub offset: f32,
}

impl EntryFrame {
    pub const HIDDEN: EntryFrame = EntryFrame {
        opacity: 0.0,
        offset: ENTRY_OFFSET,
    };

    pub const SETTLED: EntryFrame = EntryFrame {
        opacity: 1.0,
        offset: 0.0,
    };
}

/// Where item `index` is `elapsed` seconds after the results arrived
pub fn entry_frame(index: usize, elapsed: f64) -> EntryFrame {
    let local = elapsed - index as f64 * ENTRY_STAGGER;
    if local <= 0.0 {
        return EntryFrame::HIDDEN;
    }
    if local >= ENTRY_DURATION {
        return EntryFrame::SETTLED;
    }

    let t = (local / ENTRY_DURATION) as f32;
    EntryFrame {
        opacity: t,
        offset: ENTRY_OFFSET * (1.0 - t),
    }
}

/// Whether all `count` items have finished entering
pub fn entry_settled(count: usize, elapsed: f64) -> bool {
    match count {
        0 => true,
        n => elapsed >= (n - 1) as f64 * ENTRY_STAGGER + ENTRY_DURATION,
    }
}
