/// `score / total` as a whole percentage, rounding the .5 midpoint up.
/// Integer arithmetic keeps exact midpoints (e.g. 1/8 = 12.5%) from drifting.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = score.min(total) as u64;
    let total = total as u64;
    ((score * 200 + total) / (total * 2)) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreTier {
    Top,
    High,
    Mid,
    Low,
}

impl ScoreTier {
    pub fn from_percentage(pct: u32) -> Self {
        if pct >= 90 {
            ScoreTier::Top
        } else if pct >= 70 {
            ScoreTier::High
        } else if pct >= 50 {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ScoreTier::Top => "\u{1F3C6}",
            ScoreTier::High => "\u{1F389}",
            ScoreTier::Mid => "\u{1F44D}",
            ScoreTier::Low => "\u{1F605}",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            ScoreTier::Top => "Outstanding!",
            ScoreTier::High => "Great job!",
            ScoreTier::Mid => "Not bad",
            ScoreTier::Low => "Keep practising",
        }
    }
}

/// Colour band for the percentage column of the history table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryBand {
    High,
    Mid,
    Low,
}

impl HistoryBand {
    pub fn from_percentage(pct: u32) -> Self {
        if pct >= 70 {
            HistoryBand::High
        } else if pct >= 50 {
            HistoryBand::Mid
        } else {
            HistoryBand::Low
        }
    }
}
