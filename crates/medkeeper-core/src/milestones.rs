//! Streak rank ladder.
//!
//! Ranks are cosmetic titles awarded at streak thresholds. The engine only
//! reports rank changes; badge or role assignment belongs to whatever
//! collaborator consumes [`crate::Notice::MilestoneReached`].

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    /// Minimum streak for this title.
    pub threshold: u32,
    pub title: &'static str,
}

/// Ladder in ascending threshold order.
pub const RANKS: [Rank; 8] = [
    Rank { threshold: 0, title: "Unmedicated Plebian" },
    Rank { threshold: 1, title: "Barely Medicated Mess" },
    Rank { threshold: 2, title: "Pill Buddy" },
    Rank { threshold: 3, title: "Triple Piller" },
    Rank { threshold: 7, title: "Medication Sensation" },
    Rank { threshold: 14, title: "Well-Medicated One" },
    Rank { threshold: 21, title: "Master of Taking Pills" },
    Rank { threshold: 28, title: "Pill-Poppin PhD" },
];

/// Highest rank the streak qualifies for.
pub fn rank_for_streak(streak: u32) -> Rank {
    RANKS
        .iter()
        .rev()
        .find(|r| streak >= r.threshold)
        .copied()
        .unwrap_or(RANKS[0])
}

/// The rank newly earned by moving from `before` to `after`, if the move
/// crossed a threshold upward.
pub fn crossed_rank(before: u32, after: u32) -> Option<Rank> {
    if after <= before {
        return None;
    }
    let earned = rank_for_streak(after);
    if earned.threshold > rank_for_streak(before).threshold {
        Some(earned)
    } else {
        None
    }
}
