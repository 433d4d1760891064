use serde::Serialize;

/// Output column holding the verdict code
pub const VERDICT_COLUMN: &str = "ground_truth_block_drop";
/// Output column holding `1` for flagged verdicts, `0` otherwise
pub const FLAG_COLUMN: &str = "is_flagged";
/// Output column holding the flag reason (empty when not flagged)
pub const REASON_COLUMN: &str = "reason_for_flag";

/// Outcome assigned to an attempt during classification.
///
/// The numeric codes are what lands in the `ground_truth_block_drop` column
/// and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    NoDrop,
    Drop,
    FingersDidNotCross,
    FingersMightNotHaveCrossed,
    NeedsManualReview,
    Custom,
}

impl Verdict {
    pub const ALL: [Verdict; 6] = [
        Verdict::NoDrop,
        Verdict::Drop,
        Verdict::FingersDidNotCross,
        Verdict::FingersMightNotHaveCrossed,
        Verdict::NeedsManualReview,
        Verdict::Custom,
    ];

    pub fn code(self) -> u8 {
        match self {
            Verdict::NoDrop => 0,
            Verdict::Drop => 1,
            Verdict::FingersDidNotCross => 2,
            Verdict::FingersMightNotHaveCrossed => 3,
            Verdict::NeedsManualReview => 4,
            Verdict::Custom => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Verdict::ALL.into_iter().find(|v| v.code() == code)
    }

    /// Verdicts reached through the flag menu carry a mandatory reason
    pub fn is_flagged(self) -> bool {
        !matches!(self, Verdict::NoDrop | Verdict::Drop)
    }

    /// Fixed reason text for the preset flag verdicts
    pub fn preset_reason(self) -> Option<&'static str> {
        match self {
            Verdict::FingersDidNotCross => {
                Some("Block transferred, but failure because the fingers did not cross")
            }
            Verdict::FingersMightNotHaveCrossed => {
                Some("Block transferred, but fingers might not have crossed")
            }
            Verdict::NeedsManualReview => Some("Needs manual review"),
            _ => None,
        }
    }

    /// Short human label for menus and listings
    pub fn label(self) -> &'static str {
        match self {
            Verdict::NoDrop => "no drop",
            Verdict::Drop => "drop",
            Verdict::FingersDidNotCross => "fingers did not cross",
            Verdict::FingersMightNotHaveCrossed => "fingers might not have crossed",
            Verdict::NeedsManualReview => "needs manual review",
            Verdict::Custom => "custom",
        }
    }
}

/// A verdict committed for one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Number of the classified attempt in the loaded sequence
    pub attempt_ref: u32,
    pub verdict: Verdict,
    pub reason: String,
}

impl Classification {
    /// A direct verdict from the main menu (no flag, empty reason)
    pub fn direct(attempt_ref: u32, verdict: Verdict) -> Self {
        Classification {
            attempt_ref,
            verdict,
            reason: String::new(),
        }
    }

    /// A preset flag verdict; its reason comes from the verdict itself
    pub fn preset(attempt_ref: u32, verdict: Verdict) -> Self {
        Classification {
            attempt_ref,
            verdict,
            reason: verdict.preset_reason().unwrap_or_default().to_string(),
        }
    }

    /// A flag with operator-supplied text. Returns `None` when the trimmed
    /// text is empty, since flagged verdicts always carry a reason.
    pub fn custom(attempt_ref: u32, text: &str) -> Option<Self> {
        let reason = text.trim();
        if reason.is_empty() {
            return None;
        }
        Some(Classification {
            attempt_ref,
            verdict: Verdict::Custom,
            reason: reason.to_string(),
        })
    }

    pub fn is_flagged(&self) -> bool {
        self.verdict.is_flagged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for verdict in Verdict::ALL {
            assert_eq!(Verdict::from_code(verdict.code()), Some(verdict));
        }
        assert_eq!(Verdict::from_code(6), None);
    }

    #[test]
    fn only_menu_verdicts_are_unflagged() {
        assert!(!Verdict::NoDrop.is_flagged());
        assert!(!Verdict::Drop.is_flagged());
        assert!(Verdict::NeedsManualReview.is_flagged());
        assert!(Verdict::Custom.is_flagged());
    }

    #[test]
    fn preset_carries_fixed_reason() {
        let c = Classification::preset(3, Verdict::NeedsManualReview);
        assert_eq!(c.reason, "Needs manual review");
        assert!(c.is_flagged());
    }

    #[test]
    fn custom_requires_non_blank_text() {
        assert!(Classification::custom(1, "   ").is_none());
        let c = Classification::custom(1, "  glove slipped ").unwrap();
        assert_eq!(c.reason, "glove slipped");
        assert_eq!(c.verdict, Verdict::Custom);
    }
}
