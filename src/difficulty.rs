use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named difficulty levels, ordered from easiest to hardest
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Noob,
    Intermediate,
    Pro,
}

/// Duration and WPM band for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyProfile {
    pub id: Difficulty,
    pub label: &'static str,
    pub duration_secs: u32,
    pub min_wpm: u32,
    /// `None` means the band is open-ended
    pub max_wpm: Option<u32>,
}

static PROFILES: [DifficultyProfile; 3] = [
    DifficultyProfile {
        id: Difficulty::Noob,
        label: "Noob",
        duration_secs: 60,
        min_wpm: 0,
        max_wpm: Some(30),
    },
    DifficultyProfile {
        id: Difficulty::Intermediate,
        label: "Intermediate",
        duration_secs: 45,
        min_wpm: 31,
        max_wpm: Some(60),
    },
    DifficultyProfile {
        id: Difficulty::Pro,
        label: "Pro",
        duration_secs: 30,
        min_wpm: 61,
        max_wpm: None,
    },
];

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Noob, Difficulty::Intermediate, Difficulty::Pro];

    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Noob => &PROFILES[0],
            Difficulty::Intermediate => &PROFILES[1],
            Difficulty::Pro => &PROFILES[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn duration_secs(self) -> u32 {
        self.profile().duration_secs
    }
}

impl DifficultyProfile {
    /// Whether `wpm` falls inside this profile's band
    pub fn contains(&self, wpm: u32) -> bool {
        wpm >= self.min_wpm && self.max_wpm.map_or(true, |max| wpm <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_constants() {
        let noob = Difficulty::Noob.profile();
        assert_eq!(noob.duration_secs, 60);
        assert_eq!(noob.min_wpm, 0);
        assert_eq!(noob.max_wpm, Some(30));

        let intermediate = Difficulty::Intermediate.profile();
        assert_eq!(intermediate.duration_secs, 45);
        assert_eq!(intermediate.min_wpm, 31);
        assert_eq!(intermediate.max_wpm, Some(60));

        let pro = Difficulty::Pro.profile();
        assert_eq!(pro.duration_secs, 30);
        assert_eq!(pro.min_wpm, 61);
        assert_eq!(pro.max_wpm, None);
    }

    #[test]
    fn test_profiles_are_well_formed() {
        for d in Difficulty::ALL {
            let p = d.profile();
            assert_eq!(p.id, d);
            if let Some(max) = p.max_wpm {
                assert!(p.min_wpm <= max);
            }
        }
    }

    #[test]
    fn test_bands_do_not_overlap_and_durations_shrink() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].profile(), pair[1].profile());
            assert!(pair[0] < pair[1]);
            assert!(easier.max_wpm.unwrap() < harder.min_wpm);
            assert!(easier.duration_secs > harder.duration_secs);
        }
    }

    #[test]
    fn test_contains() {
        let intermediate = Difficulty::Intermediate.profile();
        assert!(!intermediate.contains(30));
        assert!(intermediate.contains(31));
        assert!(intermediate.contains(60));
        assert!(!intermediate.contains(61));
        assert!(Difficulty::Pro.profile().contains(500));
    }

    #[test]
    fn test_display_and_labels() {
        assert_eq!(Difficulty::Noob.to_string(), "noob");
        assert_eq!(Difficulty::Intermediate.to_string(), "intermediate");
        assert_eq!(Difficulty::Pro.to_string(), "pro");
        assert_eq!(Difficulty::Pro.label(), "Pro");
        assert_eq!(Difficulty::default(), Difficulty::Noob);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");
        let parsed: Difficulty = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(parsed, Difficulty::Pro);
    }
}
