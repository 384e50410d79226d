use crate::difficulty::DifficultyProfile;

/// Minimum accuracy (percent) required to pass, regardless of difficulty
pub const ACCURACY_FLOOR: u32 = 90;

/// Snapshot of the live scoring numbers for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Default for Stats {
    fn default() -> Self {
        // an untouched session shows perfect accuracy
        Self {
            wpm: 0,
            accuracy: 100,
        }
    }
}

impl Stats {
    pub fn compute(typed: &str, reference: &str, duration_secs: u32, time_left: u32) -> Self {
        Self {
            wpm: compute_wpm(typed, duration_secs, time_left),
            accuracy: compute_accuracy(typed, reference),
        }
    }
}

/// Number of space separated segments typed so far.
///
/// Surrounding whitespace is trimmed first and the empty string still counts
/// as a single segment.
pub fn word_count(typed: &str) -> usize {
    typed.trim().split(' ').count()
}

/// Words per minute over the elapsed part of the countdown, 0 when no time has elapsed
pub fn compute_wpm(typed: &str, duration_secs: u32, time_left: u32) -> u32 {
    let elapsed_secs = duration_secs.saturating_sub(time_left);
    if elapsed_secs == 0 {
        return 0;
    }

    let minutes = elapsed_secs as f64 / 60.0;
    (word_count(typed) as f64 / minutes).round() as u32
}

/// Percentage of typed characters that match the reference at the same index.
///
/// Characters typed past the end of the reference count as incorrect.
pub fn compute_accuracy(typed: &str, reference: &str) -> u32 {
    let typed_len = typed.chars().count();
    if typed_len == 0 {
        return 100;
    }

    let correct = typed
        .chars()
        .zip(reference.chars())
        .filter(|(t, r)| t == r)
        .count();

    ((correct as f64 / typed_len as f64) * 100.0).round() as u32
}

/// Returns true when the result does not meet the profile's WPM floor or the accuracy floor
pub fn is_failing(stats: Stats, profile: &DifficultyProfile) -> bool {
    stats.wpm < profile.min_wpm || stats.accuracy < ACCURACY_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;

    #[test]
    fn test_accuracy_empty_input_is_perfect() {
        assert_eq!(compute_accuracy("", "anything"), 100);
        assert_eq!(compute_accuracy("", ""), 100);
    }

    #[test]
    fn test_accuracy_counts_index_aligned_matches() {
        assert_eq!(compute_accuracy("test", "test"), 100);
        assert_eq!(compute_accuracy("txst", "test"), 75);
        assert_eq!(compute_accuracy("xxxx", "test"), 0);
        // 2 of 3 correct rounds to 67
        assert_eq!(compute_accuracy("tex", "test"), 67);
    }

    #[test]
    fn test_accuracy_past_reference_end_is_incorrect() {
        assert_eq!(compute_accuracy("hi!!", "hi"), 50);
    }

    #[test]
    fn test_accuracy_is_per_char_not_per_byte() {
        assert_eq!(compute_accuracy("héllo", "héllo"), 100);
        assert_eq!(compute_accuracy("hello", "héllo"), 80);
    }

    #[test]
    fn test_accuracy_stays_in_range() {
        let reference = "The quick brown fox";
        for typed in ["T", "Tx", "The quack", "zzzzzzzzzzzzzzzzzzzzzzzzzzz"] {
            let acc = compute_accuracy(typed, reference);
            assert!(acc <= 100, "{typed} gave {acc}");
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 1);
        assert_eq!(word_count("hello"), 1);
        assert_eq!(word_count("hello world"), 2);
        assert_eq!(word_count("  hello world  "), 2);
        // consecutive spaces yield an empty segment
        assert_eq!(word_count("hello  world"), 3);
    }

    #[test]
    fn test_wpm_zero_elapsed_is_zero() {
        assert_eq!(compute_wpm("hello world", 60, 60), 0);
        assert_eq!(compute_wpm("", 30, 30), 0);
    }

    #[test]
    fn test_wpm_over_elapsed_minutes() {
        // 2 words in 30 seconds
        assert_eq!(compute_wpm("hello world", 60, 30), 4);
        // 2 words in 6 seconds
        assert_eq!(compute_wpm("the quick", 60, 54), 20);
        // 3 words in 7 seconds is 25.71...
        assert_eq!(compute_wpm("one two three", 45, 38), 26);
    }

    #[test]
    fn test_wpm_time_left_above_duration_is_zero() {
        assert_eq!(compute_wpm("hello", 30, 45), 0);
    }

    #[test]
    fn test_stats_default() {
        let stats = Stats::default();
        assert_eq!(stats.wpm, 0);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_stats_compute() {
        let stats = Stats::compute("the qu", "the quick", 60, 54);
        assert_eq!(stats.wpm, 20);
        assert_eq!(stats.accuracy, 100);
    }

    #[test]
    fn test_pass_fail_boundary_intermediate() {
        let profile = Difficulty::Intermediate.profile();
        let stats = |wpm, accuracy| Stats { wpm, accuracy };

        assert!(!is_failing(stats(31, 95), profile));
        assert!(is_failing(stats(30, 95), profile));
        assert!(is_failing(stats(40, 89), profile));
        assert!(!is_failing(stats(40, 90), profile));
    }

    #[test]
    fn test_accuracy_floor_is_shared_by_all_profiles() {
        for d in Difficulty::ALL {
            let profile = d.profile();
            let fast = Stats {
                wpm: 200,
                accuracy: ACCURACY_FLOOR - 1,
            };
            assert!(is_failing(fast, profile), "{d} should fail on accuracy");
        }
    }

    #[test]
    fn test_noob_passes_with_zero_wpm() {
        let stats = Stats {
            wpm: 0,
            accuracy: 100,
        };
        assert!(!is_failing(stats, Difficulty::Noob.profile()));
    }
}
