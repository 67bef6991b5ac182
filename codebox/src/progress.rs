//! Achievement and streak rules for user statistics.
//!
//! Badges are not stored anywhere. They are recomputed from the progress counters on every
//! request, so changing a threshold here changes every user's badge count retroactively.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Achievement flags derived from a user's progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Achievements {
    /// Enrolled in at least one course
    pub first_course: bool,
    /// Completed at least one exercise
    pub first_exercise: bool,
    pub xp100: bool,
    pub xp500: bool,
    pub xp1000: bool,
    pub exercises10: bool,
    pub exercises50: bool,
    /// Enrolled in at least three courses
    pub courses3: bool,
}

impl Achievements {
    pub fn evaluate(total_xp: i32, courses_enrolled: i64, exercises_completed: i64) -> Self {
        Self {
            first_course: courses_enrolled >= 1,
            first_exercise: exercises_completed >= 1,
            xp100: total_xp >= 100,
            xp500: total_xp >= 500,
            xp1000: total_xp >= 1000,
            exercises10: exercises_completed >= 10,
            exercises50: exercises_completed >= 50,
            courses3: courses_enrolled >= 3,
        }
    }

    /// Number of flags that are set.
    pub fn badges(&self) -> u32 {
        [
            self.first_course,
            self.first_exercise,
            self.xp100,
            self.xp500,
            self.xp1000,
            self.exercises10,
            self.exercises50,
            self.courses3,
        ]
        .into_iter()
        .filter(|earned| *earned)
        .count() as u32
    }
}

/// Coarse streak from the number of recent completions (at most the last seven are counted).
///
/// This is a bucketed approximation, not a consecutive-day calculation.
pub fn day_streak(recent_completions: i64) -> u32 {
    match recent_completions {
        n if n >= 5 => 7,
        n if n >= 3 => 3,
        n if n >= 1 => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_badges() {
        let achievements = Achievements::evaluate(0, 0, 0);
        assert_eq!(achievements, Achievements::default());
        assert_eq!(achievements.badges(), 0);
    }

    #[test]
    fn test_badge_count_for_active_learner() {
        let achievements = Achievements::evaluate(150, 3, 12);

        assert!(achievements.first_course);
        assert!(achievements.first_exercise);
        assert!(achievements.xp100);
        assert!(!achievements.xp500);
        assert!(!achievements.xp1000);
        assert!(achievements.exercises10);
        assert!(!achievements.exercises50);
        assert!(achievements.courses3);
        assert_eq!(achievements.badges(), 5);
    }

    #[test]
    fn test_all_badges() {
        assert_eq!(Achievements::evaluate(1000, 3, 50).badges(), 8);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let below = Achievements::evaluate(99, 2, 9);
        assert!(!below.xp100 && !below.exercises10 && !below.courses3);

        let at = Achievements::evaluate(100, 3, 10);
        assert!(at.xp100 && at.exercises10 && at.courses3);
    }

    #[test]
    fn test_day_streak_buckets() {
        let streaks: Vec<_> = (0..=7).map(day_streak).collect();
        assert_eq!(streaks, vec![0, 1, 1, 3, 3, 7, 7, 7]);
        assert_eq!(day_streak(-1), 0);
    }
}
