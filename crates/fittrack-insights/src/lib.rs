//! Dashboard insights: weekly totals, recovery guidance and goals.

pub mod goals;
pub mod recovery;
pub mod weekly;

pub use goals::{
    clamp_digits, closeness_pct, match_score, safe_int, similar_users, GoalError, GoalField,
    GoalForm, GoalPlan, GoalTargets, SimilarUser, MAX_GOAL_DIGITS,
};
pub use recovery::{recommendation, rough_streak, Recommendation, RecoveryDay, RECOVERY_TIPS};
pub use weekly::{week_totals, DayActivity, WeekTotals};
