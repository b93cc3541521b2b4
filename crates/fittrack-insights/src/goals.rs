//! Goal setting: form validation and "people with similar goals" matching.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest number a goal field accepts.
pub const MAX_GOAL_DIGITS: usize = 6;

/// Length of the goal window offered by default.
pub const DEFAULT_GOAL_DAYS: u64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalField {
    Steps,
    Minutes,
    CyclingMinutes,
    SwimmingMinutes,
    ExerciseMinutes,
    Calories,
}

impl GoalField {
    pub const ALL: [GoalField; 6] = [
        GoalField::Steps,
        GoalField::Minutes,
        GoalField::CyclingMinutes,
        GoalField::SwimmingMinutes,
        GoalField::ExerciseMinutes,
        GoalField::Calories,
    ];

    /// Field name as it appears in forms and error messages.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Minutes => "minutes",
            Self::CyclingMinutes => "cyclingMinutes",
            Self::SwimmingMinutes => "swimmingMinutes",
            Self::ExerciseMinutes => "exerciseMinutes",
            Self::Calories => "calories",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Steps => "Steps",
            Self::Minutes => "Minutes (Running)",
            Self::CyclingMinutes => "Minutes (Cycling)",
            Self::SwimmingMinutes => "Minutes (Swimming)",
            Self::ExerciseMinutes => "Minutes (Exercise)",
            Self::Calories => "Calories",
        }
    }

    /// Target assumed when the user leaves the field empty or at zero.
    pub fn default_target(&self) -> u32 {
        match self {
            Self::Steps => 8000,
            Self::Minutes => 120,
            Self::CyclingMinutes => 60,
            Self::SwimmingMinutes => 30,
            Self::ExerciseMinutes => 150,
            Self::Calories => 2200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("Please provide both start and end dates.")]
    MissingDates,

    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("End date must be on or after the start date.")]
    EndBeforeStart,

    #[error("These fields exceed 6 digits: {}", .0.join(", "))]
    TooManyDigits(Vec<&'static str>),
}

/// Raw goal form input. Numeric fields are kept as typed so length checks
/// see exactly what the user entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalForm {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub cycling_minutes: String,
    #[serde(default)]
    pub swimming_minutes: String,
    #[serde(default)]
    pub exercise_minutes: String,
    #[serde(default)]
    pub calories: String,
}

impl GoalForm {
    /// Empty form covering `today` through `today + 14 days`.
    pub fn starting_on(today: NaiveDate) -> Self {
        let end = today.checked_add_days(Days::new(DEFAULT_GOAL_DAYS)).unwrap_or(today);
        Self {
            start_date: today.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn starting_today() -> Self {
        Self::starting_on(Utc::now().date_naive())
    }

    pub fn field(&self, field: GoalField) -> &str {
        match field {
            GoalField::Steps => &self.steps,
            GoalField::Minutes => &self.minutes,
            GoalField::CyclingMinutes => &self.cycling_minutes,
            GoalField::SwimmingMinutes => &self.swimming_minutes,
            GoalField::ExerciseMinutes => &self.exercise_minutes,
            GoalField::Calories => &self.calories,
        }
    }

    pub fn set_field(&mut self, field: GoalField, value: impl Into<String>) {
        let value = value.into();
        match field {
            GoalField::Steps => self.steps = value,
            GoalField::Minutes => self.minutes = value,
            GoalField::CyclingMinutes => self.cycling_minutes = value,
            GoalField::SwimmingMinutes => self.swimming_minutes = value,
            GoalField::ExerciseMinutes => self.exercise_minutes = value,
            GoalField::Calories => self.calories = value,
        }
    }

    /// Check the form and turn it into a plan.
    ///
    /// An inverted date range is reported first, then over-long fields, then
    /// missing or malformed dates.
    pub fn validate(&self) -> Result<GoalPlan, GoalError> {
        let start = parse_date(&self.start_date);
        let end = parse_date(&self.end_date);

        if let (Some(Ok(start)), Some(Ok(end))) = (&start, &end) {
            if end < start {
                return Err(GoalError::EndBeforeStart);
            }
        }

        let offenders: Vec<&'static str> = GoalField::ALL
            .iter()
            .filter(|f| self.field(**f).chars().count() > MAX_GOAL_DIGITS)
            .map(|f| f.key())
            .collect();
        if !offenders.is_empty() {
            return Err(GoalError::TooManyDigits(offenders));
        }

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start?, end?),
            _ => return Err(GoalError::MissingDates),
        };

        let mut targets = GoalTargets::default();
        for field in GoalField::ALL {
            let value = self.field(field).trim();
            if !value.is_empty() {
                targets.set(field, safe_int(value).clamp(0, i64::from(u32::MAX)) as u32);
            }
        }

        Ok(GoalPlan {
            start,
            end,
            targets,
        })
    }
}

fn parse_date(value: &str) -> Option<Result<NaiveDate, GoalError>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| GoalError::InvalidDate(value.to_string())),
    )
}

/// Per-field targets. `None` means the field was left empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycling_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimming_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl GoalTargets {
    pub fn get(&self, field: GoalField) -> Option<u32> {
        match field {
            GoalField::Steps => self.steps,
            GoalField::Minutes => self.minutes,
            GoalField::CyclingMinutes => self.cycling_minutes,
            GoalField::SwimmingMinutes => self.swimming_minutes,
            GoalField::ExerciseMinutes => self.exercise_minutes,
            GoalField::Calories => self.calories,
        }
    }

    pub fn set(&mut self, field: GoalField, value: u32) {
        let slot = match field {
            GoalField::Steps => &mut self.steps,
            GoalField::Minutes => &mut self.minutes,
            GoalField::CyclingMinutes => &mut self.cycling_minutes,
            GoalField::SwimmingMinutes => &mut self.swimming_minutes,
            GoalField::ExerciseMinutes => &mut self.exercise_minutes,
            GoalField::Calories => &mut self.calories,
        };
        *slot = Some(value);
    }

    /// The target to compare against: the user's value, or the field default
    /// when it is empty or zero.
    pub fn baseline(&self, field: GoalField) -> u32 {
        match self.get(field) {
            Some(v) if v > 0 => v,
            _ => field.default_target(),
        }
    }
}

/// A validated goal window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalPlan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub targets: GoalTargets,
}

/// Strip non-digits and cut to [`MAX_GOAL_DIGITS`], as the form does while typing.
pub fn clamp_digits(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_GOAL_DIGITS)
        .collect()
}

/// Leading integer of `value`, or 0 when there is none.
pub fn safe_int(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// Percentage closeness of two values (100 = identical). A zero target
/// scores a neutral 50.
pub fn closeness_pct(actual: u32, target: u32) -> u32 {
    if target == 0 {
        return 50;
    }
    let (lo, hi) = (actual.min(target), actual.max(target));
    (f64::from(lo) / f64::from(hi) * 100.0).round() as u32
}

/// Mean closeness over the fields `candidate` sets, against `targets`'
/// baselines. 50 when the candidate sets nothing.
pub fn match_score(candidate: &GoalTargets, targets: &GoalTargets) -> u32 {
    let scores: Vec<u32> = GoalField::ALL
        .iter()
        .filter_map(|f| candidate.get(*f).map(|v| closeness_pct(v, targets.baseline(*f))))
        .collect();

    if scores.is_empty() {
        return 50;
    }
    let total: u32 = scores.iter().sum();
    (f64::from(total) / scores.len() as f64).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarUser {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    /// 0-100
    pub match_score: u32,
    pub highlights: Vec<String>,
    pub goals: GoalTargets,
}

struct Candidate {
    id: &'static str,
    name: &'static str,
    avatar_url: &'static str,
    highlights: &'static [&'static str],
    /// Multipliers applied to the user's baselines.
    scale: &'static [(GoalField, f64)],
}

const CANDIDATES: &[Candidate] = &[
    Candidate {
        id: "u1",
        name: "Taylor R.",
        avatar_url: "https://i.pravatar.cc/120?img=12",
        highlights: &["Morning runner", "Weekend long rides"],
        scale: &[
            (GoalField::Steps, 0.95),
            (GoalField::Minutes, 1.0),
            (GoalField::CyclingMinutes, 1.2),
            (GoalField::Calories, 0.95),
        ],
    },
    Candidate {
        id: "u2",
        name: "Jordan K.",
        avatar_url: "https://i.pravatar.cc/120?img=32",
        highlights: &["Swims twice a week", "Focus on active recovery"],
        scale: &[
            (GoalField::Steps, 0.9),
            (GoalField::Minutes, 0.85),
            (GoalField::SwimmingMinutes, 1.5),
            (GoalField::ExerciseMinutes, 0.9),
            (GoalField::Calories, 1.05),
        ],
    },
    Candidate {
        id: "u3",
        name: "Avery M.",
        avatar_url: "https://i.pravatar.cc/120?img=56",
        highlights: &["Loves HIIT circuits", "Evening walker"],
        scale: &[
            (GoalField::Steps, 1.1),
            (GoalField::Minutes, 1.1),
            (GoalField::ExerciseMinutes, 1.2),
        ],
    },
    Candidate {
        id: "u4",
        name: "Sam P.",
        avatar_url: "https://i.pravatar.cc/120?img=47",
        highlights: &["Balanced routine", "Weekend hikes"],
        scale: &[
            (GoalField::Steps, 1.0),
            (GoalField::Minutes, 0.9),
            (GoalField::CyclingMinutes, 0.8),
            (GoalField::SwimmingMinutes, 1.1),
            (GoalField::Calories, 1.0),
        ],
    },
];

/// Users whose goals resemble `targets`, best match first.
pub fn similar_users(targets: &GoalTargets) -> Vec<SimilarUser> {
    let mut users: Vec<SimilarUser> = CANDIDATES
        .iter()
        .map(|c| {
            let mut goals = GoalTargets::default();
            for (field, factor) in c.scale {
                let value = (f64::from(targets.baseline(*field)) * factor).round();
                goals.set(*field, value as u32);
            }
            SimilarUser {
                id: c.id.to_string(),
                name: c.name.to_string(),
                avatar_url: c.avatar_url.to_string(),
                match_score: match_score(&goals, targets),
                highlights: c.highlights.iter().map(|h| h.to_string()).collect(),
                goals,
            }
        })
        .collect();

    users.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    tracing::debug!("Ranked {} similar users", users.len());
    users
}
