//! Task scoring policies
//!
//! Scores rank merged tasks (ascending). The random scorer is a placeholder
//! that carries no signal; the due-date scorer is a deterministic
//! alternative.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rand::Rng;

use crate::core::{ConfigError, SCORE_UPPER_BOUND, TaskScorer};
use crate::remote::RawTask;

/// Uniformly random score in `[0, SCORE_UPPER_BOUND)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomScorer;

impl TaskScorer for RandomScorer {
    fn score(&self, _task: &RawTask) -> i64 {
        rand::thread_rng().gen_range(0..SCORE_UPPER_BOUND)
    }
}

/// Urgency score from due date and priority.
///
/// Ten points per day until due (overdue counts as today, capped at four
/// weeks), plus two points per priority level below urgent. Tasks without a
/// due date sort after every dated task. Always within `[0, SCORE_UPPER_BOUND)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DueDateScorer {
    today: Option<NaiveDate>,
}

impl DueDateScorer {
    /// Days beyond which due dates stop making a difference.
    const HORIZON_DAYS: i64 = 28;

    /// Base score of undated tasks.
    const UNDATED: i64 = 290;

    /// Scorer measuring against the current UTC date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scorer measuring against a fixed date.
    pub fn as_of(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }
}

impl TaskScorer for DueDateScorer {
    fn score(&self, task: &RawTask) -> i64 {
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        let base = match task.due_date() {
            Some(due) => (due - today).num_days().clamp(0, Self::HORIZON_DAYS) * 10,
            None => Self::UNDATED,
        };
        let priority_penalty = (4 - i64::from(task.priority.clamp(1, 4))) * 2;
        base + priority_penalty
    }
}

/// Selectable scoring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorePolicy {
    /// [`RandomScorer`].
    #[default]
    Random,
    /// [`DueDateScorer`].
    DueDate,
}

impl ScorePolicy {
    /// Instantiate the scorer.
    pub fn build(self) -> Box<dyn TaskScorer> {
        match self {
            Self::Random => Box::new(RandomScorer),
            Self::DueDate => Box::new(DueDateScorer::new()),
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random",
            Self::DueDate => "due-date",
        })
    }
}

impl FromStr for ScorePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "due-date" | "due_date" | "due" => Ok(Self::DueDate),
            _ => Err(ConfigError::InvalidValue {
                key: "scorer",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{RawDue, RemoteId};

    fn task(due: Option<&str>, priority: u8) -> RawTask {
        RawTask {
            id: RemoteId::new("t"),
            content: "task".into(),
            description: String::new(),
            project_id: None,
            labels: vec!["Work".into()],
            due: due.map(|date| RawDue { date: date.into() }),
            priority,
        }
    }

    #[test]
    fn test_random_scores_stay_in_range() {
        let scorer = RandomScorer;
        let t = task(None, 1);
        for _ in 0..1000 {
            let score = scorer.score(&t);
            assert!((0..SCORE_UPPER_BOUND).contains(&score));
        }
    }

    #[test]
    fn test_due_date_orders_by_urgency() {
        let scorer = DueDateScorer::as_of(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());

        let overdue = scorer.score(&task(Some("2026-05-01"), 1));
        let today = scorer.score(&task(Some("2026-05-10"), 1));
        let next_week = scorer.score(&task(Some("2026-05-17"), 1));
        let far = scorer.score(&task(Some("2027-01-01"), 1));
        let undated = scorer.score(&task(None, 1));

        assert_eq!(overdue, today);
        assert!(today < next_week);
        assert!(next_week < far);
        assert!(far < undated);
        assert!(undated < SCORE_UPPER_BOUND);
    }

    #[test]
    fn test_priority_breaks_ties() {
        let scorer = DueDateScorer::as_of(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());

        let urgent = scorer.score(&task(Some("2026-05-12"), 4));
        let normal = scorer.score(&task(Some("2026-05-12"), 1));
        assert_eq!(urgent, 20);
        assert_eq!(normal, 26);
    }

    #[test]
    fn test_out_of_range_priority_is_clamped() {
        let scorer = DueDateScorer::as_of(NaiveDate::from_ymd_opt(2026, 5, 10).unwrap());
        assert_eq!(scorer.score(&task(None, 0)), 296);
        assert_eq!(scorer.score(&task(None, 9)), 290);
    }

    #[test]
    fn test_closure_is_a_scorer() {
        let by_length = |t: &RawTask| t.content.len() as i64;
        assert_eq!(by_length.score(&task(None, 1)), 4);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("random".parse::<ScorePolicy>().unwrap(), ScorePolicy::Random);
        assert_eq!(" Due-Date ".parse::<ScorePolicy>().unwrap(), ScorePolicy::DueDate);
        assert!("smart".parse::<ScorePolicy>().is_err());
        assert_eq!(ScorePolicy::DueDate.to_string(), "due-date");
    }
}
