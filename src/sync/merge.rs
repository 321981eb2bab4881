//! Delta merger
//!
//! Folds a fetched delta into the accumulated collections. Merging appends:
//! nothing already accumulated is removed or rewritten, so a full resync
//! repeats every entry and upstream deletions are never reflected. Use
//! [`MergePolicy::ReplaceOnFullSync`] to start over on full resyncs instead.

use std::fmt;
use std::str::FromStr;

use super::content::{Label, Task};
use crate::core::{ConfigError, TaskScorer};
use crate::remote::{RawLabel, RawTask};

/// How a delta combines with accumulated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Always append (compatible default).
    #[default]
    Append,
    /// Clear labels and tasks before merging a full-resync delta.
    ReplaceOnFullSync,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Append => "append",
            Self::ReplaceOnFullSync => "replace-on-full-sync",
        })
    }
}

impl FromStr for MergePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace-on-full-sync" | "replace_on_full_sync" | "replace" => {
                Ok(Self::ReplaceOnFullSync)
            }
            _ => Err(ConfigError::InvalidValue {
                key: "merge policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Append the favorite labels of `new_raw`, sorted by order, to `old`.
pub fn merge_labels(mut old: Vec<Label>, new_raw: &[RawLabel]) -> Vec<Label> {
    let mut favorites: Vec<&RawLabel> = new_raw.iter().filter(|l| l.is_favorite).collect();
    favorites.sort_by_key(|l| l.item_order);

    old.extend(favorites.into_iter().map(Label::from_raw));
    old
}

/// Append the tasks of `new_raw` that carry a label in `labels`.
///
/// The appended tasks are scored with `scorer` and sorted ascending by
/// score. With no labels there is nothing a task could be relevant to, so
/// the result is empty and `old` is discarded.
pub fn merge_tasks<S>(
    mut old: Vec<Task>,
    new_raw: &[RawTask],
    labels: &[Label],
    scorer: &S,
) -> Vec<Task>
where
    S: TaskScorer + ?Sized,
{
    if labels.is_empty() {
        return Vec::new();
    }

    let mut matching: Vec<Task> = new_raw
        .iter()
        .filter(|task| task.has_any_label(labels.iter().map(|l| l.name.as_str())))
        .map(|task| Task::from_raw(task, scorer.score(task)))
        .collect();
    matching.sort_by_key(|task| task.score);

    old.extend(matching);
    old
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteId;
    use crate::sync::RandomScorer;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn raw_label(name: &str, favorite: bool, order: i64) -> RawLabel {
        RawLabel {
            name: name.into(),
            is_favorite: favorite,
            item_order: order,
        }
    }

    fn raw_task(id: &str, labels: &[&str]) -> RawTask {
        RawTask {
            id: RemoteId::new(id),
            content: format!("task {}", id),
            description: String::new(),
            project_id: None,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            due: None,
            priority: 1,
        }
    }

    fn label(name: &str, order: i64) -> Label {
        Label {
            name: name.into(),
            order,
        }
    }

    fn by_id(task: &RawTask) -> i64 {
        task.id.as_str().parse().unwrap_or(0)
    }

    #[test]
    fn test_merge_labels_keeps_favorites_sorted() {
        let old = vec![label("Existing", 9)];
        let new_raw = vec![
            raw_label("C", true, 3),
            raw_label("Skip", false, 0),
            raw_label("A", true, 1),
            raw_label("B", true, 2),
        ];

        let merged = merge_labels(old, &new_raw);
        let names: Vec<&str> = merged.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Existing", "A", "B", "C"]);
        assert_eq!(merged[1].order, 1);
    }

    #[test]
    fn test_merge_labels_appends_duplicates() {
        let first = merge_labels(Vec::new(), &[raw_label("Work", true, 1)]);
        let second = merge_labels(first, &[raw_label("Work", true, 1)]);
        assert_eq!(second, vec![label("Work", 1), label("Work", 1)]);
    }

    #[test]
    fn test_merge_labels_sort_is_stable() {
        let merged = merge_labels(
            Vec::new(),
            &[raw_label("first", true, 5), raw_label("second", true, 5)],
        );
        assert_eq!(merged[0].name, "first");
        assert_eq!(merged[1].name, "second");
    }

    #[test]
    fn test_merge_tasks_without_labels_is_empty() {
        let old = vec![Task::from_raw(&raw_task("1", &["Work"]), 1)];
        let new_raw = vec![raw_task("2", &["Work"])];

        let merged = merge_tasks(old, &new_raw, &[], &RandomScorer);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_tasks_filters_by_label_and_sorts_by_score() {
        let labels = vec![label("Work", 1), label("Home", 2)];
        let new_raw = vec![
            raw_task("30", &["Work"]),
            raw_task("10", &["Other", "Home"]),
            raw_task("5", &["Other"]),
            raw_task("20", &[]),
            raw_task("15", &["Work", "Home"]),
        ];

        let merged = merge_tasks(Vec::new(), &new_raw, &labels, &by_id);
        let ids: Vec<&str> = merged.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "15", "30"]);
        assert_eq!(merged[0].score, 10);
    }

    #[test]
    fn test_merge_tasks_appends_after_old() {
        let labels = vec![label("Work", 1)];
        let old = vec![Task::from_raw(&raw_task("99", &["Work"]), 99)];

        let merged = merge_tasks(old, &[raw_task("1", &["Work"])], &labels, &by_id);
        let ids: Vec<&str> = merged.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["99", "1"]);
    }

    #[test]
    fn test_merge_properties_on_random_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let names = ["Work", "Home", "Errand", "Someday", "Read"];

        for _ in 0..200 {
            let old_labels: Vec<Label> = (0..rng.gen_range(0..4))
                .map(|i| label(names[i % names.len()], i as i64))
                .collect();
            let raw_labels: Vec<RawLabel> = (0..rng.gen_range(0..8))
                .map(|_| {
                    raw_label(
                        names[rng.gen_range(0..names.len())],
                        rng.gen_bool(0.5),
                        rng.gen_range(-5..20),
                    )
                })
                .collect();
            let favorites = raw_labels.iter().filter(|l| l.is_favorite).count();

            let merged = merge_labels(old_labels.clone(), &raw_labels);
            assert_eq!(merged.len(), old_labels.len() + favorites);
            assert_eq!(&merged[..old_labels.len()], &old_labels[..]);
            let suffix = &merged[old_labels.len()..];
            assert!(suffix.windows(2).all(|w| w[0].order <= w[1].order));

            let raw_tasks: Vec<RawTask> = (0..rng.gen_range(0..10))
                .map(|i| {
                    let picked: Vec<&str> = names
                        .iter()
                        .copied()
                        .filter(|_| rng.gen_bool(0.3))
                        .collect();
                    raw_task(&i.to_string(), &picked)
                })
                .collect();
            let old_tasks = vec![Task::from_raw(&raw_task("old", &["Work"]), 500)];

            let tasks = merge_tasks(old_tasks.clone(), &raw_tasks, &merged, &RandomScorer);
            if merged.is_empty() {
                assert!(tasks.is_empty());
                continue;
            }
            assert_eq!(tasks[0], old_tasks[0]);
            let suffix = &tasks[1..];
            assert!(suffix.windows(2).all(|w| w[0].score <= w[1].score));
            assert!(suffix.iter().all(|t| {
                t.labels
                    .iter()
                    .any(|name| merged.iter().any(|l| &l.name == name))
            }));
        }
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("append".parse::<MergePolicy>().unwrap(), MergePolicy::Append);
        assert_eq!(
            "replace-on-full-sync".parse::<MergePolicy>().unwrap(),
            MergePolicy::ReplaceOnFullSync
        );
        assert!("merge".parse::<MergePolicy>().is_err());
        assert_eq!(MergePolicy::ReplaceOnFullSync.to_string(), "replace-on-full-sync");
    }
}
