//! Progress Statistics
//!
//! Derived counts over a roadmap's subtopics. Never stored.

use serde::{Deserialize, Serialize};

use super::roadmap::{SubTopic, Topic};

/// Completion counts for a whole roadmap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total: usize,
    pub completed: usize,
    /// round(100 * completed / total), 0 for an empty roadmap
    pub percentage: u8,
}

/// Completion counts for a single topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicProgress {
    pub completed: usize,
    pub total: usize,
}

impl TopicProgress {
    pub fn of(subtopics: &[SubTopic]) -> Self {
        Self {
            completed: subtopics.iter().filter(|s| s.completed).count(),
            total: subtopics.len(),
        }
    }

    /// All subtopics done; an empty topic is never complete
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Sum subtopic counts over every topic of `data`
pub fn compute_progress(data: &[Topic]) -> ProgressStats {
    let (total, completed) = data
        .iter()
        .map(|topic| TopicProgress::of(&topic.subtopics))
        .fold((0, 0), |(total, completed), p| {
            (total + p.total, completed + p.completed)
        });

    ProgressStats {
        total,
        completed,
        percentage: percentage(completed, total),
    }
}

/// Integer round-half-up of 100 * completed / total
fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * completed + total) / (2 * total);
    rounded.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str, done: &[bool]) -> Topic {
        Topic::new(
            name,
            done.iter()
                .enumerate()
                .map(|(i, d)| SubTopic::new(format!("{}-{}", name, i), "").completed(*d))
                .collect(),
        )
    }

    #[test]
    fn test_empty_roadmap() {
        assert_eq!(
            compute_progress(&[]),
            ProgressStats { total: 0, completed: 0, percentage: 0 }
        );
    }

    #[test]
    fn test_topics_without_subtopics() {
        let stats = compute_progress(&[topic("A", &[]), topic("B", &[])]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percentage, 0);
    }

    #[test]
    fn test_counts_across_topics() {
        let data = vec![topic("A", &[true, false]), topic("B", &[true, true, false])];
        let stats = compute_progress(&data);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.percentage, 60);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(1, 201), 0);
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn test_order_independent() {
        let a = topic("A", &[true, false, false]);
        let b = topic("B", &[true]);
        let c = topic("C", &[false, true]);
        let forward = compute_progress(&[a.clone(), b.clone(), c.clone()]);
        let reversed = compute_progress(&[c, b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_completed_never_exceeds_total() {
        for mask in 0u32..64 {
            let done: Vec<bool> = (0..6).map(|bit| mask & (1 << bit) != 0).collect();
            let stats = compute_progress(&[topic("A", &done[..2]), topic("B", &done[2..])]);
            assert!(stats.completed <= stats.total);
            assert!(stats.percentage <= 100);
        }
    }

    #[test]
    fn test_topic_progress_completion() {
        assert!(!TopicProgress::of(&[]).is_complete());
        assert!(TopicProgress::of(&topic("A", &[true, true]).subtopics).is_complete());
        assert!(!TopicProgress::of(&topic("A", &[true, false]).subtopics).is_complete());
    }
}
