//! Completion badges for a day

use std::fmt::{Display, Formatter};

use crate::todo::Todo;

/// Ratio from which a day earns [`Badge::Great`]
pub const GREAT_THRESHOLD: f64 = 0.9;
/// Ratio from which a day earns [`Badge::Good`]
pub const GOOD_THRESHOLD: f64 = 0.6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    Great,
    Good,
}

impl Display for Badge {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Badge::Great => write!(f, "Great"),
            Badge::Good => write!(f, "Good"),
        }
    }
}

/// The badge a day earns from the share of its todos that are completed.
///
/// Days without any todo never earn a badge.
pub fn score(todos: &[Todo]) -> Option<Badge> {
    if todos.is_empty() {
        return None;
    }
    let completed = todos.iter().filter(|t| t.completed()).count();
    let ratio = completed as f64 / todos.len() as f64;

    if ratio >= GREAT_THRESHOLD {
        Some(Badge::Great)
    } else if ratio >= GOOD_THRESHOLD {
        Some(Badge::Good)
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn todos(completed: usize, total: usize) -> Vec<Todo> {
        (0..total)
            .map(|i| {
                let mut t = Todo::new(format!("task {}", i));
                if i < completed {
                    t.toggle();
                }
                t
            })
            .collect()
    }

    #[test]
    fn tiers() {
        assert_eq!(score(&todos(9, 10)), Some(Badge::Great));
        assert_eq!(score(&todos(10, 10)), Some(Badge::Great));
        assert_eq!(score(&todos(1, 1)), Some(Badge::Great));
        assert_eq!(score(&todos(6, 10)), Some(Badge::Good));
        assert_eq!(score(&todos(8, 10)), Some(Badge::Good));
        assert_eq!(score(&todos(2, 3)), Some(Badge::Good));
        assert_eq!(score(&todos(5, 10)), None);
        assert_eq!(score(&todos(0, 1)), None);
        assert_eq!(score(&[]), None);
    }

    #[test]
    fn scoring_is_repeatable() {
        let day = todos(7, 10);
        assert_eq!(score(&day), score(&day));
    }
}
