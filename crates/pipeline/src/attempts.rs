use greenlight_core::style_deviation::{select_best_attempt, AttemptChoice};

/// Index of the best-scoring attempt, or `None` when there are none.
///
/// Attempts are compared pairwise in order with [`select_best_attempt`],
/// so an earlier attempt keeps its place on ties.
pub fn choose_attempt(scores: &[f64]) -> Option<usize> {
    let (&first, rest) = scores.split_first()?;
    let mut best = 0;
    let mut best_score = first;

    for (offset, &candidate) in rest.iter().enumerate() {
        let index = offset + 1;
        match select_best_attempt(best_score, candidate) {
            AttemptChoice::Second => {
                tracing::debug!(
                    previous = best,
                    chosen = index,
                    previous_score = best_score,
                    score = candidate,
                    "Later attempt preferred",
                );
                best = index;
                best_score = candidate;
            }
            AttemptChoice::First => {}
        }
    }

    tracing::info!(chosen = best, score = best_score, attempts = scores.len(), "Attempt chosen");
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_attempts() {
        assert_eq!(choose_attempt(&[]), None);
    }

    #[test]
    fn single_attempt_wins() {
        assert_eq!(choose_attempt(&[0.1]), Some(0));
    }

    #[test]
    fn higher_later_score_wins() {
        assert_eq!(choose_attempt(&[0.55, 0.72]), Some(1));
        assert_eq!(choose_attempt(&[0.72, 0.55]), Some(0));
    }

    #[test]
    fn tie_keeps_earlier_attempt() {
        assert_eq!(choose_attempt(&[0.7, 0.7, 0.7]), Some(0));
    }

    #[test]
    fn folds_across_many_attempts() {
        assert_eq!(choose_attempt(&[0.3, 0.5, 0.9, 0.6]), Some(2));
    }
}
