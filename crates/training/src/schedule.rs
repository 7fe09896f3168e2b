//! Evaluation schedule policy.

/// Whether the evaluation pass should run after this epoch's updates.
///
/// Every 5th epoch (0-indexed) evaluates, and the final epoch always does, so
/// the metrics and predictions carried into reporting reflect the fully
/// trained model regardless of how `total_epochs` aligns with the period.
pub fn should_evaluate(epoch: usize, total_epochs: usize) -> bool {
    epoch % 5 == 0 || epoch + 1 == total_epochs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fifth_epoch_evaluates() {
        for epoch in [0, 5, 10, 95] {
            assert!(should_evaluate(epoch, 100), "epoch {epoch}");
        }
        for epoch in [1, 2, 3, 4, 6, 93] {
            assert!(!should_evaluate(epoch, 100), "epoch {epoch}");
        }
    }

    #[test]
    fn final_epoch_always_evaluates() {
        // 7 epochs: 6 is neither 0 nor a multiple of 5, but it is last.
        assert!(should_evaluate(6, 7));
        assert!(should_evaluate(0, 1));
        assert!(should_evaluate(11, 12));
    }

    #[test]
    fn at_least_one_epoch_guarantees_an_evaluation() {
        for total in 1..50 {
            assert!(
                (0..total).any(|epoch| should_evaluate(epoch, total)),
                "no evaluation for {total} epochs"
            );
        }
    }
}
