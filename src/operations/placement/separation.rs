use tracing::{debug, info};

use crate::error::{PolicyError, Result};
use crate::host::Confirm;
use crate::math::grid::round_to_grid;
use crate::model::{Extent, PlacementPolicy};

/// Computes the longitudinal spacing between adjacent isocenters in a field
/// group, snapped to the coarse grid and bounded by the maximum-separation
/// policy.
///
/// Exceeding the cap thins the overlap between adjacent fields below the
/// clinical minimum, so truncation needs an explicit operator decision.
pub struct SeparationCalc<'a> {
    extent: Extent,
    count: usize,
    policy: &'a PlacementPolicy,
}

impl<'a> SeparationCalc<'a> {
    /// Creates a new `SeparationCalc` for a group of `count` isocenters over
    /// `extent`.
    #[must_use]
    pub fn new(extent: Extent, count: usize, policy: &'a PlacementPolicy) -> Self {
        Self {
            extent,
            count,
            policy,
        }
    }

    /// Executes the calculation.
    ///
    /// # Errors
    ///
    /// Returns an error if the separation exceeds the cap and the operator
    /// declines truncation (a user-initiated abort).
    pub fn execute(&self, confirm: &mut dyn Confirm) -> Result<f64> {
        // A single-isocenter group still spaces against a virtual second
        // isocenter so the formula stays defined.
        let divisor = self.count.max(2) - 1;
        let usable = self.policy.field_coverage - self.policy.min_overlap;
        #[allow(clippy::cast_precision_loss)]
        let separation = round_to_grid((self.extent.span() - usable) / divisor as f64);
        debug!(separation, span = self.extent.span(), "calculated isocenter separation");

        let cap = self.policy.separation_cap();
        if separation > cap {
            let message = format!(
                "Calculated isocenter separation {separation:.0} exceeds {cap:.0}, which \
                 reduces the overlap between adjacent fields. Truncate to {cap:.0}?"
            );
            if confirm.confirm(&message) {
                info!(cap, "isocenter separation truncated to the cap");
                return Ok(cap);
            }
            return Err(PolicyError::SeparationNotConfirmed { separation, cap }.into());
        }
        Ok(separation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::AutoConfirm;
    use crate::IsolisError;
    use approx::assert_relative_eq;

    #[test]
    fn three_isocenters_over_a_metre() {
        let policy = PlacementPolicy::default();
        let calc = SeparationCalc::new(Extent::new(500.0, -500.0), 3, &policy);
        let separation = calc.execute(&mut AutoConfirm(false)).unwrap();
        assert_relative_eq!(separation, 310.0);
        // The spacing identity: separation * (count - 1) + usable field
        // length reproduces the span within the grid tolerance.
        assert!((separation * 2.0 + 380.0 - 1000.0).abs() <= 10.0);
    }

    #[test]
    fn single_isocenter_uses_the_virtual_divisor() {
        let policy = PlacementPolicy::default();
        let calc = SeparationCalc::new(Extent::new(100.0, -200.0), 1, &policy);
        // Same result as a two-isocenter group: (300 - 380) / 1.
        let separation = calc.execute(&mut AutoConfirm(false)).unwrap();
        assert_relative_eq!(separation, -80.0);
    }

    #[test]
    fn oversized_separation_is_truncated_on_confirmation() {
        let policy = PlacementPolicy::default();
        let calc = SeparationCalc::new(Extent::new(600.0, -600.0), 3, &policy);
        let separation = calc.execute(&mut AutoConfirm(true)).unwrap();
        assert_relative_eq!(separation, 380.0);
    }

    #[test]
    fn declining_truncation_aborts() {
        let policy = PlacementPolicy::default();
        let calc = SeparationCalc::new(Extent::new(600.0, -600.0), 3, &policy);
        let result = calc.execute(&mut AutoConfirm(false));
        assert!(matches!(
            result,
            Err(IsolisError::Policy(PolicyError::SeparationNotConfirmed {
                ..
            }))
        ));
    }

    #[test]
    fn in_range_separation_never_prompts() {
        struct Panicking;
        impl Confirm for Panicking {
            fn confirm(&mut self, _message: &str) -> bool {
                unreachable!("confirmation must not be requested below the cap")
            }
        }
        let policy = PlacementPolicy::default();
        let calc = SeparationCalc::new(Extent::new(400.0, -400.0), 3, &policy);
        let separation = calc.execute(&mut Panicking).unwrap();
        assert_relative_eq!(separation, 210.0);
    }
}
