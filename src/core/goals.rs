//! Financial goal tracking and contribution projections.

use crate::core::error::CoreError;
use serde::{Deserialize, Serialize};

/// A user-defined savings goal, as configured.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Goal {
    pub label: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub years: u32,
}

/// Derived progress and contribution figures for one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalOutlook {
    pub label: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub years: u32,
    /// Amount still to be saved, floored at zero for display.
    pub remaining_amount: f64,
    /// Progress towards the target, clamped to 0..=100.
    pub progress_pct: f64,
    /// Yearly investment needed to close the gap at the assumed return.
    pub yearly_contribution: f64,
}

impl Goal {
    pub fn outlook(&self, annual_rate: f64) -> Result<GoalOutlook, CoreError> {
        let yearly_contribution = required_contribution(
            self.target_amount,
            self.current_amount,
            self.years,
            annual_rate,
        )?;

        let progress_pct = if self.target_amount > 0.0 {
            ((self.current_amount / self.target_amount) * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Ok(GoalOutlook {
            label: self.label.clone(),
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            years: self.years,
            remaining_amount: (self.target_amount - self.current_amount).max(0.0),
            progress_pct,
            yearly_contribution,
        })
    }
}

/// Yearly contribution required to reach `target` from `current` in `years`,
/// assuming contributions compound at `annual_rate`.
///
/// A met goal or a zero horizon needs no further contribution. At a zero
/// rate the annuity factor is undefined and the gap is simply spread evenly
/// over the years.
pub fn required_contribution(
    target: f64,
    current: f64,
    years: u32,
    annual_rate: f64,
) -> Result<f64, CoreError> {
    if target < 0.0 {
        return Err(CoreError::goal(format!("target amount {target} is negative")));
    }
    if current < 0.0 {
        return Err(CoreError::goal(format!(
            "current amount {current} is negative"
        )));
    }
    if annual_rate < 0.0 {
        return Err(CoreError::goal(format!(
            "annual return rate {annual_rate} is negative"
        )));
    }

    let remaining = target - current;
    if remaining <= 0.0 || years == 0 {
        return Ok(0.0);
    }
    if annual_rate == 0.0 {
        return Ok(remaining / f64::from(years));
    }

    let growth = (1.0 + annual_rate).powi(years as i32);
    Ok(remaining * annual_rate / (growth - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_matches_annuity_inversion() {
        let contribution = required_contribution(100_000.0, 20_000.0, 5, 0.10).unwrap();
        // 80000 * 0.10 / (1.10^5 - 1)
        assert!((contribution - 13_103.80).abs() < 0.01, "{contribution}");
    }

    #[test]
    fn test_met_goal_needs_nothing() {
        assert_eq!(required_contribution(50_000.0, 50_000.0, 5, 0.10).unwrap(), 0.0);
        assert_eq!(required_contribution(50_000.0, 80_000.0, 5, 0.10).unwrap(), 0.0);
        assert_eq!(required_contribution(50_000.0, 10_000.0, 0, 0.10).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_rate_spreads_evenly() {
        assert_eq!(required_contribution(40_000.0, 0.0, 4, 0.0).unwrap(), 10_000.0);
    }

    #[test]
    fn test_negative_parameters_fail_fast() {
        assert!(required_contribution(-1.0, 0.0, 5, 0.10).is_err());
        assert!(required_contribution(100.0, -1.0, 5, 0.10).is_err());
        assert!(required_contribution(100.0, 0.0, 5, -0.10).is_err());
    }

    #[test]
    fn test_outlook_derives_progress_and_remaining() {
        let goal = Goal {
            label: "Retirement".to_string(),
            target_amount: 100_000.0,
            current_amount: 20_000.0,
            years: 5,
        };

        let outlook = goal.outlook(0.10).unwrap();
        assert_eq!(outlook.remaining_amount, 80_000.0);
        assert_eq!(outlook.progress_pct, 20.0);
        assert!(outlook.yearly_contribution > 0.0);
    }

    #[test]
    fn test_outlook_clamps_overachieved_goals() {
        let goal = Goal {
            label: "Car".to_string(),
            target_amount: 10_000.0,
            current_amount: 15_000.0,
            years: 2,
        };

        let outlook = goal.outlook(0.10).unwrap();
        assert_eq!(outlook.remaining_amount, 0.0);
        assert_eq!(outlook.progress_pct, 100.0);
        assert_eq!(outlook.yearly_contribution, 0.0);
    }

    #[test]
    fn test_outlook_with_zero_target() {
        let goal = Goal {
            label: "Empty".to_string(),
            target_amount: 0.0,
            current_amount: 0.0,
            years: 3,
        };

        let outlook = goal.outlook(0.10).unwrap();
        assert_eq!(outlook.progress_pct, 0.0);
        assert_eq!(outlook.yearly_contribution, 0.0);
    }
}
