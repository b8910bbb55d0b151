use crate::Int;

/// Stock levels in `[SAFE_LOW, SAFE_HIGH]` earn the band reward.
pub const SAFE_LOW: Int = 20;
pub const SAFE_HIGH: Int = 80;
/// Stock level with the peak reward.
pub const TARGET_STOCK: Int = 50;
pub const PEAK_REWARD: f64 = 30.0;
/// Cost per bike moved.
pub const MOVE_COST: f64 = 0.2;

/// Low-stock penalty reference used by the tabular step.
pub const TABULAR_LOW_REFERENCE: Int = 30;
/// Low-stock penalty reference used by the index-based step.
pub const DQN_LOW_REFERENCE: Int = 20;

/// Linear cost of moving `bikes` in either direction.
pub fn move_cost(bikes: Int) -> f64 {
    -MOVE_COST * bikes.abs() as f64
}

/// Reward for ending an hour at `stock`. Both band edges are inclusive.
pub fn hourly_reward(stock: Int, low_reference: Int) -> f64 {
    if stock > SAFE_HIGH {
        -(stock - SAFE_HIGH) as f64
    } else if stock < SAFE_LOW {
        -(low_reference - stock) as f64
    } else {
        PEAK_REWARD - (stock - TARGET_STOCK).abs() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(hourly_reward(80, TABULAR_LOW_REFERENCE), 0.0);
        assert_eq!(hourly_reward(20, TABULAR_LOW_REFERENCE), 0.0);
        assert_eq!(hourly_reward(20, DQN_LOW_REFERENCE), 0.0);
        assert_eq!(hourly_reward(50, TABULAR_LOW_REFERENCE), 30.0);
    }

    #[test]
    fn test_penalties() {
        assert_eq!(hourly_reward(81, TABULAR_LOW_REFERENCE), -1.0);
        assert_eq!(hourly_reward(100, DQN_LOW_REFERENCE), -20.0);
        assert_eq!(hourly_reward(19, TABULAR_LOW_REFERENCE), -11.0);
        assert_eq!(hourly_reward(19, DQN_LOW_REFERENCE), -1.0);
        assert_eq!(hourly_reward(-5, TABULAR_LOW_REFERENCE), -35.0);
    }

    #[test]
    fn test_move_cost() {
        assert_eq!(move_cost(0), 0.0);
        assert!((move_cost(-15) + 3.0).abs() < 1e-12);
        assert!((move_cost(5) + 1.0).abs() < 1e-12);
    }
}
