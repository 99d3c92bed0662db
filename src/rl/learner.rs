use super::config::QConfig;
use super::state::EncodedState;
use super::table::ValueTable;

/// One observed step of an episode, consumed immediately by the learner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: EncodedState,
    pub action: usize,
    pub reward: f64,
    pub next_state: EncodedState,
    /// Episode ended on this step. Informational for callers; the update
    /// bootstraps from `next_state` either way.
    pub terminal: bool,
}

/// One-step tabular Q-learning
///
/// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLearner {
    pub learning_rate: f64,
    pub discount_factor: f64,
}

impl QLearner {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
        }
    }

    pub fn from_config(config: &QConfig) -> Self {
        Self::new(config.learning_rate, config.discount_factor)
    }

    /// Apply the Bellman update for one transition and return the new value.
    ///
    /// The next state's estimate is bootstrapped even on terminal transitions;
    /// terminal states are never updated themselves, so they stay near zero.
    pub fn update(
        &self,
        table: &mut ValueTable,
        old_state: EncodedState,
        action: usize,
        reward: f64,
        new_state: EncodedState,
    ) -> f64 {
        // Insert both keys before reading either
        table.entry(old_state);
        let next_max = table.max_value(new_state);

        let target = reward + self.discount_factor * next_max;
        let values = table.entry(old_state);
        values[action] += self.learning_rate * (target - values[action]);
        values[action]
    }

    /// Convenience wrapper over [`QLearner::update`]
    pub fn learn(&self, table: &mut ValueTable, transition: &Transition) -> f64 {
        self.update(
            table,
            transition.state,
            transition.action,
            transition.reward,
            transition.next_state,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(idx: usize) -> EncodedState {
        let mut flags = [false; 11];
        flags[idx] = true;
        EncodedState::from_array(flags)
    }

    #[test]
    fn test_first_update_moves_by_alpha_times_reward() {
        let learner = QLearner::new(0.05, 0.95);
        let mut table = ValueTable::new();

        let value = learner.update(&mut table, s(0), 2, 10.0, s(1));

        assert_eq!(value, 0.05 * 10.0);
        assert_eq!(table.get(&s(0)), Some(&[0.0, 0.0, 0.05 * 10.0]));
        assert_eq!(table.get(&s(1)), Some(&[0.0, 0.0, 0.0]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_update_bootstraps_from_next_state() {
        let learner = QLearner::new(0.5, 0.9);
        let mut table = ValueTable::new();
        table.insert(s(1), [1.0, 4.0, 2.0]);

        let value = learner.update(&mut table, s(0), 0, 1.0, s(1));

        // 0 + 0.5 * (1 + 0.9 * 4 - 0)
        assert!((value - 2.3).abs() < 1e-12);
        assert_eq!(table.get(&s(1)), Some(&[1.0, 4.0, 2.0]));
    }

    #[test]
    fn test_repeated_updates_converge_monotonically() {
        let learner = QLearner::new(0.05, 0.95);
        let mut table = ValueTable::new();
        table.insert(s(1), [3.0, -1.0, 0.0]);
        let fixed_point: f64 = -10.0 + 0.95 * 3.0;

        let mut previous_gap = fixed_point.abs();
        for _ in 0..500 {
            let value = learner.update(&mut table, s(0), 1, -10.0, s(1));
            let gap = (fixed_point - value).abs();
            assert!(gap < previous_gap);
            assert!(value >= fixed_point);
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-6);
    }

    #[test]
    fn test_terminal_flag_does_not_mask_bootstrap() {
        let learner = QLearner::new(0.5, 0.9);
        let mut ongoing = ValueTable::new();
        ongoing.insert(s(1), [2.0, 0.0, 0.0]);
        let mut ending = ongoing.clone();

        let transition = Transition {
            state: s(0),
            action: 1,
            reward: -10.0,
            next_state: s(1),
            terminal: false,
        };
        let a = learner.learn(&mut ongoing, &transition);
        let b = learner.learn(
            &mut ending,
            &Transition {
                terminal: true,
                ..transition
            },
        );

        // 0.5 * (-10 + 0.9 * 2)
        assert!((a - -4.1).abs() < 1e-12);
        assert_eq!(a, b);
        assert_eq!(ongoing, ending);
    }

    #[test]
    fn test_self_loop_update() {
        let learner = QLearner::new(0.1, 0.5);
        let mut table = ValueTable::new();

        let first = learner.learn(
            &mut table,
            &Transition {
                state: s(3),
                action: 0,
                reward: 2.0,
                next_state: s(3),
                terminal: false,
            },
        );
        assert!((first - 0.2).abs() < 1e-12);

        // max(Q(s3)) is now 0.2: 0.2 + 0.1 * (2 + 0.5 * 0.2 - 0.2)
        let second = learner.update(&mut table, s(3), 0, 2.0, s(3));
        assert!((second - 0.39).abs() < 1e-12);
    }
}
