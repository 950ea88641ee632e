//! Property-based tests for validation and the state machine.

use std::collections::HashMap;

use proptest::prelude::*;
use taskforge::{
    CounterValidator, StoreFileValidator, TaskDraft, TaskRecord, TaskStatus, TaskType,
    TaskValidator,
};

fn any_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::Running),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Failed),
        Just(TaskStatus::Canceled),
    ]
}

fn counter_params(x: i64, y: i64) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert("x".to_string(), x.to_string());
    params.insert("y".to_string(), y.to_string());
    params
}

proptest! {
    #[test]
    fn counter_validator_accepts_exactly_x_less_than_y(x in any::<i64>(), y in any::<i64>()) {
        let result = CounterValidator.validate(&counter_params(x, y));
        prop_assert_eq!(result.is_ok(), x < y);
    }

    #[test]
    fn counter_validator_rejects_non_integer_values(raw in "[a-zA-Z ]{1,12}") {
        prop_assume!(raw.parse::<i64>().is_err());
        let mut params = counter_params(1, 10);
        params.insert("x".to_string(), raw);
        prop_assert!(CounterValidator.validate(&params).is_err());
    }

    #[test]
    fn store_file_validator_rejects_any_parameter(
        key in "[a-z]{1,8}",
        value in "[a-z0-9]{0,8}",
    ) {
        let mut params = HashMap::new();
        params.insert(key, value);
        prop_assert!(StoreFileValidator.validate(&params).is_err());
    }

    #[test]
    fn transitions_never_self_loop_or_reenter_pending(
        from in any_status(),
        to in any_status(),
    ) {
        if from.can_transition_to(&to) {
            prop_assert_ne!(from, to);
            prop_assert_ne!(to, TaskStatus::Pending);
            prop_assert_ne!(from, TaskStatus::Completed);
        }
    }

    #[test]
    fn only_running_reaches_completed_or_failed(from in any_status()) {
        if from != TaskStatus::Running {
            prop_assert!(!from.can_transition_to(&TaskStatus::Completed));
            prop_assert!(!from.can_transition_to(&TaskStatus::Failed));
        }
    }

    #[test]
    fn new_records_always_start_pending(name in ".{0,40}", x in any::<i64>(), y in any::<i64>()) {
        let draft = TaskDraft::new(name.clone(), TaskType::Counter)
            .with_parameter("x", x.to_string())
            .with_parameter("y", y.to_string());
        let record = TaskRecord::new(draft);

        prop_assert_eq!(record.status, TaskStatus::Pending);
        prop_assert_eq!(record.progress, 0);
        prop_assert_eq!(record.name, name);
        prop_assert!(record.result_location.is_none());
        prop_assert_eq!(record.id.len(), 36);
    }
}
