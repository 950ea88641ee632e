//! Parameter validation for counter tasks.

use std::collections::HashMap;

use crate::error::TaskError;
use crate::types::task::TaskType;

use super::TaskValidator;

/// Requires integer parameters `x` and `y` with `x < y`.
pub struct CounterValidator;

impl TaskValidator for CounterValidator {
    fn supported_type(&self) -> TaskType {
        TaskType::Counter
    }

    fn validate(&self, parameters: &HashMap<String, String>) -> Result<(), TaskError> {
        let (Some(x), Some(y)) = (parameters.get("x"), parameters.get("y")) else {
            return Err(TaskError::invalid_input(
                "missing required parameters x and y",
            ));
        };

        let x: i64 = x
            .parse()
            .map_err(|_| TaskError::invalid_input("x and y must be integers"))?;
        let y: i64 = y
            .parse()
            .map_err(|_| TaskError::invalid_input("x and y must be integers"))?;

        if x >= y {
            return Err(TaskError::invalid_input("x must be less than y"));
        }

        Ok(())
    }
}
