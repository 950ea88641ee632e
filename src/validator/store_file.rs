//! Parameter validation for file storage tasks.

use std::collections::HashMap;

use crate::error::TaskError;
use crate::types::task::TaskType;

use super::TaskValidator;

/// Requires an empty parameter map; file storage tasks take none.
pub struct StoreFileValidator;

impl TaskValidator for StoreFileValidator {
    fn supported_type(&self) -> TaskType {
        TaskType::StoreFile
    }

    fn validate(&self, parameters: &HashMap<String, String>) -> Result<(), TaskError> {
        if !parameters.is_empty() {
            return Err(TaskError::invalid_input(
                "file storage tasks take no parameters",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_empty_parameters() {
        assert!(StoreFileValidator.validate(&HashMap::new()).is_ok());
    }

    #[test]
    fn rejects_any_parameter() {
        let mut parameters = HashMap::new();
        parameters.insert("a".to_string(), "b".to_string());
        let err = StoreFileValidator.validate(&parameters).unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput { .. }));
    }
}
