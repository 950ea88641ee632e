//! Per-type parameter validation and the validator registry.
//!
//! Every task type has exactly one [`TaskValidator`] that checks a
//! parameter map before a record is created, and again before an update
//! is persisted. The [`ValidatorRegistry`] is built once at start-up from
//! the full set of implementations; failing to resolve a validator for a
//! type the enum permits is a deployment invariant violation, surfaced as
//! the fatal [`TaskError::Internal`] kind rather than a client error.

pub mod counter;
pub mod store_file;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TaskError;
use crate::types::task::TaskType;

pub use counter::CounterValidator;
pub use store_file::StoreFileValidator;

/// Checks that a task type's parameters are well-formed.
pub trait TaskValidator: Send + Sync {
    /// The task type this validator applies to.
    fn supported_type(&self) -> TaskType;

    /// Validates a parameter map.
    ///
    /// # Errors
    ///
    /// [`TaskError::InvalidInput`] describing the first rejected
    /// parameter.
    fn validate(&self, parameters: &HashMap<String, String>) -> Result<(), TaskError>;
}

impl std::fmt::Debug for dyn TaskValidator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskValidator")
            .field("supported_type", &self.supported_type())
            .finish()
    }
}

/// Fixed mapping from task type to its validator, built once at start-up.
///
/// # Examples
///
/// ```
/// use taskforge::{TaskType, ValidatorRegistry};
///
/// let registry = ValidatorRegistry::builtin();
/// assert!(registry.resolve(TaskType::Counter).is_ok());
/// assert!(registry.resolve(TaskType::StoreFile).is_ok());
/// ```
pub struct ValidatorRegistry {
    validators: HashMap<TaskType, Arc<dyn TaskValidator>>,
}

impl ValidatorRegistry {
    /// Builds the registry from the full set of validator implementations.
    /// A later validator for the same type replaces an earlier one.
    pub fn new<I>(validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn TaskValidator>>,
    {
        Self {
            validators: validators
                .into_iter()
                .map(|validator| (validator.supported_type(), validator))
                .collect(),
        }
    }

    /// Registry covering every built-in task type.
    pub fn builtin() -> Self {
        Self::new([
            Arc::new(CounterValidator) as Arc<dyn TaskValidator>,
            Arc::new(StoreFileValidator) as Arc<dyn TaskValidator>,
        ])
    }

    /// Resolves the validator for `task_type`.
    ///
    /// # Errors
    ///
    /// [`TaskError::Internal`] if no validator is registered for a type
    /// the enum permits -- a start-up misconfiguration, not a client
    /// error.
    pub fn resolve(&self, task_type: TaskType) -> Result<&dyn TaskValidator, TaskError> {
        match self.validators.get(&task_type) {
            Some(validator) => Ok(validator.as_ref()),
            None => {
                tracing::error!(task_type = %task_type, "no validator registered");
                Err(TaskError::internal(format!(
                    "no validator registered for task type {task_type}"
                )))
            },
        }
    }
}
