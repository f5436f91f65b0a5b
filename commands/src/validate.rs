//! Request validation.
//!
//! Validation runs before any collaborator call. A request that fails it
//! never reaches the repository and never produces a notification.

use crate::error::CommandError;
use crate::types::{
    ByIdRequest, CreateCardRequest, CreateDeckRequest, UpdateCardRequest, UpdateDeckRequest,
};

/// A request that can be checked for well-formedness.
pub trait Validate {
    /// Check the request.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArgument`] describing the problem.
    fn validate(&self) -> Result<(), CommandError>;
}

fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|field| !field.is_empty())
}

impl Validate for ByIdRequest {
    fn validate(&self) -> Result<(), CommandError> {
        if self.id <= 0 {
            return Err(CommandError::invalid_argument("Invalid ID parameter"));
        }
        Ok(())
    }
}

impl Validate for CreateDeckRequest {
    fn validate(&self) -> Result<(), CommandError> {
        if !all_present(&[self.title.as_str(), self.description.as_str(), self.author.as_str()]) {
            return Err(CommandError::invalid_argument(
                "title, description, and author are required",
            ));
        }
        Ok(())
    }
}

impl Validate for UpdateDeckRequest {
    fn validate(&self) -> Result<(), CommandError> {
        if self.id <= 0 || !all_present(&[self.title.as_str(), self.description.as_str(), self.author.as_str()]) {
            return Err(CommandError::invalid_argument("Invalid request payload"));
        }
        Ok(())
    }
}

impl Validate for CreateCardRequest {
    fn validate(&self) -> Result<(), CommandError> {
        if !all_present(&[self.front.as_str(), self.back.as_str()]) {
            return Err(CommandError::invalid_argument("front and back are required"));
        }
        Ok(())
    }
}

impl Validate for UpdateCardRequest {
    fn validate(&self) -> Result<(), CommandError> {
        if self.id <= 0 || !all_present(&[self.front.as_str(), self.back.as_str()]) {
            return Err(CommandError::invalid_argument("Invalid request payload"));
        }
        Ok(())
    }
}
