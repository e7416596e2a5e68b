use serde::Serialize;

use crate::constants::DEFAULT_MAX_LENGTH;
use crate::error::{AppError, Result};

/// An ingredient; (name, measurement_unit) is unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("measurement_unit", &self.measurement_unit),
        ] {
            if value.trim().is_empty() || value.chars().count() > DEFAULT_MAX_LENGTH {
                return Err(AppError::validation(
                    field,
                    format!("Must be between 1 and {DEFAULT_MAX_LENGTH} characters"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ingredient_validation() {
        let sugar = NewIngredient {
            name: "Sugar".to_string(),
            measurement_unit: "g".to_string(),
        };
        assert!(sugar.validate().is_ok());

        let unitless = NewIngredient {
            measurement_unit: String::new(),
            ..sugar
        };
        assert!(matches!(
            unitless.validate(),
            Err(AppError::Validation { field: "measurement_unit", .. })
        ));
    }
}
