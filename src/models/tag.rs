use serde::Serialize;

use crate::constants::{DEFAULT_MAX_LENGTH, MAX_TAG_NAME_LENGTH};
use crate::error::{AppError, Result};

/// A labeling category applied to recipes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// `#RRGGBB`, unique across tags
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl Tag {
    /// Validate a HEX color of the form `#RRGGBB`
    pub fn validate_color(color: &str) -> bool {
        color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Validate a slug: `[-a-zA-Z0-9_]+`
    pub fn validate_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= DEFAULT_MAX_LENGTH
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl NewTag {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.name.chars().count() > MAX_TAG_NAME_LENGTH {
            return Err(AppError::validation(
                "name",
                format!("Tag name must be between 1 and {MAX_TAG_NAME_LENGTH} characters"),
            ));
        }
        if !Tag::validate_color(&self.color) {
            return Err(AppError::validation("color", "Color must be a HEX value like #49B64E"));
        }
        if !Tag::validate_slug(&self.slug) {
            return Err(AppError::validation(
                "slug",
                "Slug may only contain letters, digits, '_' and '-'",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_color() {
        assert!(Tag::validate_color("#49B64E"));
        assert!(Tag::validate_color("#ffffff"));

        assert!(!Tag::validate_color("49B64E"));
        assert!(!Tag::validate_color("#49B64"));
        assert!(!Tag::validate_color("#49B64E0"));
        assert!(!Tag::validate_color("#GGGGGG"));
    }

    #[test]
    fn test_validate_slug() {
        assert!(Tag::validate_slug("breakfast"));
        assert!(Tag::validate_slug("late-night_snack2"));
        assert!(!Tag::validate_slug(""));
        assert!(!Tag::validate_slug("two words"));
    }

    #[test]
    fn test_new_tag_validation() {
        let tag = NewTag {
            name: "Breakfast".to_string(),
            color: "#E26C2D".to_string(),
            slug: "breakfast".to_string(),
        };
        assert!(tag.validate().is_ok());

        let long_name = NewTag {
            name: "x".repeat(51),
            ..tag.clone()
        };
        assert!(matches!(
            long_name.validate(),
            Err(AppError::Validation { field: "name", .. })
        ));
    }
}
