use serde::Serialize;

/// Summed amount of one ingredient across every recipe in a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl ShoppingListItem {
    /// `"{name} - {unit} {total}"`
    pub fn line(&self) -> String {
        format!(
            "{} - {} {}",
            self.name, self.measurement_unit, self.total_amount
        )
    }
}

/// Render the plain-text export, one line per item, no trailing newline
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    items
        .iter()
        .map(ShoppingListItem::line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, total: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn test_render_lines() {
        let text = render_shopping_list(&[item("Flour", "g", 300), item("Sugar", "g", 150)]);
        assert_eq!(text, "Flour - g 300\nSugar - g 150");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_shopping_list(&[]), "");
    }
}
