//! Product categories.
//!
//! Categories nest (e.g. "Wall Tiles" → "Bathroom"). The pair `(slug, parent)`
//! is unique, so the same subcategory name can appear under different
//! parents; `slug` alone is not globally unique.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Nesting depth, 0 for top-level categories.
    #[serde(default)]
    pub level: u8,
    /// Ordering weight within a level; lower sorts first.
    #[serde(default)]
    pub weight: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl Category {
    /// Display ordering: level, then weight, then name.
    #[must_use]
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.level
            .cmp(&other.level)
            .then(self.weight.cmp(&other.weight))
            .then_with(|| self.name.cmp(&other.name))
    }

    /// Whether two categories would collide on the `(slug, parent)` unique index.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.slug == other.slug && self.parent == other.parent
    }
}

/// Derive a URL slug from a display name.
///
/// Lowercases ASCII alphanumerics and collapses every other run of characters
/// into a single `-`, with no leading or trailing dash.
///
/// ```
/// use tilestore_core::slugify;
///
/// assert_eq!(slugify("Wall Tiles & Décor"), "wall-tiles-d-cor");
/// assert_eq!(slugify("  600 x 600  "), "600-x-600");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn category(name: &str, parent: Option<&str>, level: u8, weight: i32) -> Category {
        Category {
            id: CategoryId::new(name),
            name: name.to_string(),
            slug: slugify(name),
            parent: parent.map(CategoryId::new),
            level,
            weight,
            is_active: true,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Floor Tiles"), "floor-tiles");
        assert_eq!(slugify("--Bath//Ware--"), "bath-ware");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_same_slug_under_different_parents_does_not_conflict() {
        let wall = category("Bathroom", Some("wall"), 1, 0);
        let floor = category("Bathroom", Some("floor"), 1, 0);
        let wall_again = category("Bathroom", Some("wall"), 1, 5);

        assert!(!wall.conflicts_with(&floor));
        assert!(wall.conflicts_with(&wall_again));
    }

    #[test]
    fn test_display_order() {
        let mut categories = vec![
            category("Kitchen", Some("wall"), 1, 2),
            category("Wall", None, 0, 1),
            category("Bathroom", Some("wall"), 1, 2),
            category("Floor", None, 0, 0),
        ];
        categories.sort_by(Category::display_order);

        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Floor", "Wall", "Bathroom", "Kitchen"]);
    }

    #[test]
    fn test_is_active_defaults_to_true() {
        let json = r#"{"_id": "c1", "name": "Floor", "slug": "floor"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert!(category.is_active);
        assert!(category.parent.is_none());
    }
}
