//! Content sanitization for server-supplied and user-supplied text.
//!
//! Every string destined for display is cleaned against a trust tier before
//! it leaves the SDK. The tier is fixed per field: plain identifiers get
//! [`Policy::Strict`], free-form prose gets [`Policy::Basic`], and recipe
//! instructions — the only field allowed structural markup — get
//! [`Policy::Rich`].

mod html;

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Named allow-list profile controlling which markup survives cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// No markup at all; tags are stripped, their text kept.
    Strict,
    /// Inline formatting only: `b i em strong u br`.
    Basic,
    /// Basic plus block structure, links and images.
    Rich,
}

/// Display fields recognized by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Name,
    Title,
    Tag,
    Category,
    Unit,
    Ingredient,
    Equipment,
    DietaryRestriction,
    MealType,
    Bio,
    Description,
    Instructions,
}

impl FieldKind {
    /// Trust tier per field. Exhaustive: adding a field kind without deciding
    /// its tier fails to compile.
    pub fn policy(self) -> Policy {
        match self {
            FieldKind::Name
            | FieldKind::Title
            | FieldKind::Tag
            | FieldKind::Category
            | FieldKind::Unit
            | FieldKind::Ingredient
            | FieldKind::Equipment
            | FieldKind::DietaryRestriction
            | FieldKind::MealType => Policy::Strict,
            FieldKind::Bio | FieldKind::Description => Policy::Basic,
            FieldKind::Instructions => Policy::Rich,
        }
    }

    pub fn from_key(key: &str) -> Option<FieldKind> {
        FIELD_KINDS.get(key).copied()
    }
}

static FIELD_KINDS: Lazy<HashMap<&'static str, FieldKind>> = Lazy::new(|| {
    HashMap::from([
        ("name", FieldKind::Name),
        ("username", FieldKind::Name),
        ("title", FieldKind::Title),
        ("tags", FieldKind::Tag),
        ("category", FieldKind::Category),
        ("unit", FieldKind::Unit),
        ("ingredients", FieldKind::Ingredient),
        ("kitchen_equipment", FieldKind::Equipment),
        ("dietary_restrictions", FieldKind::DietaryRestriction),
        ("meal_type", FieldKind::MealType),
        ("bio", FieldKind::Bio),
        ("description", FieldKind::Description),
        ("summary", FieldKind::Description),
        ("instructions", FieldKind::Instructions),
    ])
});

/// Clean one string against a policy. Idempotent: cleaning already-clean
/// content yields an identical string.
pub fn sanitize(text: &str, policy: Policy) -> String {
    html::clean(text, policy)
}

/// Policy for a JSON key. Unknown fields get the most restrictive tier.
pub fn policy_for_field(field: &str) -> Policy {
    FieldKind::from_key(field)
        .map(FieldKind::policy)
        .unwrap_or(Policy::Strict)
}

/// Clean every string leaf of a JSON tree according to the field table.
/// Arrays inherit the policy of the field that contains them.
pub fn sanitize_tree(value: &mut serde_json::Value) {
    sanitize_with(value, Policy::Strict);
}

fn sanitize_with(value: &mut serde_json::Value, policy: Policy) {
    match value {
        serde_json::Value::String(text) => {
            let cleaned = sanitize(text, policy);
            *text = cleaned;
        }
        serde_json::Value::Array(items) => {
            for item in items {
                sanitize_with(item, policy);
            }
        }
        serde_json::Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                sanitize_with(item, policy_for_field(key));
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_table() {
        assert_eq!(policy_for_field("name"), Policy::Strict);
        assert_eq!(policy_for_field("tags"), Policy::Strict);
        assert_eq!(policy_for_field("bio"), Policy::Basic);
        assert_eq!(policy_for_field("description"), Policy::Basic);
        assert_eq!(policy_for_field("instructions"), Policy::Rich);
        // Unknown fields fall back to the most restrictive tier.
        assert_eq!(policy_for_field("whatever"), Policy::Strict);
    }

    #[test]
    fn test_sanitize_tree_applies_per_field_policies() {
        let mut value = json!({
            "title": "<b>Carbonara</b>",
            "description": "<b>Rich</b> and <script>alert(1)</script>creamy",
            "instructions": "<p>Whisk the eggs</p>",
            "tags": ["<i>quick</i>", "dinner"],
            "servings": 4,
        });

        sanitize_tree(&mut value);

        assert_eq!(value["title"], "Carbonara");
        assert_eq!(value["description"], "<b>Rich</b> and creamy");
        assert_eq!(value["instructions"], "<p>Whisk the eggs</p>");
        assert_eq!(value["tags"][0], "quick");
        assert_eq!(value["tags"][1], "dinner");
        assert_eq!(value["servings"], 4);
    }

    #[test]
    fn test_sanitize_tree_handles_nested_objects() {
        let mut value = json!({
            "user": { "username": "<script>x</script>cook" },
            "profile": { "bio": "<em>loves</em> <iframe src=x></iframe>pasta" },
        });

        sanitize_tree(&mut value);

        assert_eq!(value["user"]["username"], "cook");
        assert_eq!(value["profile"]["bio"], "<em>loves</em> pasta");
    }

    #[test]
    fn test_sanitize_tree_is_idempotent() {
        let original = json!({
            "title": "Pasta <script>alert(1)</script>night",
            "instructions": "<p>Boil</p><p>2 < 3</p>",
        });

        let mut once = original.clone();
        sanitize_tree(&mut once);
        let mut twice = once.clone();
        sanitize_tree(&mut twice);

        assert_eq!(once, twice);
    }
}
