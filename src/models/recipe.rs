use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNNAMED_MEAL: &str = "Unnamed Meal";
pub const DEFAULT_THUMBNAIL: &str = "/default-meal.jpg";

/// MealDB numbers its ingredient and measure columns 1 through 20
const INGREDIENT_SLOTS: usize = 20;

const PROTEIN: &[&str] = &["chicken", "beef", "fish", "egg", "meat", "pork"];
const CARB: &[&str] = &["rice", "pasta", "bread", "potato", "flour", "noodle"];
const VEGETABLE: &[&str] = &[
    "tomato",
    "onion",
    "pepper",
    "vegetable",
    "leaf",
    "garlic",
    "carrot",
];

/// One `strIngredientN` entry with its matching `strMeasureN`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    fn matches_any(&self, keywords: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        keywords.iter().any(|k| name.contains(k))
    }
}

fn count_matching(ingredients: &[Ingredient], keywords: &[&str]) -> u32 {
    ingredients.iter().filter(|i| i.matches_any(keywords)).count() as u32
}

/// Rough calorie guess from ingredient categories
#[must_use]
pub fn estimate_calories(ingredients: &[Ingredient]) -> u32 {
    200 + count_matching(ingredients, PROTEIN) * 120
        + count_matching(ingredients, CARB) * 80
        + count_matching(ingredients, VEGETABLE) * 30
}

/// Rough cost guess in naira. Proteins cost extra on top of a flat per-ingredient price.
#[must_use]
pub fn estimate_cost(ingredients: &[Ingredient]) -> u32 {
    500 + count_matching(ingredients, PROTEIN) * 350 + ingredients.len() as u32 * 150
}

/// A recipe as returned by `/api/recipes`.
///
/// The three identifying fields are always present; every other upstream
/// field (instructions, ingredients, measures, ...) is passed through as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Meal {
    /// Fill in defaults for missing or blank identifying fields
    #[must_use]
    pub fn normalized(
        id: Option<String>,
        name: Option<String>,
        thumbnail: Option<String>,
        details: Map<String, Value>,
    ) -> Self {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            id: or_default(id, ""),
            name: or_default(name, UNNAMED_MEAL),
            thumbnail: or_default(thumbnail, DEFAULT_THUMBNAIL),
            details,
        }
    }

    /// Non-blank ingredients in slot order. A missing measure becomes empty.
    #[must_use]
    pub fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let name = self.detail(&format!("strIngredient{i}"))?;
                if name.trim().is_empty() {
                    return None;
                }
                let measure = self.detail(&format!("strMeasure{i}")).unwrap_or_default();
                Some(Ingredient {
                    name: name.to_string(),
                    measure: measure.to_string(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn estimated_calories(&self) -> u32 {
        estimate_calories(&self.ingredients())
    }

    #[must_use]
    pub fn estimated_cost(&self) -> u32 {
        estimate_cost(&self.ingredients())
    }

    fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}
