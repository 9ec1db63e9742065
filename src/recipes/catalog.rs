use anyhow::Context;
use serde::{Deserialize, Serialize};

const BUILTIN_RECIPES: &str = include_str!("../../data/recipes.json");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RecipeCategory {
    Veg,
    NonVeg,
}

impl std::str::FromStr for RecipeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veg" => Ok(RecipeCategory::Veg),
            "non-veg" => Ok(RecipeCategory::NonVeg),
            other => Err(format!("unknown recipe category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: u32,
    pub name: String,
    pub category: RecipeCategory,
    /// Per serving.
    pub calories: u32,
    pub image: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// Read-only recipe list shipped with the binary.
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_json(BUILTIN_RECIPES).context("parse built-in recipes")
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(Self {
            recipes: serde_json::from_str(raw)?,
        })
    }

    /// Recipes in `category` (all when `None`) whose name or any ingredient
    /// contains `search`, case-insensitively.
    pub fn filter(&self, category: Option<RecipeCategory>, search: Option<&str>) -> Vec<&Recipe> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.recipes
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .filter(|r| match &needle {
                None => true,
                Some(n) => {
                    r.name.to_lowercase().contains(n)
                        || r.ingredients.iter().any(|i| i.to_lowercase().contains(n))
                }
            })
            .collect()
    }

    pub fn get(&self, id: u32) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}
