use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use crate::error::{AppError, AppResult};
use crate::services::keywords::normalize_keywords;

/// Where a candidate recipe came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    /// Matched in the recipe database
    Db,
    /// Proposed by the language model
    Llm,
}

/// A candidate recipe in canonical shape
///
/// Identity is positional: a recipe only lives for the recognition round
/// that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// `None` until keywords have been derived
    #[serde(
        default,
        deserialize_with = "deserialize_keywords",
        skip_serializing_if = "Option::is_none"
    )]
    pub keywords: Option<BTreeSet<String>>,
    pub source: RecipeSource,
    /// Link to the verified recipe, when the backend gives one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub weight: u64,
}

impl Recipe {
    /// Creates a recipe with no derived keywords and zero weight
    pub fn new(
        name: impl Into<String>,
        ingredients: Vec<String>,
        instructions: Vec<String>,
        source: RecipeSource,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ingredients,
            instructions,
            keywords: None,
            source,
            reference: None,
            weight: 0,
        }
    }

    /// Placeholder kept in the list for an entry that could not be read
    ///
    /// Its keyword set is empty, so it always ranks with weight 0.
    pub fn malformed(name: Option<String>, source: RecipeSource) -> Self {
        Self {
            name,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            keywords: Some(BTreeSet::new()),
            source,
            reference: None,
            weight: 0,
        }
    }

    /// Sets the keyword set, replacing any previous one
    ///
    /// Keywords are normalized the same way extracted ones are.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = Some(normalize_keywords(keywords));
        self
    }

    /// Reads one candidate from untyped JSON
    ///
    /// Accepts both the canonical shape and the backend's raw shape. A
    /// `source` of `"db"` or `"llm"` is the provenance; any other string is
    /// taken as the reference link and `default_source` applies. Entries that
    /// cannot be read are kept as weight-0 placeholders.
    pub fn from_value(value: serde_json::Value, default_source: RecipeSource) -> Self {
        let name_hint = value
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_string);

        let result = serde_json::from_value::<RawRecipe>(value)
            .map_err(|e| AppError::MalformedRecipe(e.to_string()))
            .and_then(|raw| {
                let source = raw.provenance().unwrap_or(default_source);
                raw.into_recipe(source)
            });

        match result {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::warn!(error = %e, source = ?default_source, "Keeping malformed recipe with zero weight");
                Recipe::malformed(name_hint, default_source)
            }
        }
    }

    /// Display label
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("untitled recipe")
    }
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.map(normalize_keywords))
}

// ============================================================================
// Recognition Backend Types
// ============================================================================

/// A text field that arrives either as a list or as one string
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TextField {
    Many(Vec<String>),
    One(String),
}

impl TextField {
    /// Normalizes to an ordered list of non-blank entries
    ///
    /// A single string holding a JSON array of strings (how the recipe
    /// database stores lists) is decoded as that array. Any other single
    /// string is split into lines.
    pub fn into_lines(self) -> Vec<String> {
        let lines = match self {
            TextField::Many(items) => items,
            TextField::One(text) => {
                let trimmed = text.trim();
                match trimmed
                    .starts_with('[')
                    .then(|| serde_json::from_str::<Vec<String>>(trimmed).ok())
                    .flatten()
                {
                    Some(items) => items,
                    None => trimmed.lines().map(str::to_string).collect(),
                }
            }
        };

        lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Raw recipe as returned by the recognition backend
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipe {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Option<TextField>,
    #[serde(default)]
    pub instructions: Option<TextField>,
    #[serde(default)]
    pub keywords: Option<TextField>,
    /// Provenance tag, or the verified-source link on the LLM path
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl RawRecipe {
    /// Provenance named by `source`, when it is a tag rather than a link
    fn provenance(&self) -> Option<RecipeSource> {
        match self.source.as_deref().map(str::trim) {
            Some("db") => Some(RecipeSource::Db),
            Some("llm") => Some(RecipeSource::Llm),
            _ => None,
        }
    }

    /// Converts to the canonical shape, tagging provenance
    pub fn into_recipe(self, source: RecipeSource) -> AppResult<Recipe> {
        let provenance = self.provenance();
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let ingredients = self.ingredients.map(TextField::into_lines).unwrap_or_default();
        let instructions = self.instructions.map(TextField::into_lines).unwrap_or_default();

        if name.is_none() && ingredients.is_empty() && instructions.is_empty() {
            return Err(AppError::MalformedRecipe(
                "recipe has no name, ingredients or instructions".to_string(),
            ));
        }

        let link = match provenance {
            Some(_) => None,
            None => self.source,
        };

        Ok(Recipe {
            name,
            ingredients,
            instructions,
            keywords: self
                .keywords
                .map(|kws| normalize_keywords(kws.into_lines())),
            source,
            reference: self
                .reference
                .or(link)
                .filter(|s| !s.trim().is_empty()),
            weight: 0,
        })
    }
}

/// Payload returned by the recognition backend's `/recommend` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecognitionPayload {
    #[serde(default)]
    pub llm: Vec<serde_json::Value>,
    #[serde(default)]
    pub db: Vec<serde_json::Value>,
}

impl RecognitionPayload {
    /// Normalizes every entry, LLM proposals first, then database matches
    ///
    /// Entries that cannot be read are kept as weight-0 placeholders.
    pub fn into_recipes(self) -> Vec<Recipe> {
        let mut recipes = Vec::with_capacity(self.llm.len() + self.db.len());
        for (values, source) in [(self.llm, RecipeSource::Llm), (self.db, RecipeSource::Db)] {
            recipes.extend(values.into_iter().map(|value| Recipe::from_value(value, source)));
        }
        recipes
    }
}
