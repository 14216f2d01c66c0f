use std::collections::BTreeSet;

use crate::models::Recipe;

/// Words that carry no signal about what a recipe is
pub const STOPWORDS: [&str; 20] = [
    "and", "or", "with", "of", "the", "a", "an", "to", "in", "for", "on", "at", "by", "from",
    "as", "but", "is", "are", "was", "were",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Splits text into keyword tokens
///
/// Tokens are whitespace-separated and lower-cased. Stopwords are dropped.
/// Repeats are kept.
pub fn keyword_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| !is_stopword(word))
}

/// Normalizes caller-supplied keywords into the set used for lookups
///
/// Each entry goes through `keyword_tokens`, so `"Olive Oil"` becomes
/// `{"olive", "oil"}`.
pub fn normalize_keywords<I, S>(keywords: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .flat_map(|keyword| keyword_tokens(keyword.as_ref()).collect::<Vec<_>>())
        .collect()
}

/// Extracts the normalized keyword set of a recipe
///
/// Name, ingredients and instructions are split on whitespace and
/// lower-cased; duplicates collapse and stopwords are dropped. A recipe with
/// no text yields an empty set.
pub fn extract_keywords(recipe: &Recipe) -> BTreeSet<String> {
    let fields = recipe
        .name
        .iter()
        .chain(recipe.ingredients.iter())
        .chain(recipe.instructions.iter());

    fields.flat_map(|text| keyword_tokens(text)).collect()
}

/// Union of the keyword sets of a batch, used for history updates
pub fn extract_keywords_for_many(recipes: &[Recipe]) -> BTreeSet<String> {
    recipes.iter().flat_map(extract_keywords).collect()
}

/// Assigns keywords to every recipe that does not have them yet
pub fn tag_recipes(recipes: &mut [Recipe]) {
    for recipe in recipes.iter_mut().filter(|r| r.keywords.is_none()) {
        recipe.keywords = Some(extract_keywords(recipe));
    }
}
