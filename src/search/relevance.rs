//! Hand-tuned additive relevance score.

use crate::types::{Item, Venture};

pub const NAME_WEIGHT: f64 = 3.0;
pub const TAG_WEIGHT: f64 = 2.0;
pub const DESCRIPTION_WEIGHT: f64 = 1.0;
pub const VENTURE_WEIGHT: f64 = 1.0;

/// Case-insensitive containment. `needle` must already be lowercase.
pub fn contains(haystack: &str, needle: &str) -> bool {
   haystack.to_lowercase().contains(needle)
}

/// Scores an item joined with its venture against a lowercase query.
///
/// Every tag containing the query adds [`TAG_WEIGHT`], so the score has no
/// upper bound. The venture bonus is awarded once even if both its name and
/// its owner match.
pub fn score(query: &str, item: &Item, venture: &Venture) -> f64 {
   let mut score = 0.0;

   if contains(&item.nombre, query) {
      score += NAME_WEIGHT;
   }

   let matching_tags = item
      .tags_list
      .iter()
      .filter(|tag| contains(tag, query))
      .count();
   score += TAG_WEIGHT * matching_tags as f64;

   if contains(&item.descripcion, query) {
      score += DESCRIPTION_WEIGHT;
   }

   if contains(&venture.nombre, query) || contains(&venture.emprendedor_nombre, query) {
      score += VENTURE_WEIGHT;
   }

   score
}
