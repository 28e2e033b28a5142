pub mod relevance;

use std::sync::Arc;

use crate::{
   store::DatasetStore,
   types::{Item, ItemKind, ScoredResult},
};

pub const DEFAULT_LIMIT: usize = 50;

/// Keyword search over products and services.
///
/// Matching runs in two passes: a broad substring filter over the name, the
/// description and the raw tag string, then per-tag scoring. Filtering on the
/// raw string lets a query match across a tag boundary (`"e, c"` matches
/// `"dulce, chocolate"`) even though no single tag scores.
#[derive(Debug, Clone)]
pub struct SearchEngine {
   store: Arc<DatasetStore>,
}

impl SearchEngine {
   pub fn new(store: Arc<DatasetStore>) -> Self {
      Self { store }
   }

   /// Returns at most `limit` results ordered by descending relevance.
   ///
   /// Equal scores keep scan order: products before services, each in table
   /// order. A blank query or a zero limit gives no results.
   pub fn search(&self, query: &str, limit: usize) -> Vec<ScoredResult> {
      let query = query.trim().to_lowercase();
      if query.is_empty() || limit == 0 {
         return Vec::new();
      }

      let mut results: Vec<ScoredResult> = self
         .scan(ItemKind::Product, &query)
         .chain(self.scan(ItemKind::Service, &query))
         .collect();

      // `sort_by` is stable, which keeps ties in scan order.
      results.sort_by(|a, b| b.score().total_cmp(&a.score()));
      results.truncate(limit);

      tracing::debug!(query = %query, results = results.len(), "search complete");
      results
   }

   fn scan<'a>(
      &'a self,
      kind: ItemKind,
      query: &'a str,
   ) -> impl Iterator<Item = ScoredResult> + 'a {
      self
         .store
         .items(kind)
         .iter()
         .filter(move |item| is_candidate(query, item))
         .filter_map(move |item| {
            let venture = self.store.resolve_venture(item)?;
            let score = relevance::score(query, item, venture);
            Some(ScoredResult::new(item, venture, Some(score)))
         })
   }
}

/// Broad filter pass. `query` must already be lowercase.
pub fn is_candidate(query: &str, item: &Item) -> bool {
   relevance::contains(&item.nombre, query)
      || relevance::contains(&item.descripcion, query)
      || relevance::contains(&item.tags, query)
}
