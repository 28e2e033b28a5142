//! Read-only projections over the dataset store: venture listing, category
//! views and aggregate statistics.

use std::{collections::HashSet, sync::Arc};

use crate::{
   store::DatasetStore,
   types::{ItemKind, ScoredResult, Statistics, Venture, VentureId},
};

#[derive(Debug, Clone)]
pub struct Catalog {
   store: Arc<DatasetStore>,
}

impl Catalog {
   pub fn new(store: Arc<DatasetStore>) -> Self {
      Self { store }
   }

   pub fn ventures(&self) -> &[Venture] {
      self.store.ventures()
   }

   /// Items of `kind` whose venture has that same `tipo` and the exact
   /// `categoria`, in table order, without scores.
   pub fn by_category(&self, kind: ItemKind, categoria: &str, limit: usize) -> Vec<ScoredResult> {
      if categoria.is_empty() || limit == 0 {
         return Vec::new();
      }

      let venture_ids: HashSet<VentureId> = self
         .store
         .ventures()
         .iter()
         .filter(|venture| venture.is_kind(kind) && venture.categoria == categoria)
         .map(|venture| venture.id)
         .collect();

      if venture_ids.is_empty() {
         return Vec::new();
      }

      self
         .store
         .items(kind)
         .iter()
         .filter(|item| venture_ids.contains(&item.emprendimiento_id))
         .filter_map(|item| {
            let venture = self.store.resolve_venture(item)?;
            Some(ScoredResult::new(item, venture, None))
         })
         .take(limit)
         .collect()
   }

   pub fn products_by_category(&self, categoria: &str, limit: usize) -> Vec<ScoredResult> {
      self.by_category(ItemKind::Product, categoria, limit)
   }

   pub fn services_by_category(&self, categoria: &str, limit: usize) -> Vec<ScoredResult> {
      self.by_category(ItemKind::Service, categoria, limit)
   }

   /// Table sizes and the distinct venture categories per kind, in
   /// first-appearance order. Item totals count every loaded row, joinable or
   /// not.
   pub fn statistics(&self) -> Statistics {
      let total_productos = self.store.products().len();
      let total_servicios = self.store.services().len();

      Statistics {
         total_emprendimientos: self.store.ventures().len(),
         total_productos,
         total_servicios,
         total_items: total_productos + total_servicios,
         categorias_productos: self.categories(ItemKind::Product),
         categorias_servicios: self.categories(ItemKind::Service),
      }
   }

   fn categories(&self, kind: ItemKind) -> Vec<String> {
      let mut seen = HashSet::new();
      self
         .store
         .ventures()
         .iter()
         .filter(|venture| venture.is_kind(kind))
         .map(|venture| venture.categoria.as_str())
         .filter(|categoria| seen.insert(*categoria))
         .map(str::to_string)
         .collect()
   }
}
