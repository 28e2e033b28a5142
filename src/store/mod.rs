//! Read-only dataset store holding ventures, products and services.
//!
//! Built once at startup and shared behind an `Arc`; nothing mutates it after
//! [`DatasetStore::load`], so concurrent readers need no locking.

use std::collections::HashMap;

use crate::types::{Item, ItemKind, Venture, VentureId};

#[derive(Debug, Default)]
pub struct DatasetStore {
   ventures:      Vec<Venture>,
   products:      Vec<Item>,
   services:      Vec<Item>,
   venture_index: HashMap<VentureId, usize>,
}

impl DatasetStore {
   /// Takes ownership of the three tables and indexes ventures by id.
   ///
   /// A table that could not be loaded is passed as an empty `Vec`. When two
   /// ventures share an id the first one wins the index; both are still listed.
   pub fn load(ventures: Vec<Venture>, products: Vec<Item>, services: Vec<Item>) -> Self {
      let mut venture_index = HashMap::with_capacity(ventures.len());
      for (pos, venture) in ventures.iter().enumerate() {
         venture_index.entry(venture.id).or_insert(pos);
      }

      Self { ventures, products, services, venture_index }
   }

   pub fn empty() -> Self {
      Self::default()
   }

   pub fn venture_by_id(&self, id: VentureId) -> Option<&Venture> {
      self
         .venture_index
         .get(&id)
         .and_then(|&pos| self.ventures.get(pos))
   }

   /// Resolves the venture owning `item`, or `None` when the foreign key
   /// dangles. Callers drop such items instead of failing.
   pub fn resolve_venture(&self, item: &Item) -> Option<&Venture> {
      self.venture_by_id(item.emprendimiento_id)
   }

   pub fn ventures(&self) -> &[Venture] {
      &self.ventures
   }

   pub fn products(&self) -> &[Item] {
      &self.products
   }

   pub fn services(&self) -> &[Item] {
      &self.services
   }

   pub fn items(&self, kind: ItemKind) -> &[Item] {
      match kind {
         ItemKind::Product => &self.products,
         ItemKind::Service => &self.services,
      }
   }

   /// Items whose venture reference resolves to nothing.
   pub fn unjoinable_items(&self) -> impl Iterator<Item = &Item> {
      self
         .products
         .iter()
         .chain(&self.services)
         .filter(|item| self.resolve_venture(item).is_none())
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn sample_store() -> DatasetStore {
      DatasetStore::load(
         vec![
            Venture::new(1, "Choco Dulce", ItemKind::Product),
            Venture::new(2, "Clases Pro", ItemKind::Service),
            Venture::new(1, "Duplicado", ItemKind::Product),
         ],
         vec![Item::product(10, "Chocolate", 1), Item::product(11, "Huerfano", 99)],
         vec![Item::service(20, "Guitarra", 2)],
      )
   }

   #[test]
   fn test_venture_lookup_by_id() {
      let store = sample_store();
      assert_eq!(store.venture_by_id(2).map(|v| v.nombre.as_str()), Some("Clases Pro"));
      assert!(store.venture_by_id(42).is_none());
   }

   #[test]
   fn test_duplicate_venture_id_first_wins() {
      let store = sample_store();
      assert_eq!(store.venture_by_id(1).unwrap().nombre, "Choco Dulce");
      assert_eq!(store.ventures().len(), 3);
   }

   #[test]
   fn test_resolve_venture_follows_foreign_key() {
      let store = sample_store();
      let chocolate = &store.products()[0];
      assert_eq!(store.resolve_venture(chocolate).unwrap().id, 1);

      let orphan = &store.products()[1];
      assert!(store.resolve_venture(orphan).is_none());
   }

   #[test]
   fn test_items_by_kind() {
      let store = sample_store();
      assert_eq!(store.items(ItemKind::Product).len(), 2);
      assert_eq!(store.items(ItemKind::Service)[0].nombre, "Guitarra");
   }

   #[test]
   fn test_unjoinable_items() {
      let store = sample_store();
      let ids: Vec<_> = store.unjoinable_items().map(|item| item.id).collect();
      assert_eq!(ids, vec![11]);
   }

   #[test]
   fn test_empty_store() {
      let store = DatasetStore::empty();
      assert!(store.ventures().is_empty());
      assert!(store.products().is_empty());
      assert!(store.services().is_empty());
      assert!(store.venture_by_id(1).is_none());
   }
}
