//! Records shared by the dataset store, the search engine and the HTTP layer.
//!
//! Field names follow the dataset columns and double as the JSON response
//! schema, so they stay in Spanish.

use serde::Serialize;

pub type VentureId = i64;
pub type ItemId = i64;

/// Which item table a record belongs to. Serialized as the `tipo` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ItemKind {
   #[serde(rename = "producto")]
   Product,
   #[serde(rename = "servicio")]
   Service,
}

impl ItemKind {
   pub const fn as_str(self) -> &'static str {
      match self {
         Self::Product => "producto",
         Self::Service => "servicio",
      }
   }
}

impl std::fmt::Display for ItemKind {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.write_str(self.as_str())
   }
}

/// A student venture owning products or services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venture {
   pub id:                    VentureId,
   pub nombre:                String,
   pub categoria:             String,
   /// Kept as the raw source string; only "producto" and "servicio" take part
   /// in category views and statistics.
   pub tipo:                  String,
   pub emprendedor_nombre:    String,
   pub emprendedor_instagram: String,
}

impl Venture {
   pub fn new(id: VentureId, nombre: impl Into<String>, kind: ItemKind) -> Self {
      Self {
         id,
         nombre: nombre.into(),
         categoria: String::new(),
         tipo: kind.as_str().to_string(),
         emprendedor_nombre: String::new(),
         emprendedor_instagram: String::new(),
      }
   }

   pub fn with_category(mut self, categoria: impl Into<String>) -> Self {
      self.categoria = categoria.into();
      self
   }

   pub fn with_owner(mut self, nombre: impl Into<String>, instagram: impl Into<String>) -> Self {
      self.emprendedor_nombre = nombre.into();
      self.emprendedor_instagram = instagram.into();
      self
   }

   pub fn is_kind(&self, kind: ItemKind) -> bool {
      self.tipo == kind.as_str()
   }
}

/// The per-table column that products and services do not share.
///
/// Flattened into result records, so it serializes as either `"stock": n` or
/// `"duracion": "..."`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItemDetail {
   Product { stock: u64 },
   Service { duracion: String },
}

impl ItemDetail {
   pub const fn kind(&self) -> ItemKind {
      match self {
         Self::Product { .. } => ItemKind::Product,
         Self::Service { .. } => ItemKind::Service,
      }
   }
}

/// A product or service row.
///
/// `precio` is an integer amount in the smallest currency unit; the loader
/// truncates fractional source values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
   pub id:                ItemId,
   pub nombre:            String,
   pub descripcion:       String,
   pub precio:            u64,
   pub disponible:        bool,
   pub tags:              String,
   pub tags_list:         Vec<String>,
   pub emprendimiento_id: VentureId,
   pub detail:            ItemDetail,
}

impl Item {
   pub fn product(id: ItemId, nombre: impl Into<String>, emprendimiento_id: VentureId) -> Self {
      Self::new(id, nombre, emprendimiento_id, ItemDetail::Product { stock: 0 })
   }

   pub fn service(id: ItemId, nombre: impl Into<String>, emprendimiento_id: VentureId) -> Self {
      Self::new(id, nombre, emprendimiento_id, ItemDetail::Service { duracion: String::new() })
   }

   fn new(
      id: ItemId,
      nombre: impl Into<String>,
      emprendimiento_id: VentureId,
      detail: ItemDetail,
   ) -> Self {
      Self {
         id,
         nombre: nombre.into(),
         descripcion: String::new(),
         precio: 0,
         disponible: false,
         tags: String::new(),
         tags_list: Vec::new(),
         emprendimiento_id,
         detail,
      }
   }

   pub fn with_description(mut self, descripcion: impl Into<String>) -> Self {
      self.descripcion = descripcion.into();
      self
   }

   pub const fn with_price(mut self, precio: u64) -> Self {
      self.precio = precio;
      self
   }

   pub const fn available(mut self, disponible: bool) -> Self {
      self.disponible = disponible;
      self
   }

   /// Sets the raw tag string and re-derives `tags_list` from it.
   pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
      self.tags = tags.into();
      self.tags_list = split_tags(&self.tags);
      self
   }

   pub fn with_detail(mut self, detail: ItemDetail) -> Self {
      self.detail = detail;
      self
   }

   pub const fn kind(&self) -> ItemKind {
      self.detail.kind()
   }
}

/// Splits a raw comma-separated tag string into trimmed tags.
///
/// A blank source gives no tags. Empty fragments between consecutive commas
/// are kept as empty strings.
pub fn split_tags(raw: &str) -> Vec<String> {
   if raw.trim().is_empty() {
      return Vec::new();
   }
   raw.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// An item joined with its venture, as returned by search and category views.
///
/// `relevance_score` is only set by search; category views leave it out of the
/// serialized record entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
   pub id:              ItemId,
   pub nombre:          String,
   pub descripcion:     String,
   pub precio:          u64,
   pub disponible:      bool,
   #[serde(flatten)]
   pub detail:          ItemDetail,
   pub tags:            Vec<String>,
   pub tipo:            ItemKind,
   pub categoria:       String,
   pub emprendimiento:  String,
   pub emprendedor:     String,
   pub instagram:       String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub relevance_score: Option<f64>,
}

impl ScoredResult {
   pub fn new(item: &Item, venture: &Venture, relevance_score: Option<f64>) -> Self {
      Self {
         id: item.id,
         nombre: item.nombre.clone(),
         descripcion: item.descripcion.clone(),
         precio: item.precio,
         disponible: item.disponible,
         detail: item.detail.clone(),
         tags: item.tags_list.clone(),
         tipo: item.kind(),
         categoria: venture.categoria.clone(),
         emprendimiento: venture.nombre.clone(),
         emprendedor: venture.emprendedor_nombre.clone(),
         instagram: venture.emprendedor_instagram.clone(),
         relevance_score,
      }
   }

   pub fn score(&self) -> f64 {
      self.relevance_score.unwrap_or_default()
   }
}

/// Aggregate counts served by `/api/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
   pub total_emprendimientos: usize,
   pub total_productos:       usize,
   pub total_servicios:       usize,
   pub total_items:           usize,
   pub categorias_productos:  Vec<String>,
   pub categorias_servicios:  Vec<String>,
}

#[cfg(test)]
mod tests {
   use serde_json::json;

   use super::*;

   #[test]
   fn test_split_tags_trims_and_keeps_order() {
      assert_eq!(split_tags("dulce, chocolate ,  artesanal"), vec![
         "dulce",
         "chocolate",
         "artesanal"
      ]);
   }

   #[test]
   fn test_split_tags_blank_is_empty() {
      assert!(split_tags("").is_empty());
      assert!(split_tags("   ").is_empty());
   }

   #[test]
   fn test_split_tags_keeps_empty_fragments() {
      assert_eq!(split_tags("a,,b"), vec!["a", "", "b"]);
   }

   #[test]
   fn test_product_result_serializes_stock() {
      let venture = Venture::new(1, "Choco Dulce", ItemKind::Product)
         .with_category("comida")
         .with_owner("Ana", "@ana");
      let item = Item::product(10, "Chocolate artesanal", 1)
         .with_description("rico")
         .with_price(500)
         .available(true)
         .with_tags("dulce, chocolate")
         .with_detail(ItemDetail::Product { stock: 4 });

      let value = serde_json::to_value(ScoredResult::new(&item, &venture, Some(5.0))).unwrap();
      assert_eq!(
         value,
         json!({
            "id": 10,
            "nombre": "Chocolate artesanal",
            "descripcion": "rico",
            "precio": 500,
            "disponible": true,
            "stock": 4,
            "tags": ["dulce", "chocolate"],
            "tipo": "producto",
            "categoria": "comida",
            "emprendimiento": "Choco Dulce",
            "emprendedor": "Ana",
            "instagram": "@ana",
            "relevance_score": 5.0
         })
      );
   }

   #[test]
   fn test_unscored_service_omits_relevance_score() {
      let venture = Venture::new(2, "Clases Pro", ItemKind::Service).with_category("educacion");
      let item = Item::service(20, "Clase de guitarra", 2).with_detail(ItemDetail::Service {
         duracion: "1 hora".to_string(),
      });

      let value = serde_json::to_value(ScoredResult::new(&item, &venture, None)).unwrap();
      let object = value.as_object().unwrap();
      assert_eq!(object["duracion"], "1 hora");
      assert_eq!(object["tipo"], "servicio");
      assert!(!object.contains_key("relevance_score"));
      assert!(!object.contains_key("stock"));
   }
}
