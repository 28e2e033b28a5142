use std::{fs, sync::Arc};

use edunari::{
   catalog::Catalog,
   config::Config,
   loader,
   search::{DEFAULT_LIMIT, SearchEngine},
   store::DatasetStore,
   types::{ItemKind, Statistics},
};
use tempfile::TempDir;

const VENTURES: &str = "\
id,nombre,categoria,tipo,emprendedor_nombre,emprendedor_instagram
1,Choco Dulce,comida,producto,Ana,@ana
2,Clases Pro,educacion,servicio,Benja,@benja
3,Dulces Sofi,comida,producto,Sofia,@sofi
";

const PRODUCTS: &str = "\
id,nombre,descripcion,precio,disponible,stock,tags,emprendimiento_id
10,Chocolate artesanal,Hecho a mano,2500,true,5,\"dulce, chocolate\",1
11,Caja surtida,,4000,si,2,\"chocolate amargo, chocolate blanco\",3
12,Chocolate fantasma,Sin emprendimiento,100,true,1,chocolate,42
13,Galletas,Con chips de chocolate,1500.90,false,0,,3
";

const SERVICES: &str = "\
id,nombre,descripcion,precio,disponible,duracion,tags,emprendimiento_id
20,Clase de reposteria,Aprende a templar chocolate,12000,true,2 horas,\"cocina, chocolate\",2
21,Clase de guitarra,Para principiantes,8000,true,1 hora,musica,2
";

fn fixture_store() -> (TempDir, Arc<DatasetStore>) {
   let dir = TempDir::new().unwrap();
   fs::write(dir.path().join("emprendimientos.csv"), VENTURES).unwrap();
   fs::write(dir.path().join("productos.csv"), PRODUCTS).unwrap();
   fs::write(dir.path().join("servicios.csv"), SERVICES).unwrap();

   let files = Config::default().data_files(Some(dir.path()));
   let store = Arc::new(loader::load_store(&files));
   (dir, store)
}

fn choco_dulce_store() -> Arc<DatasetStore> {
   let dir = TempDir::new().unwrap();
   fs::write(
      dir.path().join("emprendimientos.csv"),
      "id,nombre,categoria,tipo,emprendedor_nombre,emprendedor_instagram\n\
       1,Choco Dulce,comida,producto,Ana,@ana\n",
   )
   .unwrap();
   fs::write(
      dir.path().join("productos.csv"),
      "id,nombre,descripcion,precio,disponible,stock,tags,emprendimiento_id\n\
       10,Chocolate artesanal,rico,500,true,3,\"dulce, chocolate\",1\n",
   )
   .unwrap();
   fs::write(
      dir.path().join("servicios.csv"),
      "id,nombre,descripcion,precio,disponible,duracion,tags,emprendimiento_id\n",
   )
   .unwrap();

   Arc::new(loader::load_store(&Config::default().data_files(Some(dir.path()))))
}

#[test]
fn test_single_venture_example() {
   let store = choco_dulce_store();

   let results = SearchEngine::new(Arc::clone(&store)).search("chocolate", DEFAULT_LIMIT);
   assert_eq!(results.len(), 1);
   assert_eq!(results[0].relevance_score, Some(5.0));
   assert_eq!(results[0].emprendimiento, "Choco Dulce");

   assert!(
      SearchEngine::new(Arc::clone(&store))
         .search("xyz-no-match", DEFAULT_LIMIT)
         .is_empty()
   );

   let by_category = Catalog::new(store).products_by_category("comida", 10);
   assert_eq!(by_category.len(), 1);
   assert_eq!(by_category[0].relevance_score, None);
}

#[test]
fn test_name_match_is_always_found() {
   let (_dir, store) = fixture_store();
   let engine = SearchEngine::new(store);

   for query in ["artesanal", "Caja", "guitarra", "GALLETAS"] {
      let results = engine.search(query, DEFAULT_LIMIT);
      let needle = query.to_lowercase();
      assert!(
         results
            .iter()
            .any(|r| r.nombre.to_lowercase().contains(&needle)),
         "no result named like {query}"
      );
   }
}

#[test]
fn test_each_matching_tag_counts() {
   let (_dir, store) = fixture_store();
   let results = SearchEngine::new(store).search("chocolate", DEFAULT_LIMIT);

   let caja = results.iter().find(|r| r.id == 11).unwrap();
   assert_eq!(caja.relevance_score, Some(4.0));
}

#[test]
fn test_results_are_ordered_and_stable() {
   let (_dir, store) = fixture_store();
   let engine = SearchEngine::new(store);

   let first = engine.search("chocolate", DEFAULT_LIMIT);
   assert!(
      first
         .windows(2)
         .all(|pair| pair[0].score() >= pair[1].score())
   );

   let ids: Vec<_> = first.iter().map(|r| r.id).collect();
   assert_eq!(ids, vec![10, 11, 20, 13]);

   for _ in 0..5 {
      assert_eq!(engine.search("chocolate", DEFAULT_LIMIT), first);
   }
}

#[test]
fn test_limit_bounds_results() {
   let (_dir, store) = fixture_store();
   let engine = SearchEngine::new(store);

   for limit in [0, 1, 2, 3, 100] {
      assert!(engine.search("chocolate", limit).len() <= limit);
   }
   assert!(engine.search("chocolate", 0).is_empty());
   assert!(engine.search("  ", DEFAULT_LIMIT).is_empty());
}

#[test]
fn test_unjoinable_item_never_surfaces() {
   let (_dir, store) = fixture_store();
   assert_eq!(store.unjoinable_items().map(|item| item.id).collect::<Vec<_>>(), vec![12]);

   let search = SearchEngine::new(Arc::clone(&store));
   assert!(search.search("fantasma", DEFAULT_LIMIT).is_empty());
   assert!(
      search
         .search("chocolate", DEFAULT_LIMIT)
         .iter()
         .all(|r| r.id != 12)
   );

   let catalog = Catalog::new(store);
   for categoria in ["comida", "educacion"] {
      assert!(
         catalog
            .by_category(ItemKind::Product, categoria, DEFAULT_LIMIT)
            .iter()
            .all(|r| r.id != 12)
      );
   }
}

#[test]
fn test_loaded_fields_flow_into_results() {
   let (_dir, store) = fixture_store();
   let results = Catalog::new(store).products_by_category("comida", DEFAULT_LIMIT);

   let galletas = results.iter().find(|r| r.id == 13).unwrap();
   assert_eq!(galletas.precio, 1500);
   assert!(!galletas.disponible);
   assert!(galletas.tags.is_empty());
   assert_eq!(galletas.emprendedor, "Sofia");
   assert_eq!(galletas.tipo, ItemKind::Product);
}

#[test]
fn test_statistics_from_csv() {
   let (_dir, store) = fixture_store();
   let stats = Catalog::new(store).statistics();

   assert_eq!(stats.total_emprendimientos, 3);
   assert_eq!(stats.total_productos, 4);
   assert_eq!(stats.total_servicios, 2);
   assert_eq!(stats.total_items, 6);
   assert_eq!(stats.categorias_productos, vec!["comida"]);
   assert_eq!(stats.categorias_servicios, vec!["educacion"]);
}

#[test]
fn test_statistics_on_empty_data_dir() {
   let dir = TempDir::new().unwrap();
   let store = loader::load_store(&Config::default().data_files(Some(dir.path())));
   let stats = Catalog::new(Arc::new(store)).statistics();

   assert_eq!(stats, Statistics::default());
   assert_eq!(stats.total_items, 0);
   assert!(stats.categorias_productos.is_empty());
}
