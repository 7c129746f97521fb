//! Eager SQLite ingestion of the hairstyle catalog.
//!
//! The catalog database joins features to hairstyles through a `match`
//! table and stores one presentation image per hairstyle. Both tables are
//! read fully at startup into plain maps, so request-time lookups never
//! touch the database.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::Connection;
use std::{collections::HashMap, path::Path};

/// Eagerly-loaded hairstyle lookup tables.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    /// Feature name to the hairstyles configured for it, in table order.
    pub featured: HashMap<String, Vec<String>>,
    /// Hairstyle name to its stored image reference.
    pub images: HashMap<String, String>,
}

/// Load the full catalog from a SQLite database file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogData> {
    let path = path.as_ref();
    anyhow::ensure!(
        path.exists(),
        "catalog database not found: {}",
        path.display()
    );
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open catalog database {}", path.display()))?;
    read_catalog(&conn)
}

fn read_catalog(conn: &Connection) -> Result<CatalogData> {
    let mut featured: HashMap<String, Vec<String>> = HashMap::new();
    {
        let mut stmt = conn
            .prepare(
                "SELECT feature.name, hairstyle.name FROM \"match\"
                 JOIN feature ON \"match\".feature_id = feature.id
                 JOIN hairstyle ON \"match\".hairstyle_id = hairstyle.id
                 ORDER BY \"match\".rowid",
            )
            .context("failed to prepare feature/hairstyle match query")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (feature, hairstyle) = row?;
            featured.entry(feature).or_default().push(hairstyle);
        }
    }

    let mut images: HashMap<String, String> = HashMap::new();
    {
        let mut stmt = conn
            .prepare(
                "SELECT hairstyle.name, hairstyle_image.base64_image FROM hairstyle
                 JOIN hairstyle_image ON hairstyle_image.hairstyle_id = hairstyle.id
                 ORDER BY hairstyle_image.rowid",
            )
            .context("failed to prepare hairstyle image query")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (hairstyle, image) = row?;
            // several stored images per hairstyle: the first one wins
            images.entry(hairstyle).or_insert(image);
        }
    }

    debug!(
        "catalog loaded: {} feature(s), {} hairstyle image(s)",
        featured.len(),
        images.len()
    );
    Ok(CatalogData { featured, images })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_connection() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch(
            "CREATE TABLE feature (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             CREATE TABLE hairstyle (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             CREATE TABLE \"match\" (
                 feature_id INTEGER NOT NULL,
                 hairstyle_id INTEGER NOT NULL
             );
             CREATE TABLE hairstyle_image (
                 hairstyle_id INTEGER NOT NULL,
                 base64_image TEXT NOT NULL
             );

             INSERT INTO feature VALUES (1, 'round_face'), (2, 'oval_face');
             INSERT INTO hairstyle VALUES (1, 'bob'), (2, 'layers');
             INSERT INTO \"match\" VALUES (1, 1), (2, 1), (2, 2);
             INSERT INTO hairstyle_image VALUES (1, 'img-bob'), (2, 'img-layers'), (1, 'img-bob-alt');",
        )
        .expect("seed schema");
        conn
    }

    #[test]
    fn features_collect_their_hairstyles_in_table_order() {
        let catalog = read_catalog(&seeded_connection()).unwrap();
        assert_eq!(catalog.featured["round_face"], vec!["bob"]);
        assert_eq!(catalog.featured["oval_face"], vec!["bob", "layers"]);
    }

    #[test]
    fn first_stored_image_per_hairstyle_wins() {
        let catalog = read_catalog(&seeded_connection()).unwrap();
        assert_eq!(catalog.images["bob"], "img-bob");
        assert_eq!(catalog.images["layers"], "img-layers");
    }

    #[test]
    fn empty_tables_load_as_empty_maps() {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch(
            "CREATE TABLE feature (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             CREATE TABLE hairstyle (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             CREATE TABLE \"match\" (feature_id INTEGER, hairstyle_id INTEGER);
             CREATE TABLE hairstyle_image (hairstyle_id INTEGER, base64_image TEXT);",
        )
        .expect("schema");

        let catalog = read_catalog(&conn).unwrap();
        assert!(catalog.featured.is_empty());
        assert!(catalog.images.is_empty());
    }

    #[test]
    fn missing_database_file_errors() {
        assert!(load_catalog("does/not/exist.sqlite").is_err());
    }
}
