//! Product data access object

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

use super::models::Product;

/// Data access object for Product operations
#[derive(Clone)]
pub struct ProductStore {
    conn: Arc<Mutex<Connection>>,
}

impl ProductStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert a new product and return it with the assigned row id
    pub fn create(&self, product: &Product) -> SqliteResult<Product> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO products (name, description, price, image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                product.name,
                product.description,
                product.price,
                product.image_url,
                product.created_at.to_rfc3339(),
            ],
        )?;
        let mut created = product.clone();
        created.id = conn.last_insert_rowid();
        Ok(created)
    }

    /// Get a product by id
    pub fn get_by_id(&self, id: i64) -> SqliteResult<Option<Product>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, image_url, created_at
             FROM products WHERE id = ?1",
        )?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_product(row)?))
        } else {
            Ok(None)
        }
    }

    /// Get all products, ordered by id ascending (the listing contract)
    pub fn get_all(&self) -> SqliteResult<Vec<Product>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, price, image_url, created_at
             FROM products ORDER BY id",
        )?;

        let products = stmt
            .query_map([], Self::row_to_product)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(products)
    }

    /// Delete a product
    pub fn delete(&self, id: i64) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Convert a database row to a Product
    fn row_to_product(row: &rusqlite::Row) -> SqliteResult<Product> {
        let created_at_str: String = row.get(5)?;

        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            image_url: row.get(4)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
