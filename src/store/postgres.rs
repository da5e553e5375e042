use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};

use crate::model::{Group, Id, NewGroup, NewProduct, Product};
use crate::store::traits::{GroupStore, ProductStore};

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        notes TEXT,
        image TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_GROUPS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS groups (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        notes TEXT,
        products JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TEXT NOT NULL
    )
"#;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the two collection tables if they do not exist yet
    pub async fn migrate(&self) -> Result<()> {
        for statement in [CREATE_PRODUCTS_TABLE, CREATE_GROUPS_TABLE] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to run schema migration")?;
        }
        log::info!("Document tables ready");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let product = Product::from_new(product);

        sqlx::query(
            r#"
            INSERT INTO products (id, title, notes, image, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.notes)
        .bind(&product.image)
        .bind(&product.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create product")?;

        Ok(product)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT id, title, notes, image, created_at FROM products ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list products")?;

        let products = rows
            .into_iter()
            .map(|row| Product {
                id: row.get("id"),
                title: row.get("title"),
                notes: row.get("notes"),
                image: row.get("image"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(products)
    }

    async fn delete_product(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl GroupStore for PostgresStore {
    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let group = Group::from_new(group);

        sqlx::query(
            r#"
            INSERT INTO groups (id, name, notes, products, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(&group.notes)
        .bind(Json(&group.products))
        .bind(&group.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create group")?;

        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let rows = sqlx::query("SELECT id, name, notes, products, created_at FROM groups ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list groups")?;

        let groups = rows
            .into_iter()
            .map(|row| {
                let Json(products): Json<Vec<Id>> = row.get("products");
                Group {
                    id: row.get("id"),
                    name: row.get("name"),
                    notes: row.get("notes"),
                    products,
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok(groups)
    }
}
