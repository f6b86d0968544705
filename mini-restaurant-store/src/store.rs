use std::env;

use chrono::{Local, SubsecRound};
use diesel::{insert_into, prelude::*, sql_query, SqliteConnection};
use diesel_migrations::MigrationHarness;
use dotenvy::dotenv;
use tracing::{debug, info, instrument};

use crate::types::to_real;
use crate::{
    models, schema, CartLine, MenuItem, PlacedOrder, StoreError, DEFAULT_DATABASE_URL,
    MIGRATIONS, SEED_MENU, TIMESTAMP_FORMAT,
};

/// Persists orders handed over at checkout.
pub trait OrderStore {
    fn create_order(&self, lines: &[CartLine]) -> Result<PlacedOrder, StoreError>;
}

/// Handle on the till's SQLite file. Every operation opens its own connection
/// and closes it before returning.
#[derive(Debug, Clone)]
pub struct Store {
    database_url: String,
}

impl Store {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// Reads `DATABASE_URL` (a `.env` file is honoured), falling back to
    /// `mini_rest.db` in the working directory.
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::new(database_url)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn establish_connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(database_url = %self.database_url, "opening connection");
        let mut conn = SqliteConnection::establish(&self.database_url)?;
        sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Creates the tables if needed and seeds an empty menu. Safe to call on
    /// every startup.
    #[instrument(skip(self), fields(database_url = %self.database_url))]
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = &mut self.establish_connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;

        let seeded = conn.transaction::<_, StoreError, _>(|conn| {
            let count: i64 = schema::menu::table.count().get_result(conn)?;
            if count > 0 {
                return Ok(false);
            }

            let rows = SEED_MENU
                .iter()
                .map(|&(name, price)| models::NewMenuRow { name, price })
                .collect::<Vec<_>>();
            insert_into(schema::menu::table)
                .values(&rows)
                .execute(conn)?;
            Ok(true)
        })?;

        if seeded {
            info!(items = SEED_MENU.len(), "seeded menu");
        }
        info!("store initialized");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn list_menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        let conn = &mut self.establish_connection()?;
        schema::menu::table
            .select(models::MenuRow::as_select())
            .order(schema::menu::id.asc())
            .load(conn)?
            .into_iter()
            .map(MenuItem::try_from)
            .collect()
    }

    /// Writes the order header and its items in one transaction. The caller
    /// guarantees `lines` is non-empty.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub fn create_order(&self, lines: &[CartLine]) -> Result<PlacedOrder, StoreError> {
        let total = crate::order_total(lines);
        let created_at = Local::now().naive_local().trunc_subsecs(0);
        let new_order = models::NewOrder {
            ts: created_at.format(TIMESTAMP_FORMAT).to_string(),
            total: to_real(&total)?,
        };
        let prices = lines
            .iter()
            .map(|l| to_real(&l.unit_price))
            .collect::<Result<Vec<_>, _>>()?;

        let conn = &mut self.establish_connection()?;
        let order_id = conn.transaction::<_, StoreError, _>(|conn| {
            let order_id = insert_into(schema::orders::table)
                .values(&new_order)
                .returning(schema::orders::id)
                .get_result::<i32>(conn)?;

            let items = lines
                .iter()
                .zip(prices)
                .map(|(line, price)| models::NewOrderItem {
                    order_id,
                    name: &line.name,
                    qty: line.quantity,
                    price,
                })
                .collect::<Vec<_>>();
            insert_into(schema::order_items::table)
                .values(&items)
                .execute(conn)?;

            Ok(order_id)
        })?;

        info!(order_id, total = %total, ts = %new_order.ts, "order committed");
        Ok(PlacedOrder {
            id: order_id,
            created_at,
            total,
        })
    }
}

impl OrderStore for Store {
    fn create_order(&self, lines: &[CartLine]) -> Result<PlacedOrder, StoreError> {
        Store::create_order(self, lines)
    }
}
