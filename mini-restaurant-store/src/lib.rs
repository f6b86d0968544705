use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub mod error;
pub mod models;
pub mod schema;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use store::{OrderStore, Store};
pub use types::{order_total, CartLine, MenuItem, PlacedOrder, TIMESTAMP_FORMAT};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub const DEFAULT_DATABASE_URL: &str = "mini_rest.db";

/// Menu inserted the first time an empty store is initialized.
pub const SEED_MENU: [(&str, f64); 3] = [
    ("Margherita", 150.0),
    ("Veg Burger", 120.0),
    ("Fries", 60.0),
];
