use mini_restaurant_store::StoreError;
use thiserror::Error;

pub const INVALID_QUANTITY: &str = "quantity must be a positive integer";

#[derive(Error, Debug)]
pub enum CartError {
    #[error("{0}")]
    Validation(String),
    #[error("cart is empty")]
    EmptyCart,
    #[error("failed to place order: {0}")]
    Storage(#[from] StoreError),
}

impl CartError {
    pub fn invalid_quantity() -> Self {
        CartError::Validation(INVALID_QUANTITY.to_string())
    }
}
