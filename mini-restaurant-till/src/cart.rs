use bigdecimal::BigDecimal;
use mini_restaurant_store::{order_total, CartLine, MenuItem, OrderStore};
use tracing::{debug, info, warn};

use crate::{CartError, Receipt};

/// Parses a quantity typed at the till. Missing, non-numeric and
/// non-positive input is rejected.
pub fn parse_quantity(raw: Option<&str>) -> Result<i32, CartError> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|q| *q > 0)
        .ok_or_else(CartError::invalid_quantity)
}

/// The order being built at the till. Nothing here is persisted until
/// [`Cart::checkout`] succeeds.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` of `item`, merging into an existing line with the
    /// same name.
    pub fn add_item(&mut self, item: &MenuItem, quantity: i32) -> Result<(), CartError> {
        if quantity <= 0 {
            debug!(item = %item.name, quantity, "rejected quantity");
            return Err(CartError::invalid_quantity());
        }

        match self.lines.iter_mut().find(|l| l.name == item.name) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| CartError::Validation("quantity is too large".to_string()))?;
                debug!(item = %item.name, quantity = line.quantity, "merged cart line");
            }
            None => {
                self.lines.push(CartLine::new(item, quantity));
                debug!(item = %item.name, quantity, "added cart line");
            }
        }
        Ok(())
    }

    pub fn add_item_input(&mut self, item: &MenuItem, raw: Option<&str>) -> Result<(), CartError> {
        let quantity = parse_quantity(raw).inspect_err(|_| {
            debug!(item = %item.name, input = ?raw, "rejected quantity input");
        })?;
        self.add_item(item, quantity)
    }

    /// Removes the line at `position`; out-of-range positions are ignored.
    pub fn remove_at(&mut self, position: usize) -> Option<CartLine> {
        if position >= self.lines.len() {
            return None;
        }
        let line = self.lines.remove(position);
        debug!(item = %line.name, position, "removed cart line");
        Some(line)
    }

    pub fn compute_total(&self) -> BigDecimal {
        order_total(&self.lines)
    }

    /// Persists the cart as an order and empties it. The cart is left as it
    /// was if the store fails.
    pub fn checkout<S: OrderStore + ?Sized>(&mut self, store: &S) -> Result<Receipt, CartError> {
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let placed = store.create_order(&self.lines).inspect_err(|e| {
            warn!(error = %e, lines = self.lines.len(), "checkout failed");
        })?;
        let receipt = Receipt::new(&placed, &self.lines);
        self.lines.clear();

        info!(order_id = placed.id, total = %placed.total, "checked out");
        Ok(receipt)
    }
}
