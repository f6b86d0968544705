use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use chrono::NaiveDateTime;

use crate::{models, StoreError};

/// Order timestamps are stored as ISO-8601 local time with second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub price: BigDecimal,
}

impl TryFrom<models::MenuRow> for MenuItem {
    type Error = StoreError;

    fn try_from(row: models::MenuRow) -> Result<Self, Self::Error> {
        let price = from_real(row.price)?;
        if row.name.is_empty() || price < BigDecimal::zero() {
            return Err(StoreError::InvalidValue(format!(
                "menu item {} ({:?}, {})",
                row.id, row.name, row.price
            )));
        }
        Ok(MenuItem {
            id: row.id,
            name: row.name,
            price,
        })
    }
}

/// One selected menu item in a pending order.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub menu_item_id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl CartLine {
    pub fn new(item: &MenuItem, quantity: i32) -> Self {
        Self {
            menu_item_id: item.id,
            name: item.name.clone(),
            quantity,
            unit_price: item.price.clone(),
        }
    }

    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * &BigDecimal::from(self.quantity)
    }
}

pub fn order_total(lines: &[CartLine]) -> BigDecimal {
    lines.iter().map(CartLine::subtotal).sum()
}

/// What the store hands back once an order is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub total: BigDecimal,
}

impl PlacedOrder {
    pub fn timestamp(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

// SQLite keeps money as REAL; go through the shortest decimal form so that
// 150.0 reads back as 150 and not as its binary expansion.
pub(crate) fn from_real(value: f64) -> Result<BigDecimal, StoreError> {
    value
        .to_string()
        .parse::<BigDecimal>()
        .map_err(|_| StoreError::InvalidValue(format!("{} is not a decimal amount", value)))
}

pub(crate) fn to_real(value: &BigDecimal) -> Result<f64, StoreError> {
    value
        .to_f64()
        .ok_or_else(|| StoreError::InvalidValue(format!("{} does not fit a REAL column", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fries() -> MenuItem {
        MenuItem {
            id: 3,
            name: "Fries".to_string(),
            price: BigDecimal::from(60),
        }
    }

    #[test]
    fn test_subtotal_multiplies_quantity() {
        let line = CartLine::new(&fries(), 4);
        assert_eq!(line.subtotal(), BigDecimal::from(240));
    }

    #[test]
    fn test_order_total_of_no_lines_is_zero() {
        assert_eq!(order_total(&[]), BigDecimal::zero());
    }

    #[test]
    fn test_from_real_keeps_short_decimal() {
        let price = from_real(0.1).unwrap();
        assert_eq!(price, "0.1".parse::<BigDecimal>().unwrap());
        assert!(from_real(f64::NAN).is_err());
    }

    #[test]
    fn test_menu_row_with_negative_price_is_rejected() {
        let row = models::MenuRow {
            id: 9,
            name: "Refund".to_string(),
            price: -1.0,
        };
        assert!(matches!(
            MenuItem::try_from(row),
            Err(StoreError::InvalidValue(_))
        ));
    }
}
