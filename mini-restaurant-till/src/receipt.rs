use std::fmt;

use bigdecimal::{BigDecimal, RoundingMode};
use mini_restaurant_store::{CartLine, PlacedOrder};

pub fn format_money(amount: &BigDecimal) -> String {
    format!("₹{}", amount.with_scale_round(2, RoundingMode::HalfUp))
}

/// Summary of a committed order as shown to the customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub order_id: i32,
    pub timestamp: String,
    pub lines: Vec<String>,
    pub total: BigDecimal,
}

impl Receipt {
    pub fn new(order: &PlacedOrder, lines: &[CartLine]) -> Self {
        Self {
            order_id: order.id,
            timestamp: order.timestamp(),
            lines: lines
                .iter()
                .map(|l| format!("{} x{} {}", l.name, l.quantity, format_money(&l.subtotal())))
                .collect(),
            total: order.total.clone(),
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order #{}", self.order_id)?;
        writeln!(f, "Time: {}", self.timestamp)?;
        writeln!(f)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        write!(f, "Total: {}", format_money(&self.total))
    }
}
