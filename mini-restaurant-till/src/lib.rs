pub mod cart;
pub mod error;
pub mod receipt;
pub mod shell;

pub use cart::{parse_quantity, Cart};
pub use error::CartError;
pub use receipt::{format_money, Receipt};
pub use shell::Shell;
