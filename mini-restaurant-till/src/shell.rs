use std::io::{self, BufRead, Write};

use mini_restaurant_store::{MenuItem, OrderStore};
use tracing::{debug, error};

use crate::{format_money, Cart, CartError};

const HELP: &str = "Commands:
  menu              show the menu
  add <n> [qty]     add menu item n to the cart
  remove <n>        remove cart line n
  cart              show the cart and total
  checkout          place the order
  help              show this message
  quit              leave the till";

enum Command<'a> {
    Menu,
    Add(Option<&'a str>, Option<&'a str>),
    Remove(Option<&'a str>),
    Cart,
    Checkout,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "menu" => Command::Menu,
            "add" => Command::Add(words.next(), words.next()),
            "remove" | "rm" => Command::Remove(words.next()),
            "cart" => Command::Cart,
            "checkout" => Command::Checkout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other),
        };
        Some(command)
    }
}

// Menu and cart positions are shown 1-based.
fn position(raw: Option<&str>) -> Option<usize> {
    raw?.parse::<usize>().ok()?.checked_sub(1)
}

pub fn write_menu<W: Write>(out: &mut W, menu: &[MenuItem]) -> io::Result<()> {
    writeln!(out, "Menu")?;
    for (i, item) in menu.iter().enumerate() {
        writeln!(out, "  {}. {} — {}", i + 1, item.name, format_money(&item.price))?;
    }
    Ok(())
}

pub fn write_cart<W: Write>(out: &mut W, cart: &Cart) -> io::Result<()> {
    writeln!(out, "Cart")?;
    if cart.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for (i, line) in cart.lines().iter().enumerate() {
        writeln!(
            out,
            "  {}. {} x{} — {}",
            i + 1,
            line.name,
            line.quantity,
            format_money(&line.subtotal())
        )?;
    }
    writeln!(out, "Total: {}", format_money(&cart.compute_total()))
}

/// Line-oriented till session. The menu is read once when the session
/// starts; the cart lives only as long as the shell.
pub struct Shell<'a, S: ?Sized, R, W> {
    store: &'a S,
    menu: Vec<MenuItem>,
    cart: Cart,
    input: R,
    output: W,
}

impl<'a, S, R, W> Shell<'a, S, R, W>
where
    S: OrderStore + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(store: &'a S, menu: Vec<MenuItem>, input: R, output: W) -> Self {
        Self {
            store,
            menu,
            cart: Cart::new(),
            input,
            output,
        }
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        write_menu(&mut self.output, &self.menu)?;
        writeln!(self.output, "Type `help` for commands.")?;

        while let Some(line) = self.prompt("> ")? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            match command {
                Command::Menu => write_menu(&mut self.output, &self.menu)?,
                Command::Add(item, quantity) => self.add(item, quantity)?,
                Command::Remove(raw) => self.remove(raw)?,
                Command::Cart => write_cart(&mut self.output, &self.cart)?,
                Command::Checkout => self.checkout()?,
                Command::Help => writeln!(self.output, "{}", HELP)?,
                Command::Quit => break,
                Command::Unknown(word) => {
                    writeln!(self.output, "Unknown command `{}`. Type `help`.", word)?
                }
            }
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn add(&mut self, item: Option<&str>, quantity: Option<&str>) -> io::Result<()> {
        let Some(item) = position(item).and_then(|i| self.menu.get(i)).cloned() else {
            return writeln!(self.output, "Choose an item first");
        };

        let typed;
        let raw = match quantity {
            Some(q) => Some(q),
            None => {
                typed = self.prompt("Enter quantity: ")?.map(|s| {
                    if s.is_empty() {
                        "1".to_string()
                    } else {
                        s
                    }
                });
                typed.as_deref()
            }
        };

        match self.cart.add_item_input(&item, raw) {
            Ok(()) => write_cart(&mut self.output, &self.cart),
            Err(CartError::Validation(_)) => {
                writeln!(self.output, "Invalid: Quantity must be a positive integer")
            }
            Err(e) => writeln!(self.output, "{}", e),
        }
    }

    fn remove(&mut self, raw: Option<&str>) -> io::Result<()> {
        match position(raw).and_then(|i| self.cart.remove_at(i)) {
            Some(_) => write_cart(&mut self.output, &self.cart),
            None => {
                debug!(selection = ?raw, "ignored remove without a valid selection");
                Ok(())
            }
        }
    }

    fn checkout(&mut self) -> io::Result<()> {
        if self.cart.is_empty() {
            return writeln!(self.output, "Cart is empty");
        }

        let answer = self.prompt("Place order? [y/N] ")?.unwrap_or_default();
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            return Ok(());
        }

        match self.cart.checkout(self.store) {
            Ok(receipt) => {
                writeln!(self.output, "{}", receipt)?;
                write_cart(&mut self.output, &self.cart)
            }
            Err(CartError::EmptyCart) => writeln!(self.output, "Cart is empty"),
            Err(e) => {
                error!(error = %e, "order was not saved");
                writeln!(self.output, "Could not place the order. Please try again.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use diesel::connection::SimpleConnection;
    use diesel::prelude::*;
    use mini_restaurant_store::{models, schema, Store};
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("till.db").to_string_lossy());
        store.initialize().unwrap();
        (dir, store)
    }

    fn run_session(store: &Store, input: &str) -> (String, Cart) {
        let menu = store.list_menu().unwrap();
        let mut shell = Shell::new(store, menu, input.as_bytes(), Vec::new());
        shell.run().unwrap();
        let Shell { cart, output, .. } = shell;
        (String::from_utf8(output).unwrap(), cart)
    }

    #[test]
    fn test_menu_is_shown_on_start() {
        let (_dir, store) = setup_store();
        let (output, _) = run_session(&store, "");

        assert!(output.contains("  1. Margherita — ₹150.00"));
        assert!(output.contains("  2. Veg Burger — ₹120.00"));
        assert!(output.contains("  3. Fries — ₹60.00"));
    }

    #[test]
    fn test_add_merges_and_shows_total() {
        let (_dir, store) = setup_store();
        let (output, cart) = run_session(&store, "add 3 2\nadd 3\n3\n");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert!(output.contains("  1. Fries x5 — ₹300.00"));
        assert!(output.contains("Total: ₹300.00"));
    }

    #[test]
    fn test_add_defaults_to_one() {
        let (_dir, store) = setup_store();
        let (output, cart) = run_session(&store, "add 1\n\n");

        assert!(output.contains("Enter quantity: "));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let (_dir, store) = setup_store();
        let (output, cart) = run_session(&store, "add 1 zero\nadd 1 -2\nadd\nadd 9 1\n");

        assert!(cart.is_empty());
        assert_eq!(
            output
                .matches("Invalid: Quantity must be a positive integer")
                .count(),
            2
        );
        assert_eq!(output.matches("Choose an item first").count(), 2);
    }

    #[test]
    fn test_remove_ignores_bad_selection() {
        let (_dir, store) = setup_store();
        let (_, cart) = run_session(&store, "add 1 1\nadd 2 1\nremove\nremove 0\nremove 5\nremove 1\n");

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].name, "Veg Burger");
    }

    #[test]
    fn test_checkout_empty_cart() {
        let (_dir, store) = setup_store();
        let (output, _) = run_session(&store, "checkout\n");

        assert!(output.contains("Cart is empty"));
        let conn = &mut store.establish_connection().unwrap();
        let count: i64 = schema::orders::table.count().get_result(conn).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_checkout_declined_keeps_cart() {
        let (_dir, store) = setup_store();
        let (_, cart) = run_session(&store, "add 1 2\ncheckout\nn\n");

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_checkout_prints_receipt() {
        let (_dir, store) = setup_store();
        let (output, cart) = run_session(&store, "add 1 2\nadd 2 1\ncheckout\ny\nquit\nadd 3 1\n");

        assert!(cart.is_empty());
        assert!(output.contains("Order #1\nTime: "));
        assert!(output.contains("Margherita x2 ₹300.00\nVeg Burger x1 ₹120.00\n\nTotal: ₹420.00"));

        let conn = &mut store.establish_connection().unwrap();
        let orders = schema::orders::table
            .select(models::Order::as_select())
            .load(conn)
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, 420.0);
        let items: i64 = schema::order_items::table
            .filter(schema::order_items::order_id.eq(orders[0].id))
            .count()
            .get_result(conn)
            .unwrap();
        assert_eq!(items, 2);
    }

    #[test]
    fn test_checkout_failure_keeps_cart() {
        let (_dir, store) = setup_store();
        store
            .establish_connection()
            .unwrap()
            .batch_execute("DROP TABLE order_items;")
            .unwrap();

        let (output, cart) = run_session(&store, "add 1 2\nadd 3 1\ncheckout\nyes\n");

        assert!(output.contains("Could not place the order."));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.compute_total(), BigDecimal::from(360));
        let conn = &mut store.establish_connection().unwrap();
        let count: i64 = schema::orders::table.count().get_result(conn).unwrap();
        assert_eq!(count, 0);
    }
}
