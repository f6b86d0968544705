use diesel::prelude::*;

use crate::schema::{menu, order_items, orders};

#[derive(Queryable, Selectable, Identifiable, Debug, PartialEq)]
#[diesel(table_name = menu)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MenuRow {
    pub id: i32,
    pub name: String,
    pub price: f64,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = menu)]
pub struct NewMenuRow<'a> {
    pub name: &'a str,
    pub price: f64,
}

/// Stored order header, for reading committed orders back.
#[derive(Queryable, Selectable, Identifiable, Debug, PartialEq)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Order {
    pub id: i32,
    pub ts: String,
    pub total: f64,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub ts: String,
    pub total: f64,
}

/// Stored order line, loaded per order with `OrderItem::belonging_to`.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, PartialEq)]
#[diesel(belongs_to(Order))]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub name: String,
    pub qty: i32,
    pub price: f64,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub name: &'a str,
    pub qty: i32,
    pub price: f64,
}
