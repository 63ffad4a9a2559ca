use anyhow::{Context, Result};
use storeadmin_core::api::{
    Id, Order, OrderQuery, OrderStatus, decode_confirmation, decode_data, decode_list,
    filter_by_status,
};
use storeadmin_core::config::Config;
use storeadmin_core::format::format_money;

use super::{confirm, table};
use crate::cli::session::Session;

pub async fn list(config: &Config, status: Option<OrderStatus>, search: Option<String>) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let query = OrderQuery { status, search };
    let body = session.api.orders(&query).await.context("list orders")?;
    let orders: Vec<Order> = decode_list(body).context("read orders")?.into_items();

    // The backend may ignore the status parameter
    let orders = filter_by_status(&orders, status);
    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    let mut t = table(["Order", "Customer", "Placed", "Status", "Amount"]);
    for order in &orders {
        t.add_row(vec![
            order.reference().to_string(),
            order.customer_name.clone(),
            order.placed_at(),
            order.status.label().to_string(),
            format_money(order.amount),
        ]);
    }
    println!("{t}");
    println!("{} order(s)", orders.len());
    Ok(())
}

pub async fn show(config: &Config, id: &Id) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .order(id)
        .await
        .with_context(|| format!("load order {id}"))?;
    let order: Order = decode_data(body).context("read order")?;

    println!("Order {}", order.reference());
    println!("Customer: {}", order.customer_name);
    if let Some(email) = &order.customer_email {
        println!("Email:    {email}");
    }
    println!("Placed:   {}", order.placed_at());
    println!("Status:   {}", order.status.label());

    if !order.items.is_empty() {
        let mut t = table(["Item", "Qty", "Price", "Total"]);
        for item in &order.items {
            t.add_row(vec![
                item.name.clone(),
                item.quantity.to_string(),
                format_money(item.price),
                format_money(item.line_total()),
            ]);
        }
        println!("{t}");
    }
    println!("Total:    {}", format_money(order.amount));
    Ok(())
}

pub async fn set_status(config: &Config, id: &Id, status: OrderStatus) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .update_order_status(id, status)
        .await
        .with_context(|| format!("update order {id}"))?;
    let message = decode_confirmation(&body)?;
    confirm(message, &format!("Order {id} is now {}", status.label()));
    Ok(())
}
