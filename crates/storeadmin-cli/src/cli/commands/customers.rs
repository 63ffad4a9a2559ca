use anyhow::{Context, Result};
use storeadmin_core::api::{Customer, decode_list};
use storeadmin_core::config::Config;

use super::table;
use crate::cli::session::Session;

pub async fn list(config: &Config, search: Option<&str>) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .customers(search)
        .await
        .context("list customers")?;
    let customers: Vec<Customer> = decode_list(body).context("read customers")?.into_items();

    if customers.is_empty() {
        println!("No customers found.");
        return Ok(());
    }

    let mut t = table(["Name", "Email", "Phone", "Orders", "Last order"]);
    for customer in &customers {
        t.add_row(vec![
            customer.name.clone(),
            customer.email.clone(),
            customer.phone.clone().unwrap_or_default(),
            customer.order_count.to_string(),
            customer.last_order_date.clone().unwrap_or_default(),
        ]);
    }
    println!("{t}");
    Ok(())
}
