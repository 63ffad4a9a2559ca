use anyhow::{Context, Result};
use storeadmin_core::api::{
    Id, Product, decode_confirmation, decode_data, decode_list, filter_low_stock,
};
use storeadmin_core::config::Config;
use storeadmin_core::format::format_money;

use super::{confirm, table};
use crate::cli::session::Session;

pub async fn list(config: &Config, search: Option<&str>, low_stock: bool) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session.api.products(search).await.context("list products")?;
    let products: Vec<Product> = decode_list(body).context("read products")?.into_items();

    let products = filter_low_stock(&products, low_stock);
    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    let mut t = table(["ID", "SKU", "Name", "Stock", "Price", ""]);
    for product in &products {
        t.add_row(vec![
            product.id.to_string(),
            product.sku.clone(),
            product.name.clone(),
            product.stock.to_string(),
            product.price.map(format_money).unwrap_or_default(),
            if product.needs_restock() {
                "LOW".to_string()
            } else {
                String::new()
            },
        ]);
    }
    println!("{t}");
    Ok(())
}

pub async fn show(config: &Config, id: &Id) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .product(id)
        .await
        .with_context(|| format!("load product {id}"))?;
    let product: Product = decode_data(body).context("read product")?;

    println!("{}", product.name);
    if !product.sku.is_empty() {
        println!("SKU:      {}", product.sku);
    }
    if let Some(category) = &product.category {
        println!("Category: {category}");
    }
    if let Some(price) = product.price {
        println!("Price:    {}", format_money(price));
    }
    let flag = if product.needs_restock() {
        " (low stock)"
    } else {
        ""
    };
    println!("Stock:    {}{flag}", product.stock);
    Ok(())
}

pub async fn set_stock(config: &Config, id: &Id, quantity: i64) -> Result<()> {
    if quantity < 0 {
        anyhow::bail!("Stock cannot be negative");
    }
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .update_product_stock(id, quantity)
        .await
        .with_context(|| format!("update stock of product {id}"))?;
    let message = decode_confirmation(&body)?;
    confirm(message, &format!("Product {id} stock set to {quantity}"));
    Ok(())
}
