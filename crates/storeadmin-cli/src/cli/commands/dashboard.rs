use anyhow::{Context, Result};
use storeadmin_core::api::{DashboardPeriod, DashboardStats, decode_data};
use storeadmin_core::config::Config;
use storeadmin_core::format::format_money;

use super::table;
use crate::cli::session::Session;

pub async fn show(config: &Config, period: DashboardPeriod) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .dashboard(period)
        .await
        .with_context(|| format!("load dashboard for {period}"))?;
    let stats: DashboardStats = decode_data(body).context("read dashboard")?;

    println!("{}", period.label());
    println!(
        "Revenue:        {}{}",
        format_money(stats.revenue),
        change(stats.revenue_change)
    );
    println!("Orders:         {}{}", stats.orders, change(stats.orders_change));
    println!("Pending orders: {}", stats.pending_orders);
    println!("Low stock:      {}", stats.low_stock);

    if !stats.sales.is_empty() || !stats.order_volume.is_empty() {
        let mut t = table(["", "Sales", "Orders"]);
        let len = stats.sales.len().max(stats.order_volume.len());
        for i in 0..len {
            let sales = stats.sales.get(i);
            let volume = stats.order_volume.get(i);
            let label = sales.or(volume).map(|p| p.label.clone()).unwrap_or_default();
            t.add_row(vec![
                label,
                sales.map(|p| format_money(p.value)).unwrap_or_default(),
                volume.map(|p| format!("{:.0}", p.value)).unwrap_or_default(),
            ]);
        }
        println!();
        println!("{t}");
    }
    Ok(())
}

fn change(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("  ({v:+.0}%)"))
}
