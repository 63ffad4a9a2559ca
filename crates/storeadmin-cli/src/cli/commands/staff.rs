use anyhow::{Context, Result};
use storeadmin_core::api::{
    NewStaffMember, StaffMember, active_count, decode_confirmation, decode_list, filter_staff,
};
use storeadmin_core::config::Config;

use super::{confirm, table};
use crate::cli::session::Session;

pub async fn list(config: &Config, filter: Option<&str>) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session.api.staff().await.context("list staff")?;
    let staff: Vec<StaffMember> = decode_list(body).context("read staff")?.into_items();

    let shown = filter_staff(&staff, filter.unwrap_or_default());
    if shown.is_empty() {
        println!("No staff members match.");
    } else {
        let mut t = table(["Name", "Role", "Access", "Status", "Email"]);
        for member in &shown {
            t.add_row(vec![
                member.name.clone(),
                member.role.clone(),
                member.access.to_string(),
                member.status.to_string(),
                member.email.clone().unwrap_or_default(),
            ]);
        }
        println!("{t}");
    }
    println!("{} active of {}", active_count(&staff), staff.len());
    Ok(())
}

pub async fn add(config: &Config, member: &NewStaffMember) -> Result<()> {
    let (session, _) = Session::require_login(config).await?;
    let body = session
        .api
        .add_staff(member)
        .await
        .with_context(|| format!("add staff member {}", member.name))?;
    let message = decode_confirmation(&body)?;
    confirm(message, &format!("Added {} as {}", member.name, member.access));
    Ok(())
}
