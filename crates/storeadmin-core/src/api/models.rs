//! Resource models for the store-admin backend.
//!
//! Fields accept both the snake_case names the backend serializes and the
//! camelCase names used by older builds.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::types::{Id, flex_f64, flex_i64, flex_opt_f64, flex_u64};

// ============================================================================
// Users & auth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSummary {
    #[serde(default)]
    pub id: Option<Id>,
    pub name: String,
}

/// Authenticated store administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "avatarUrl", alias = "avatar_url")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub store: Option<StoreSummary>,
}

impl User {
    /// Name for greetings; falls back to the email local part.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        self.email.split('@').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(alias = "access_token")]
    pub token: String,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Reporting window for dashboard KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DashboardPeriod {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "this_month")]
    ThisMonth,
}

impl DashboardPeriod {
    pub fn all() -> [DashboardPeriod; 4] {
        [
            DashboardPeriod::Today,
            DashboardPeriod::Last7Days,
            DashboardPeriod::Last30Days,
            DashboardPeriod::ThisMonth,
        ]
    }

    /// Query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            DashboardPeriod::Today => "today",
            DashboardPeriod::Last7Days => "last_7_days",
            DashboardPeriod::Last30Days => "last_30_days",
            DashboardPeriod::ThisMonth => "this_month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardPeriod::Today => "Today",
            DashboardPeriod::Last7Days => "Last 7 days",
            DashboardPeriod::Last30Days => "Last 30 days",
            DashboardPeriod::ThisMonth => "This month",
        }
    }

    /// Next period in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            DashboardPeriod::Today => DashboardPeriod::Last7Days,
            DashboardPeriod::Last7Days => DashboardPeriod::Last30Days,
            DashboardPeriod::Last30Days => DashboardPeriod::ThisMonth,
            DashboardPeriod::ThisMonth => DashboardPeriod::Today,
        }
    }
}

impl fmt::Display for DashboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardPeriod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        DashboardPeriod::all()
            .into_iter()
            .find(|period| period.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown period '{value}' (expected today, last_7_days, last_30_days, this_month)"
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(alias = "day", alias = "date")]
    pub label: String,
    #[serde(default, deserialize_with = "flex_f64", alias = "amount", alias = "count")]
    pub value: f64,
}

/// KPI cards and chart series for the overview screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(
        default,
        deserialize_with = "flex_f64",
        alias = "total_revenue",
        alias = "totalRevenue"
    )]
    pub revenue: f64,
    #[serde(
        default,
        deserialize_with = "flex_u64",
        alias = "total_orders",
        alias = "totalOrders"
    )]
    pub orders: u64,
    #[serde(default, deserialize_with = "flex_u64", alias = "pendingOrders")]
    pub pending_orders: u64,
    #[serde(
        default,
        deserialize_with = "flex_u64",
        alias = "lowStock",
        alias = "low_stock_count"
    )]
    pub low_stock: u64,
    #[serde(default, deserialize_with = "flex_opt_f64", alias = "revenueChange")]
    pub revenue_change: Option<f64>,
    #[serde(default, deserialize_with = "flex_opt_f64", alias = "ordersChange")]
    pub orders_change: Option<f64>,
    #[serde(default, alias = "sales_chart", alias = "salesChart")]
    pub sales: Vec<SeriesPoint>,
    #[serde(default, alias = "orderVolume")]
    pub order_volume: Vec<SeriesPoint>,
}

// ============================================================================
// Orders
// ============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Processing,
    Paid,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn all() -> [OrderStatus; 5] {
        [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Paid,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Paid => "paid",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Paid => "Paid",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Terminal statuses cannot be changed from the console.
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "paid" => Ok(OrderStatus::Paid),
            "delivered" | "completed" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!(
                "unknown order status '{value}' (expected pending, processing, paid, delivered, cancelled)"
            )),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "one", deserialize_with = "flex_u64", alias = "qty")]
    pub quantity: u64,
    #[serde(default, deserialize_with = "flex_f64")]
    pub price: f64,
    #[serde(default, alias = "desc")]
    pub description: Option<String>,
    #[serde(default, alias = "img")]
    pub image: Option<String>,
}

fn one() -> u64 {
    1
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Id,
    #[serde(default, alias = "orderNumber")]
    pub order_number: Option<String>,
    #[serde(default, alias = "customerName")]
    pub customer_name: String,
    #[serde(default, alias = "customerAvatar")]
    pub customer_avatar: Option<String>,
    #[serde(default, alias = "customerEmail")]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "flex_f64", alias = "total")]
    pub amount: f64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Human order reference (`#ORD-9921`), falling back to the id.
    pub fn reference(&self) -> &str {
        self.order_number
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(self.id.as_str())
    }

    /// `date • time`, omitting whichever is missing.
    pub fn placed_at(&self) -> String {
        match (self.date.as_deref(), self.time.as_deref()) {
            (Some(date), Some(time)) => format!("{date} • {time}"),
            (Some(one), None) | (None, Some(one)) => one.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn items_subtotal(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// Server-side filters for the orders list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

impl OrderQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs
    }
}

/// Client-side status filter; `None` keeps everything.
pub fn filter_by_status(orders: &[Order], status: Option<OrderStatus>) -> Vec<&Order> {
    orders
        .iter()
        .filter(|order| status.is_none_or(|s| order.status == s))
        .collect()
}

// ============================================================================
// Inventory
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    #[serde(default)]
    pub sku: String,
    pub name: String,
    #[serde(default, alias = "image_url", alias = "imageUrl")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flex_i64", alias = "quantity")]
    pub stock: i64,
    #[serde(default, alias = "lowStock", alias = "is_low_stock")]
    pub low_stock: bool,
    #[serde(default, deserialize_with = "flex_opt_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Flagged by the backend, or out of stock.
    pub fn needs_restock(&self) -> bool {
        self.low_stock || self.stock <= 0
    }
}

/// Keeps only products that need restocking when `low_stock_only` is set.
pub fn filter_low_stock(products: &[Product], low_stock_only: bool) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| !low_stock_only || p.needs_restock())
        .collect()
}

// ============================================================================
// Staff
// ============================================================================

/// Access level shown on staff cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffAccess {
    #[serde(rename = "FULL ADMIN", alias = "full_admin")]
    FullAdmin,
    #[serde(rename = "POS ACCESS", alias = "pos_access")]
    PosAccess,
    #[serde(rename = "LIMITED", alias = "limited")]
    Limited,
    #[serde(rename = "BASIC", alias = "basic")]
    Basic,
}

impl StaffAccess {
    pub fn as_str(self) -> &'static str {
        match self {
            StaffAccess::FullAdmin => "FULL ADMIN",
            StaffAccess::PosAccess => "POS ACCESS",
            StaffAccess::Limited => "LIMITED",
            StaffAccess::Basic => "BASIC",
        }
    }
}

impl fmt::Display for StaffAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffAccess {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "FULL ADMIN" | "ADMIN" => Ok(StaffAccess::FullAdmin),
            "POS ACCESS" | "POS" => Ok(StaffAccess::PosAccess),
            "LIMITED" => Ok(StaffAccess::Limited),
            "BASIC" => Ok(StaffAccess::Basic),
            _ => Err(format!(
                "unknown access level '{value}' (expected full-admin, pos-access, limited, basic)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffStatus {
    #[serde(rename = "ACTIVE", alias = "active")]
    Active,
    #[serde(rename = "INACTIVE", alias = "inactive")]
    Inactive,
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffStatus::Active => f.write_str("ACTIVE"),
            StaffStatus::Inactive => f.write_str("INACTIVE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub access: StaffAccess,
    pub status: StaffStatus,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl StaffMember {
    /// Case-insensitive match on name or role.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.role.to_lowercase().contains(&query)
    }
}

pub fn filter_staff<'a>(staff: &'a [StaffMember], query: &str) -> Vec<&'a StaffMember> {
    staff.iter().filter(|m| m.matches(query)).collect()
}

pub fn active_count(staff: &[StaffMember]) -> usize {
    staff
        .iter()
        .filter(|m| m.status == StaffStatus::Active)
        .count()
}

/// Payload for `POST /staff`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStaffMember {
    pub name: String,
    pub email: String,
    pub role: String,
    pub access: StaffAccess,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ============================================================================
// Customers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "lastOrderDate")]
    pub last_order_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "flex_u64",
        alias = "orderCount",
        alias = "orders_count"
    )]
    pub order_count: u64,
    #[serde(default)]
    pub avatar: Option<String>,
}

// ============================================================================
// Profile & settings
// ============================================================================

/// Partial profile update; unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

impl PasswordChange {
    /// The confirmation always mirrors the new password.
    pub fn new(current: impl Into<String>, new: impl Into<String>) -> Self {
        let new = new.into();
        Self {
            current_password: current.into(),
            new_password_confirmation: new.clone(),
            new_password: new,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "enabled", alias = "pushNotifications")]
    pub push_notifications: bool,
    #[serde(default = "enabled", alias = "orderUpdates")]
    pub order_updates: bool,
    #[serde(default, alias = "dailyReports")]
    pub daily_reports: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            push_notifications: true,
            order_updates: true,
            daily_reports: false,
        }
    }
}

/// Which notification toggle to flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Push,
    OrderUpdates,
    DailyReports,
}

impl NotificationKind {
    pub fn all() -> [NotificationKind; 3] {
        [
            NotificationKind::Push,
            NotificationKind::OrderUpdates,
            NotificationKind::DailyReports,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationKind::Push => "Push Notifications",
            NotificationKind::OrderUpdates => "Order Updates",
            NotificationKind::DailyReports => "Daily Reports",
        }
    }
}

impl NotificationSettings {
    pub fn get(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Push => self.push_notifications,
            NotificationKind::OrderUpdates => self.order_updates,
            NotificationKind::DailyReports => self.daily_reports,
        }
    }

    /// Returns a copy with one toggle flipped.
    #[must_use]
    pub fn toggled(mut self, kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Push => self.push_notifications = !self.push_notifications,
            NotificationKind::OrderUpdates => self.order_updates = !self.order_updates,
            NotificationKind::DailyReports => self.daily_reports = !self.daily_reports,
        }
        self
    }
}

/// Image file to upload as the profile avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Reads an image from disk, sniffing the MIME type from its contents
    /// and falling back to the extension.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not an image.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read avatar from {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        Self::from_bytes(file_name, bytes)
    }

    /// # Errors
    /// Returns an error if the bytes are not a recognised image type.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let mime = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| mime_from_extension(&file_name).map(ToString::to_string))
            .with_context(|| format!("Cannot determine image type of {file_name}"))?;

        if !mime.starts_with("image/") {
            anyhow::bail!("{file_name} is not an image ({mime})");
        }

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
