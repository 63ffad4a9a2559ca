//! Authenticated access to the store-admin REST backend.

mod client;
mod error;
mod models;
mod resources;
pub mod types;

pub use client::{ApiClient, AuthExpiredListener, RequestBody, RequestOptions};
pub use error::{ApiError, ApiErrorKind, ApiResult, DEFAULT_ERROR_MESSAGE, FieldErrors};
pub use resources::STORE_ADMIN_PREFIX;
pub use types::{
    AvatarUpload, Customer, DashboardPeriod, DashboardStats, Envelope, Id, ListPayload,
    LoginRequest, LoginResponse, NewStaffMember, NotificationKind, NotificationSettings, Order,
    OrderItem, OrderQuery, OrderStatus, Page, PasswordChange, Product, ProfileUpdate, SeriesPoint,
    StaffAccess, StaffMember, StaffStatus, StoreSummary, User, active_count, decode_confirmation,
    decode_data, decode_list, decode_user, envelope_message, filter_by_status, filter_low_stock,
    filter_staff,
};
