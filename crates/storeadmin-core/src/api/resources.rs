//! Typed wrappers over [`ApiClient::request`], one per backend endpoint.
//!
//! Each wrapper returns the raw JSON body; decode it with
//! [`decode_data`](super::decode_data) or [`decode_list`](super::decode_list).

use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

use super::client::{ApiClient, RequestOptions, to_body};
use super::error::{ApiError, ApiResult};
use super::types::{
    AvatarUpload, DashboardPeriod, Id, LoginRequest, NewStaffMember, NotificationSettings,
    OrderQuery, OrderStatus, PasswordChange, ProfileUpdate,
};

/// Path prefix shared by every store-admin endpoint.
pub const STORE_ADMIN_PREFIX: &str = "/store-admin";

fn endpoint(path: &str) -> String {
    format!("{STORE_ADMIN_PREFIX}{path}")
}

/// Path segments for `/store-admin/<collection>/<id>[/<action>]`.
fn resource<'a>(collection: &'a str, id: &'a Id, action: Option<&'a str>) -> Vec<&'a str> {
    let mut segments: Vec<&str> = STORE_ADMIN_PREFIX
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    segments.extend([collection, id.as_str()]);
    segments.extend(action);
    segments
}

fn search_pairs(search: Option<&str>) -> Vec<(String, String)> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| vec![("search".to_string(), s.to_string())])
        .unwrap_or_default()
}

impl ApiClient {
    /// `POST /login`
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<Value> {
        self.request(
            &endpoint("/login"),
            RequestOptions::post().json(to_body(credentials)?),
        )
        .await
    }

    /// `GET /dashboard?period=`
    pub async fn dashboard(&self, period: DashboardPeriod) -> ApiResult<Value> {
        self.request(
            &endpoint("/dashboard"),
            RequestOptions::get().query("period", period.as_str()),
        )
        .await
    }

    /// `GET /orders`
    pub async fn orders(&self, query: &OrderQuery) -> ApiResult<Value> {
        self.request(
            &endpoint("/orders"),
            RequestOptions::get().query_pairs(query.to_pairs()),
        )
        .await
    }

    /// `GET /orders/:id`
    pub async fn order(&self, id: &Id) -> ApiResult<Value> {
        self.request_at(resource("orders", id, None), RequestOptions::get())
            .await
    }

    /// `PATCH /orders/:id/status`
    pub async fn update_order_status(&self, id: &Id, status: OrderStatus) -> ApiResult<Value> {
        self.request_at(
            resource("orders", id, Some("status")),
            RequestOptions::patch().json(json!({ "status": status.as_str() })),
        )
        .await
    }

    /// `GET /products?search=`
    pub async fn products(&self, search: Option<&str>) -> ApiResult<Value> {
        self.request(
            &endpoint("/products"),
            RequestOptions::get().query_pairs(search_pairs(search)),
        )
        .await
    }

    /// `GET /products/:id`
    pub async fn product(&self, id: &Id) -> ApiResult<Value> {
        self.request_at(resource("products", id, None), RequestOptions::get())
            .await
    }

    /// `PATCH /products/:id/stock`
    pub async fn update_product_stock(&self, id: &Id, quantity: i64) -> ApiResult<Value> {
        self.request_at(
            resource("products", id, Some("stock")),
            RequestOptions::patch().json(json!({ "quantity": quantity })),
        )
        .await
    }

    /// `GET /staff`
    pub async fn staff(&self) -> ApiResult<Value> {
        self.request(&endpoint("/staff"), RequestOptions::get()).await
    }

    /// `POST /staff`
    pub async fn add_staff(&self, member: &NewStaffMember) -> ApiResult<Value> {
        self.request(
            &endpoint("/staff"),
            RequestOptions::post().json(to_body(member)?),
        )
        .await
    }

    /// `GET /customers?search=`
    pub async fn customers(&self, search: Option<&str>) -> ApiResult<Value> {
        self.request(
            &endpoint("/customers"),
            RequestOptions::get().query_pairs(search_pairs(search)),
        )
        .await
    }

    /// `GET /user`
    pub async fn current_user(&self) -> ApiResult<Value> {
        self.request(&endpoint("/user"), RequestOptions::get()).await
    }

    /// `PUT /profile`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<Value> {
        self.request(
            &endpoint("/profile"),
            RequestOptions::put().json(to_body(update)?),
        )
        .await
    }

    /// `POST /avatar` as `multipart/form-data` with an `avatar` file part.
    pub async fn update_avatar(&self, upload: AvatarUpload) -> ApiResult<Value> {
        let AvatarUpload {
            file_name,
            mime,
            bytes,
        } = upload;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::decode(format!("Invalid avatar type {mime}: {e}")))?;
        let form = Form::new().part("avatar", part);

        self.request(&endpoint("/avatar"), RequestOptions::post().multipart(form))
            .await
    }

    /// `PUT /password`
    pub async fn update_password(&self, change: &PasswordChange) -> ApiResult<Value> {
        self.request(
            &endpoint("/password"),
            RequestOptions::put().json(to_body(change)?),
        )
        .await
    }

    /// `PUT /notification-settings`
    pub async fn update_notification_settings(
        &self,
        settings: &NotificationSettings,
    ) -> ApiResult<Value> {
        self.request(
            &endpoint("/notification-settings"),
            RequestOptions::put().json(to_body(settings)?),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;
    use crate::api::{ListPayload, Order, decode_data, decode_list};
    use crate::credentials::MemoryCredentialStore;

    fn client(server: &MockServer) -> ApiClient {
        let store = Arc::new(MemoryCredentialStore::with_token("tok"));
        ApiClient::new(&server.uri(), Some(Duration::from_secs(5)), store).unwrap()
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store-admin/login"))
            .and(body_json(json!({"email": "a@b.c", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"user": {"id": 7, "name": "A"}, "token": "tok-new"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server)
            .login(&LoginRequest {
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        let login: crate::api::LoginResponse = decode_data(body).unwrap();
        assert_eq!(login.token, "tok-new");
        assert_eq!(login.user.id, Id::from("7"));
    }

    #[tokio::test]
    async fn test_dashboard_sends_period() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store-admin/dashboard"))
            .and(query_param("period", "last_30_days"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .dashboard(DashboardPeriod::Last30Days)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_orders_list_and_status_update() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store-admin/orders"))
            .and(query_param("status", "paid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{"id": "#ORD-1", "customer_name": "Jane", "status": "paid", "amount": 12}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/store-admin/orders/%23ORD-1/status"))
            .and(body_json(json!({"status": "delivered"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Order updated"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let query = OrderQuery {
            status: Some(OrderStatus::Paid),
            search: None,
        };
        let orders: ListPayload<Order> = decode_list(api.orders(&query).await.unwrap()).unwrap();
        let first = &orders.items()[0];

        let body = api
            .update_order_status(&first.id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(crate::api::envelope_message(&body), Some("Order updated"));
    }

    #[tokio::test]
    async fn test_stock_update_sends_quantity() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/store-admin/products/12/stock"))
            .and(body_json(json!({"quantity": 40})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_product_stock(&Id::from("12"), 40)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_blank_search_is_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store-admin/customers"))
            .respond_with(|req: &Request| {
                let has_search = req.url.query_pairs().any(|(k, _)| k == "search");
                ResponseTemplate::new(if has_search { 400 } else { 200 })
                    .set_body_json(json!({"success": true, "data": []}))
            })
            .mount(&server)
            .await;

        client(&server).customers(Some("   ")).await.unwrap();
    }

    #[tokio::test]
    async fn test_password_change_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/store-admin/password"))
            .and(body_json(json!({
                "current_password": "old",
                "new_password": "new",
                "new_password_confirmation": "new"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_password(&PasswordChange::new("old", "new"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_avatar_upload_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store-admin/avatar"))
            .and(header_regex("content-type", "^multipart/form-data; boundary="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let upload = AvatarUpload {
            file_name: "me.png".to_string(),
            mime: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        client(&server).update_avatar(upload).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"avatar\""));
        assert!(body.contains("filename=\"me.png\""));
    }

    #[tokio::test]
    async fn test_notification_settings_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/store-admin/notification-settings"))
            .and(body_json(json!({
                "push_notifications": false,
                "order_updates": true,
                "daily_reports": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let settings = NotificationSettings {
            push_notifications: false,
            ..Default::default()
        };
        client(&server)
            .update_notification_settings(&settings)
            .await
            .unwrap();
    }
}
