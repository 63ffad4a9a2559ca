//! Effect handlers for the console runtime.
//!
//! Each handler is a plain async function that performs one request and
//! returns the `UiEvent` describing its outcome. Handlers never touch
//! `AppState`; the runtime spawns them and forwards the result to the inbox.

use std::sync::Arc;

use storeadmin_core::api::{
    ApiClient, DashboardPeriod, Id, LoginRequest, LoginResponse, NotificationSettings,
    OrderQuery, OrderStatus, decode_confirmation, decode_data, decode_list,
};
use storeadmin_core::session::SessionController;

use crate::common::TaskId;
use crate::events::{LoginError, UiEvent};

pub async fn login(
    api: ApiClient,
    controller: Arc<SessionController>,
    request: LoginRequest,
) -> UiEvent {
    let response = api
        .login(&request)
        .await
        .and_then(decode_data::<LoginResponse>);

    let result = match response {
        Ok(LoginResponse { user, token }) => {
            controller.login(user, &token).map_err(|err| {
                tracing::error!(error = %format!("{err:#}"), "failed to persist credential");
                LoginError::new(format!("Signed in, but the session could not be saved: {err}"))
            })
        }
        Err(err) => {
            tracing::info!(kind = %err.kind(), "login rejected");
            Err(LoginError::from(&err))
        }
    };
    UiEvent::LoginFinished(result)
}

pub async fn dashboard(api: ApiClient, period: DashboardPeriod) -> UiEvent {
    let result = api.dashboard(period).await.and_then(decode_data);
    UiEvent::DashboardLoaded { period, result }
}

/// Loads every order; the status filter is applied locally.
pub async fn orders(api: ApiClient) -> UiEvent {
    let result = api
        .orders(&OrderQuery::default())
        .await
        .and_then(decode_list)
        .map(|list| list.into_items());
    UiEvent::OrdersLoaded(result)
}

pub async fn order(api: ApiClient, id: Id) -> UiEvent {
    UiEvent::OrderLoaded(api.order(&id).await.and_then(decode_data))
}

pub async fn update_order_status(api: ApiClient, id: Id, status: OrderStatus) -> UiEvent {
    let result = api
        .update_order_status(&id, status)
        .await
        .and_then(|body| decode_confirmation(&body));
    UiEvent::OrderStatusUpdated { id, status, result }
}

pub async fn products(api: ApiClient, ticket: TaskId, search: Option<String>) -> UiEvent {
    let result = api
        .products(search.as_deref())
        .await
        .and_then(decode_list)
        .map(|list| list.into_items());
    UiEvent::ProductsLoaded { ticket, result }
}

pub async fn product(api: ApiClient, id: Id) -> UiEvent {
    UiEvent::ProductLoaded(api.product(&id).await.and_then(decode_data))
}

pub async fn update_stock(api: ApiClient, id: Id, quantity: i64) -> UiEvent {
    let result = api
        .update_product_stock(&id, quantity)
        .await
        .and_then(|body| decode_confirmation(&body));
    UiEvent::StockUpdated {
        id,
        quantity,
        result,
    }
}

pub async fn customers(api: ApiClient, ticket: TaskId, search: Option<String>) -> UiEvent {
    let result = api
        .customers(search.as_deref())
        .await
        .and_then(decode_list)
        .map(|list| list.into_items());
    UiEvent::CustomersLoaded { ticket, result }
}

pub async fn staff(api: ApiClient) -> UiEvent {
    let result = api
        .staff()
        .await
        .and_then(decode_list)
        .map(|list| list.into_items());
    UiEvent::StaffLoaded(result)
}

pub async fn save_notifications(
    api: ApiClient,
    settings: NotificationSettings,
    previous: NotificationSettings,
) -> UiEvent {
    let result = api
        .update_notification_settings(&settings)
        .await
        .and_then(|body| decode_confirmation(&body));
    UiEvent::NotificationsSaved { previous, result }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storeadmin_core::credentials::{CredentialStore, MemoryCredentialStore};
    use storeadmin_core::session::Screen;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer, credentials: Arc<dyn CredentialStore>) -> ApiClient {
        ApiClient::new(&server.uri(), None, credentials).unwrap()
    }

    #[tokio::test]
    async fn test_login_enters_overview_and_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store-admin/login"))
            .and(body_json(json!({"email": "a@b.test", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"user": {"id": 3, "name": "Amina"}, "token": "tok-1"}
            })))
            .mount(&server)
            .await;

        let credentials: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let controller = Arc::new(SessionController::new(Arc::clone(&credentials)));
        let request = LoginRequest {
            email: "a@b.test".to_string(),
            password: "pw".to_string(),
        };

        let event = login(
            client(&server, Arc::clone(&credentials)),
            Arc::clone(&controller),
            request,
        )
        .await;

        assert!(matches!(event, UiEvent::LoginFinished(Ok(()))));
        assert_eq!(controller.current_view().screen(), Some(Screen::Overview));
        assert_eq!(credentials.get().unwrap().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_login_validation_errors_reach_the_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store-admin/login"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "success": false,
                "message": "The given data was invalid.",
                "errors": {"email": ["The email field must be a valid email address."]}
            })))
            .mount(&server)
            .await;

        let credentials: Arc<dyn CredentialStore> = Arc::new(MemoryCredentialStore::new());
        let controller = Arc::new(SessionController::new(Arc::clone(&credentials)));
        let request = LoginRequest {
            email: "nope".to_string(),
            password: "pw".to_string(),
        };

        let UiEvent::LoginFinished(Err(err)) =
            login(client(&server, credentials), Arc::clone(&controller), request).await
        else {
            panic!("expected a failed login");
        };
        assert_eq!(
            err.field_errors.get("email").map(Vec::as_slice),
            Some(&["The email field must be a valid email address.".to_string()][..])
        );
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_products_keep_ticket_and_pass_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/store-admin/products"))
            .and(query_param("search", "oat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"data": [{"id": 1, "name": "Oat Milk", "stock": "4"}], "total": 1}
            })))
            .mount(&server)
            .await;

        let api = client(&server, Arc::new(MemoryCredentialStore::with_token("t")));
        let ticket = crate::common::TaskSeq::default().next_id();

        let UiEvent::ProductsLoaded { ticket: got, result } =
            products(api, ticket, Some("oat".to_string())).await
        else {
            panic!("expected ProductsLoaded");
        };
        assert_eq!(got, ticket);
        let products = result.unwrap();
        assert_eq!(products[0].name, "Oat Milk");
        assert_eq!(products[0].stock, 4);
    }

    #[tokio::test]
    async fn test_rejected_stock_update_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/store-admin/products/9/stock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Stock cannot be negative"
            })))
            .mount(&server)
            .await;

        let api = client(&server, Arc::new(MemoryCredentialStore::with_token("t")));
        let UiEvent::StockUpdated { result, .. } = update_stock(api, Id::from(9u64), 3).await
        else {
            panic!("expected StockUpdated");
        };
        assert_eq!(result.unwrap_err().message(), "Stock cannot be negative");
    }
}
