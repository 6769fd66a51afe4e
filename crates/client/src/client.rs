//! HTTP client for the storefront API.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use shopfront_core::Username;
use shopfront_core::api::{
    CheckoutResponse, ErrorResponse, LoginRequest, LoginResponse, MessageResponse, Product,
    SessionResponse,
};

use crate::cart::{Cart, CartError, LastTransaction};
use crate::error::ClientError;
use crate::session::SessionContext;

/// Client for one storefront.
///
/// Anonymous calls go through a shared HTTP client. [`login`](Self::login)
/// creates a separate client with its own cookie jar and hands it back
/// inside a [`SessionContext`].
#[derive(Debug, Clone)]
pub struct ShopClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ShopClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// A path prefix in `base_url` (e.g. `https://example.com/shop`) is kept
    /// in front of every API path.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` is not a valid URL.
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            http: reqwest::Client::builder().build()?,
        })
    }

    /// The storefront this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path (no leading slash) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch the whole inventory.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` with the server's message on failure.
    #[instrument(skip(self))]
    pub async fn items(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.http.get(self.endpoint("api/items")?).send().await?;
        let items: Vec<Product> = read_json(response).await?;
        debug!(count = items.len(), "Fetched items");
        Ok(items)
    }

    /// Log in and return the session to use for authenticated calls.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` with status 401 for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionContext, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;

        let response = http
            .post(self.endpoint("api/login")?)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let login: LoginResponse = read_json(response).await?;

        Ok(SessionContext::new(login.username, http))
    }

    /// Ask the server who the session belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` with status 401 if the session has ended.
    pub async fn whoami(&self, session: &SessionContext) -> Result<Username, ClientError> {
        let response = session
            .http()
            .get(self.endpoint("api/session")?)
            .send()
            .await?;
        let current: SessionResponse = read_json(response).await?;
        Ok(current.username)
    }

    /// Check out `cart` as the session user.
    ///
    /// On success the cart is frozen into the returned [`LastTransaction`]
    /// and emptied. On failure the cart is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Cart` if the cart is empty.
    /// Returns `ClientError::Server` with the server's message on failure.
    #[instrument(skip_all, fields(items = cart.len()))]
    pub async fn checkout(
        &self,
        session: &SessionContext,
        cart: &mut Cart,
    ) -> Result<LastTransaction, ClientError> {
        if cart.is_empty() {
            return Err(CartError::Empty.into());
        }

        let response = session
            .http()
            .post(self.endpoint("api/checkout")?)
            .json(&cart.to_request(session.username().as_str()))
            .send()
            .await?;
        let receipt: CheckoutResponse = read_json(response).await?;

        debug!(order_id = %receipt.order_id, total = %receipt.total_price, "Checkout accepted");
        Ok(cart.complete(receipt))
    }

    /// End the session on the server.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` if the server refuses.
    pub async fn logout(&self, session: SessionContext) -> Result<(), ClientError> {
        let response = session
            .http()
            .post(self.endpoint("api/logout")?)
            .send()
            .await?;
        let _: MessageResponse = read_json(response).await?;
        Ok(())
    }
}

/// Decode a success body, or turn an error body into `ClientError::Server`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let bytes = response.bytes().await?;
    Err(server_error(status, &bytes))
}

fn server_error(status: StatusCode, body: &[u8]) -> ClientError {
    let (message, error) = serde_json::from_slice::<ErrorResponse>(body).map_or_else(
        |_| {
            (
                status.canonical_reason().unwrap_or("Request failed").to_string(),
                None,
            )
        },
        |body| (body.message, body.error),
    );

    ClientError::Server {
        status: status.as_u16(),
        message,
        error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode as AxumStatus, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use chrono::Utc;
    use shopfront_core::api::{CheckoutLine, CheckoutRequest};
    use shopfront_core::{OrderId, Price, ProductId};

    use super::*;
    use crate::cart::CartItem;

    const COOKIE: &str = "shopfront_session=abc";

    fn product(id: i32, cents: u32) -> Product {
        Product {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::from_cents(cents),
            quantity_in_stock: 5,
            created_at: Utc::now(),
            image: None,
            category: None,
        }
    }

    async fn login(Json(body): Json<LoginRequest>) -> impl IntoResponse {
        if body.password == "secret-pass" {
            (
                AxumStatus::OK,
                [(header::SET_COOKIE, format!("{COOKIE}; Path=/"))],
                Json(serde_json::json!({ "message": "Login successful", "username": body.username })),
            )
                .into_response()
        } else {
            (
                AxumStatus::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "Invalid username or password" })),
            )
                .into_response()
        }
    }

    async fn checkout(headers: HeaderMap, Json(body): Json<CheckoutRequest>) -> impl IntoResponse {
        let has_session = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(COOKIE));
        if !has_session {
            return (
                AxumStatus::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "Not logged in" })),
            )
                .into_response();
        }

        // Re-price every entry at 10.00 to show server-side pricing wins.
        let lines: Vec<CheckoutLine> = body
            .cart
            .unwrap_or_default()
            .iter()
            .map(|e| CheckoutLine {
                product_id: e.product_id.unwrap(),
                price: Price::from_cents(1000),
            })
            .collect();
        let total = lines.iter().map(|l| l.price).sum();
        Json(CheckoutResponse {
            message: "Transaction completed successfully".to_string(),
            order_id: OrderId::new(42),
            total_price: total,
            items: lines,
        })
        .into_response()
    }

    fn mock_routes() -> Router {
        Router::new()
            .route(
                "/api/items",
                get(|| async { Json(vec![product(1, 999), product(2, 500)]) }),
            )
            .route("/api/login", post(login))
            .route("/api/checkout", post(checkout))
            .route(
                "/api/session",
                get(|| async {
                    (
                        AxumStatus::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({ "message": "Error", "error": "query_error" })),
                    )
                }),
            )
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    async fn spawn_server() -> String {
        serve(mock_routes()).await
    }

    #[tokio::test]
    async fn test_items() {
        let client = ShopClient::new(&spawn_server().await).unwrap();
        let items = client.items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price.to_string(), "9.99");
    }

    #[tokio::test]
    async fn test_items_under_path_prefix() {
        let base = serve(Router::new().nest("/shop", mock_routes())).await;
        for prefix in ["/shop", "/shop/"] {
            let client = ShopClient::new(&format!("{base}{prefix}")).unwrap();
            assert_eq!(client.items().await.unwrap().len(), 2);
        }
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let client = ShopClient::new("https://example.com/shop").unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/shop/");
        assert_eq!(
            client.endpoint("api/items").unwrap().as_str(),
            "https://example.com/shop/api/items"
        );

        let client = ShopClient::new("http://localhost:3000").unwrap();
        assert_eq!(
            client.endpoint("api/checkout").unwrap().as_str(),
            "http://localhost:3000/api/checkout"
        );
    }

    #[tokio::test]
    async fn test_login_rejected_surfaces_message() {
        let client = ShopClient::new(&spawn_server().await).unwrap();
        let err = client.login("alice", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Invalid username or password (HTTP 401)");
    }

    #[tokio::test]
    async fn test_checkout_uses_session_and_clears_cart() {
        let client = ShopClient::new(&spawn_server().await).unwrap();
        let items = client.items().await.unwrap();
        let session = client.login("alice", "secret-pass").await.unwrap();
        assert_eq!(session.username().as_str(), "alice");

        let mut cart = Cart::new();
        for item in &items {
            cart.add(CartItem::from(item)).unwrap();
        }

        let last = client.checkout(&session, &mut cart).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.order_id, OrderId::new(42));
        assert_eq!(last.displayed_total.to_string(), "14.99");
        assert_eq!(last.total_price.to_string(), "20.00");
        assert!(last.was_repriced());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_local_error() {
        let client = ShopClient::new(&spawn_server().await).unwrap();
        let session = client.login("alice", "secret-pass").await.unwrap();
        let err = client
            .checkout(&session, &mut Cart::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Cart(CartError::Empty)));
    }

    #[tokio::test]
    async fn test_server_error_keeps_code() {
        let client = ShopClient::new(&spawn_server().await).unwrap();
        let session = client.login("alice", "secret-pass").await.unwrap();
        let err = client.whoami(&session).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server { status: 500, ref error, .. } if error.as_deref() == Some("query_error")
        ));
    }

    #[test]
    fn test_server_error_without_json_body() {
        let err = server_error(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.to_string(), "Bad Gateway (HTTP 502)");
        assert_eq!(err.status(), Some(502));
    }
}
