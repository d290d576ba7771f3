//! Cart endpoints.
//!
//! Every mutation returns the full post-mutation cart (or the empty-cart
//! signal); callers replace their snapshot from the response rather than
//! patching locally. `Ok(None)` always means "the cart no longer exists".

use food_express_core::{CartLineId, CartSnapshot, CustomerId, MenuItemId, RestaurantId};
use reqwest::{Method, StatusCode};
use tracing::instrument;

use crate::{GatewayError, OrderGateway};

impl OrderGateway {
    /// Fetch the customer's cart.
    ///
    /// A 404 is the normal "no active cart" state, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-404 error status.
    #[instrument(skip(self))]
    pub async fn get_cart(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<CartSnapshot>, GatewayError> {
        let url = self.endpoint(&format!("carts/customer/{customer_id}"))?;
        let response = self.request(Method::GET, url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::cart_body(response).await
    }

    /// Apply a signed quantity delta to a cart line.
    ///
    /// `Ok(None)` means the cart emptied out (last unit of the last line
    /// removed).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status; the
    /// caller's prior snapshot stays valid in that case.
    #[instrument(skip(self))]
    pub async fn adjust_line_quantity(
        &self,
        customer_id: CustomerId,
        line_id: CartLineId,
        delta: i32,
    ) -> Result<Option<CartSnapshot>, GatewayError> {
        let url = self.endpoint(&format!(
            "carts/customer/{customer_id}/items/{line_id}?quantity={delta}"
        ))?;
        let response = self.request(Method::PUT, url).send().await?;
        Self::cart_body(response).await
    }

    /// Add a menu item to the cart, creating the cart if needed.
    ///
    /// The backend merges repeated adds of the same item into one line.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn add_cart_line(
        &self,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
        quantity: u32,
    ) -> Result<Option<CartSnapshot>, GatewayError> {
        let url = self.endpoint(&format!(
            "carts/customer/{customer_id}/restaurant/{restaurant_id}/items/{menu_item_id}?quantity={quantity}"
        ))?;
        let response = self.request(Method::POST, url).send().await?;
        Self::cart_body(response).await
    }

    /// Remove a cart line entirely.
    ///
    /// A 204 means the cart is now empty; a 200 carries the remaining cart.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn remove_cart_line(
        &self,
        customer_id: CustomerId,
        line_id: CartLineId,
    ) -> Result<Option<CartSnapshot>, GatewayError> {
        let url = self.endpoint(&format!("carts/customer/{customer_id}/items/{line_id}"))?;
        let response = self.request(Method::DELETE, url).send().await?;
        Self::cart_body(response).await
    }

    /// Delete the customer's cart outright.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, customer_id: CustomerId) -> Result<(), GatewayError> {
        let url = self.endpoint(&format!("carts/customer/{customer_id}"))?;
        let response = self.request(Method::DELETE, url).send().await?;
        Self::read_body(response).await?;
        Ok(())
    }

    /// Interpret a cart mutation response.
    ///
    /// The backend signals "cart is now empty" three ways: a 204, an empty
    /// body, or a cart with zero lines. All three normalize to `None` here
    /// so no caller ever observes an empty-but-present cart.
    async fn cart_body(
        response: reqwest::Response,
    ) -> Result<Option<CartSnapshot>, GatewayError> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let cart: CartSnapshot = Self::parse_json(&body)?;
        Ok(cart.into_non_empty())
    }
}
