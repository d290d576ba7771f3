//! Cart Reconciliation Store.
//!
//! Owns the single `Option<CartSnapshot>` for the signed-in customer and
//! keeps it consistent with the backend after every mutation. Observers
//! subscribe to a watch channel and all render the same value without
//! issuing their own network calls; every mutation is routed through the
//! store's operations.
//!
//! The backend is authoritative on pricing, discounts, and availability, so
//! no mutation is applied optimistically: the local snapshot changes only
//! when a successful response replaces it. A failed request leaves prior
//! state untouched and surfaces the error to the caller, whose retry is to
//! re-invoke the action.

use std::sync::Arc;

use food_express_core::{CartLine, CartLineId, CartSnapshot, CustomerId, RestaurantId};
use food_express_gateway::{GatewayError, OrderGateway};
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

/// Errors surfaced by cart store operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart already holds items from a different restaurant.
    ///
    /// Rejected before any network call; carts never mix restaurants.
    #[error("cart already contains items from \"{current_name}\"")]
    RestaurantMismatch {
        /// Restaurant the existing cart belongs to.
        current_id: RestaurantId,
        /// Its display name, for the user-facing message.
        current_name: String,
    },

    /// The backend request failed; prior cart state is unchanged.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// The single authoritative cart mirror.
///
/// Cheaply cloneable; all clones share the same snapshot and channel.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    gateway: OrderGateway,
    customer_id: CustomerId,
    tx: watch::Sender<Option<CartSnapshot>>,
}

impl CartStore {
    /// Create a store for one customer, starting with no cart loaded.
    #[must_use]
    pub fn new(gateway: OrderGateway, customer_id: CustomerId) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(CartStoreInner {
                gateway,
                customer_id,
                tx,
            }),
        }
    }

    /// Subscribe to snapshot changes.
    ///
    /// Receivers get read-only clones; mutations go through the store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CartSnapshot>> {
        self.inner.tx.subscribe()
    }

    /// The current snapshot, if a cart exists.
    #[must_use]
    pub fn current(&self) -> Option<CartSnapshot> {
        self.inner.tx.borrow().clone()
    }

    /// Fetch the cart from the backend and replace the snapshot.
    ///
    /// "Not found" is a normal, expected condition and sets the snapshot to
    /// `None`; any other failure leaves prior state untouched.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Gateway` on any non-404 failure.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<CartSnapshot>, CartError> {
        let cart = self.inner.gateway.get_cart(self.inner.customer_id).await?;
        Ok(self.publish(cart))
    }

    /// Increase a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Gateway` on failure; prior state is unchanged.
    #[instrument(skip(self))]
    pub async fn increase(&self, line_id: CartLineId) -> Result<Option<CartSnapshot>, CartError> {
        self.adjust(line_id, 1).await
    }

    /// Decrease a line's quantity by one.
    ///
    /// Decreasing the last unit of the last line empties the cart, which is
    /// observed as `None` - never as a present cart with zero lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Gateway` on failure; prior state is unchanged.
    #[instrument(skip(self))]
    pub async fn decrease(&self, line_id: CartLineId) -> Result<Option<CartSnapshot>, CartError> {
        self.adjust(line_id, -1).await
    }

    async fn adjust(
        &self,
        line_id: CartLineId,
        delta: i32,
    ) -> Result<Option<CartSnapshot>, CartError> {
        let cart = self
            .inner
            .gateway
            .adjust_line_quantity(self.inner.customer_id, line_id, delta)
            .await?;
        Ok(self.publish(cart))
    }

    /// Add a menu item to the cart.
    ///
    /// Carts never span restaurants: if a cart for a different restaurant is
    /// active, the add is rejected here, before any network call.
    ///
    /// # Errors
    ///
    /// Returns `CartError::RestaurantMismatch` for a cross-restaurant add,
    /// or `CartError::Gateway` on failure; prior state is unchanged either
    /// way.
    #[instrument(skip(self, line), fields(menu_item_id = %line.menu_item_id))]
    pub async fn add_item(
        &self,
        line: &CartLine,
        restaurant_id: RestaurantId,
        restaurant_name: &str,
    ) -> Result<Option<CartSnapshot>, CartError> {
        if let Some(current) = self.current()
            && current.restaurant_id != restaurant_id
        {
            tracing::warn!(
                current_restaurant = %current.restaurant_id,
                requested_restaurant = %restaurant_id,
                "Rejected cross-restaurant add"
            );
            return Err(CartError::RestaurantMismatch {
                current_id: current.restaurant_id,
                current_name: current.restaurant_name,
            });
        }

        let cart = self
            .inner
            .gateway
            .add_cart_line(
                self.inner.customer_id,
                restaurant_id,
                line.menu_item_id,
                line.quantity,
            )
            .await?;
        Ok(self.publish(cart))
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Gateway` on failure; prior state is unchanged.
    #[instrument(skip(self, line), fields(line_id = %line.id))]
    pub async fn remove_item(&self, line: &CartLine) -> Result<Option<CartSnapshot>, CartError> {
        let cart = self
            .inner
            .gateway
            .remove_cart_line(self.inner.customer_id, line.id)
            .await?;
        Ok(self.publish(cart))
    }

    /// Delete the entire cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Gateway` on failure; on success the snapshot is
    /// `None` unconditionally.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        self.inner.gateway.clear_cart(self.inner.customer_id).await?;
        self.publish(None);
        Ok(())
    }

    /// Replace the snapshot and notify observers.
    fn publish(&self, cart: Option<CartSnapshot>) -> Option<CartSnapshot> {
        self.inner.tx.send_replace(cart.clone());
        cart
    }

    #[cfg(test)]
    pub(crate) fn seed(&self, cart: CartSnapshot) {
        self.publish(Some(cart));
    }
}
