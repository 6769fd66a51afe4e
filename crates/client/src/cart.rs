//! The local cart.
//!
//! A cart is an ordered list of product references. The same product may
//! appear more than once; each entry buys one unit. Prices shown here are
//! the ones fetched with the catalog; the server re-prices at checkout.

use thiserror::Error;

use shopfront_core::api::{
    CartEntry, CheckoutLine, CheckoutRequest, CheckoutResponse, Product, UserRef,
};
use shopfront_core::{OrderId, Price, ProductId};

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The item has no product id and can never be checked out.
    #[error("cannot add an item without a product id")]
    MissingProductId,

    /// `remove` was given a position past the end of the cart.
    #[error("no cart entry at position {index} (cart has {len})")]
    NoSuchEntry { index: usize, len: usize },

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    Empty,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Price,
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            product_id: Some(product.product_id),
            name: product.name.clone(),
            price: product.price,
        }
    }
}

/// Ordered list of items pending purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingProductId` if the item has no product id.
    pub fn add(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.product_id.is_none() {
            return Err(CartError::MissingProductId);
        }
        self.items.push(item);
        Ok(())
    }

    /// Remove the entry at `index`, leaving other copies of the same product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoSuchEntry` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<CartItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::NoSuchEntry {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Sum of the displayed prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Build the checkout body for `username`.
    #[must_use]
    pub fn to_request(&self, username: &str) -> CheckoutRequest {
        CheckoutRequest {
            cart: Some(
                self.items
                    .iter()
                    .map(|item| CartEntry {
                        product_id: item.product_id,
                        price: Some(item.price),
                    })
                    .collect(),
            ),
            user: Some(UserRef {
                username: Some(username.to_string()),
            }),
        }
    }

    /// Freeze the cart into a [`LastTransaction`] and empty it.
    pub(crate) fn complete(&mut self, response: CheckoutResponse) -> LastTransaction {
        let items = std::mem::take(&mut self.items);
        LastTransaction {
            displayed_total: items.iter().map(|item| item.price).sum(),
            items,
            order_id: response.order_id,
            total_price: response.total_price,
            lines: response.items,
        }
    }
}

/// Snapshot of the last successful checkout.
///
/// Owned data: later changes to the live cart never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastTransaction {
    /// The cart as it was when checkout was sent.
    pub items: Vec<CartItem>,
    /// Total of the prices the shopper saw.
    pub displayed_total: Price,
    pub order_id: OrderId,
    /// Total actually charged, priced by the server.
    pub total_price: Price,
    /// Server-priced lines, in cart order.
    pub lines: Vec<CheckoutLine>,
}

impl LastTransaction {
    /// Whether the server charged something other than what was displayed.
    #[must_use]
    pub fn was_repriced(&self) -> bool {
        self.displayed_total != self.total_price
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, cents: u32) -> CartItem {
        CartItem {
            product_id: Some(ProductId::new(id)),
            name: format!("Product {id}"),
            price: Price::from_cents(cents),
        }
    }

    fn response(order: i32, cents: u32, lines: &[(i32, u32)]) -> CheckoutResponse {
        CheckoutResponse {
            message: "Transaction completed successfully".to_string(),
            order_id: OrderId::new(order),
            total_price: Price::from_cents(cents),
            items: lines
                .iter()
                .map(|&(id, cents)| CheckoutLine {
                    product_id: ProductId::new(id),
                    price: Price::from_cents(cents),
                })
                .collect(),
        }
    }

    #[test]
    fn test_add_and_total() {
        let mut cart = Cart::new();
        cart.add(item(1, 999)).unwrap();
        cart.add(item(2, 500)).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total().to_string(), "14.99");
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), Price::ZERO);
    }

    #[test]
    fn test_add_rejects_missing_id() {
        let mut cart = Cart::new();
        let mut bad = item(1, 100);
        bad.product_id = None;
        assert_eq!(cart.add(bad), Err(CartError::MissingProductId));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_only_that_position() {
        let mut cart = Cart::new();
        cart.add(item(1, 100)).unwrap();
        cart.add(item(2, 200)).unwrap();
        cart.add(item(1, 100)).unwrap();

        let removed = cart.remove(2).unwrap();
        assert_eq!(removed.product_id, Some(ProductId::new(1)));

        let ids: Vec<_> = cart.items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![Some(ProductId::new(1)), Some(ProductId::new(2))]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut cart = Cart::new();
        cart.add(item(1, 100)).unwrap();
        assert_eq!(
            cart.remove(5),
            Err(CartError::NoSuchEntry { index: 5, len: 1 })
        );
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_to_request_keeps_order_and_user() {
        let mut cart = Cart::new();
        cart.add(item(2, 500)).unwrap();
        cart.add(item(1, 999)).unwrap();

        let request = cart.to_request("alice");
        let ids: Vec<_> = request
            .cart
            .unwrap()
            .iter()
            .map(|e| e.product_id.unwrap().as_i32())
            .collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(request.user.unwrap().username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_complete_freezes_and_clears() {
        let mut cart = Cart::new();
        cart.add(item(1, 999)).unwrap();
        cart.add(item(2, 500)).unwrap();

        let last = cart.complete(response(7, 1499, &[(1, 999), (2, 500)]));
        assert!(cart.is_empty());

        cart.add(item(3, 4200)).unwrap();
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.displayed_total, Price::from_cents(1499));
        assert_eq!(last.order_id, OrderId::new(7));
        assert!(!last.was_repriced());
    }

    #[test]
    fn test_repriced_checkout() {
        let mut cart = Cart::new();
        cart.add(item(1, 999)).unwrap();
        let last = cart.complete(response(8, 1099, &[(1, 1099)]));
        assert!(last.was_repriced());
    }
}
