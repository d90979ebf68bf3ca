use crate::domain::model::{CartEvent, CartItem, ItemId};
use crate::domain::ports::{CartObserver, Storage};
use crate::utils::error::{Result, ShopError};
use rust_decimal::Decimal;

pub const DEFAULT_CART_KEY: &str = "spaCart";

/// Issues strictly increasing, time-based ids.
#[derive(Debug, Clone, Default)]
struct IdClock {
    last: ItemId,
}

impl IdClock {
    fn seeded(items: &[CartItem]) -> Self {
        Self {
            last: items.iter().map(|i| i.id).max().unwrap_or(0),
        }
    }

    fn next(&mut self) -> Result<ItemId> {
        let bumped = self
            .last
            .checked_add(1)
            .ok_or_else(|| ShopError::validation("Cart item ids exhausted, clear the cart"))?;
        let now = chrono::Utc::now().timestamp_millis();
        self.last = now.max(bumped);
        Ok(self.last)
    }
}

/// The shopping cart. Every mutation rewrites the whole list under one storage key.
pub struct CartService<S: Storage> {
    storage: S,
    key: String,
    items: Vec<CartItem>,
    ids: IdClock,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<S: Storage> CartService<S> {
    /// Loads the cart once. Missing, unreadable or corrupt content yields an empty cart.
    pub async fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = match storage.read(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Stored cart under '{}' is corrupt, starting empty: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read cart '{}', starting empty: {}", key, e);
                Vec::new()
            }
        };

        tracing::debug!("Loaded {} cart item(s) from '{}'", items.len(), key);

        Self {
            storage,
            key,
            ids: IdClock::seeded(&items),
            items,
            observers: Vec::new(),
        }
    }

    /// Registers a subscriber and immediately hands it the current state.
    pub fn subscribe(&mut self, mut observer: Box<dyn CartObserver>) {
        observer.on_cart_changed(&CartEvent::Loaded, &self.items);
        self.observers.push(observer);
    }

    /// Appends a line. Price sign is not checked; discounts are negative lines.
    pub async fn add_item(
        &mut self,
        service_name: impl Into<String>,
        duration_label: impl Into<String>,
        unit_price: Decimal,
    ) -> Result<CartItem> {
        let item = CartItem {
            id: self.ids.next()?,
            service_name: service_name.into(),
            duration_label: duration_label.into(),
            unit_price,
        };

        self.items.push(item.clone());
        if let Err(e) = self.persist().await {
            self.items.pop();
            return Err(e);
        }

        tracing::info!(
            "🛒 Added '{}' ({}) at {:.2}",
            item.service_name,
            item.duration_label,
            item.unit_price
        );
        self.notify(CartEvent::Added(item.clone()));
        Ok(item)
    }

    /// Appends several lines as one mutation: a single write, and on failure
    /// none of them stay in the cart.
    pub async fn add_items<N, L>(
        &mut self,
        lines: impl IntoIterator<Item = (N, L, Decimal)>,
    ) -> Result<Vec<CartItem>>
    where
        N: Into<String>,
        L: Into<String>,
    {
        let mut added = Vec::new();
        for (service_name, duration_label, unit_price) in lines {
            added.push(CartItem {
                id: self.ids.next()?,
                service_name: service_name.into(),
                duration_label: duration_label.into(),
                unit_price,
            });
        }
        if added.is_empty() {
            return Ok(added);
        }

        let start = self.items.len();
        self.items.extend(added.iter().cloned());
        if let Err(e) = self.persist().await {
            self.items.truncate(start);
            return Err(e);
        }

        tracing::info!("🛒 Added {} line(s) in one batch", added.len());
        for item in &added {
            self.notify(CartEvent::Added(item.clone()));
        }
        Ok(added)
    }

    /// Removes the line with `id`. Unknown ids leave the cart and storage untouched.
    pub async fn remove_item(&mut self, id: ItemId) -> Result<bool> {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            tracing::debug!("remove_item: no cart item with id {}", id);
            return Ok(false);
        };

        let removed = self.items.remove(pos);
        if let Err(e) = self.persist().await {
            self.items.insert(pos, removed);
            return Err(e);
        }

        tracing::info!("🗑️ Removed '{}' from cart", removed.service_name);
        self.notify(CartEvent::Removed(id));
        Ok(true)
    }

    pub async fn clear(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.items);
        if let Err(e) = self.persist().await {
            self.items = previous;
            return Err(e);
        }

        tracing::info!("Cart cleared ({} item(s))", previous.len());
        self.notify(CartEvent::Cleared);
        Ok(())
    }

    /// Sum of all line prices. Not clamped: may go negative.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|i| i.unit_price).sum()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    async fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.write(&self.key, &json).await
    }

    fn notify(&mut self, event: CartEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_cart_changed(&event, &self.items);
        }
    }
}
