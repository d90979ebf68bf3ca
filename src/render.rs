//! Text projections of cart and builder state.
//!
//! Nothing here mutates state; [`RenderingObserver`] re-renders whenever the
//! cart tells it something changed.

use crate::core::builder::{BuilderStep, PackageBuilder};
use crate::core::catalog;
use crate::domain::model::{CartEvent, CartItem, CatalogKind, SelectedService};
use crate::domain::ports::CartObserver;
use rust_decimal::Decimal;
use std::fmt::Write;
use std::sync::{Arc, Mutex};

fn money(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

pub fn render_badge(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!("🛒 {}", count)
    }
}

pub fn render_cart(items: &[CartItem]) -> String {
    if items.is_empty() {
        return "Your cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let duration = if item.duration_label.is_empty() {
            String::new()
        } else {
            format!(" ({})", item.duration_label)
        };
        let _ = writeln!(
            out,
            "#{}  {}{}  {}",
            item.id,
            item.service_name,
            duration,
            money(item.unit_price)
        );
    }
    let total: Decimal = items.iter().map(|i| i.unit_price).sum();
    let _ = writeln!(out, "Total: {}", money(total));
    out
}

fn selection_line(out: &mut String, label: &str, service: Option<&SelectedService>) {
    let _ = match service {
        Some(s) => writeln!(out, "  {:<11} {} ({}) {}", label, s.name, s.duration_label, money(s.price)),
        None => writeln!(out, "  {:<11} —", label),
    };
}

pub fn render_builder(builder: &PackageBuilder) -> String {
    let step = builder.step();
    let mut out = String::new();
    if step == BuilderStep::Idle {
        let _ = writeln!(out, "{}", step.title());
        return out;
    }

    let _ = writeln!(out, "Step {} of 6: {}", step.number(), step.title());
    if let Some(entry) = builder.awaiting_duration() {
        let options: Vec<_> = entry
            .options
            .iter()
            .map(|o| format!("{} {}", o.label, money(o.price())))
            .collect();
        let _ = writeln!(out, "  Choose a duration for {}: {}", entry.name, options.join(" | "));
    }

    let selection = builder.selection();
    selection_line(&mut out, "Massage", selection.massage.as_ref());
    selection_line(&mut out, "Facial", selection.facial.as_ref());
    if selection.addons.is_empty() {
        selection_line(&mut out, "Add-ons", None);
    } else {
        for addon in &selection.addons {
            selection_line(&mut out, "Add-on", Some(addon));
        }
    }
    selection_line(&mut out, "Membership", selection.membership.as_ref());
    if let Some(notes) = &selection.notes {
        let _ = writeln!(out, "  {:<11} {}", "Notes", notes);
    }

    let quote = builder.summary();
    let _ = writeln!(out, "  Subtotal    {}", money(quote.subtotal));
    if quote.discount > Decimal::ZERO {
        let _ = writeln!(
            out,
            "  Discount    -{} ({}% off)",
            money(quote.discount),
            quote.discount_percent()
        );
    }
    let _ = writeln!(out, "  Total       {}", money(quote.total));
    out
}

pub fn render_catalog() -> String {
    let mut out = String::new();
    for kind in [
        CatalogKind::Massage,
        CatalogKind::Facial,
        CatalogKind::Addon,
        CatalogKind::Membership,
    ] {
        let _ = writeln!(out, "[{}]", kind.label());
        for entry in catalog::entries(kind) {
            let options: Vec<_> = entry
                .options
                .iter()
                .map(|o| format!("{} {}", o.label, money(o.price())))
                .collect();
            let _ = writeln!(out, "  {:<24} {}", entry.name, options.join(" | "));
        }
    }
    out
}

/// Latest projection of the cart, shared with whoever displays it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    pub markup: String,
    pub badge: String,
    pub renders: usize,
}

pub struct RenderingObserver {
    view: Arc<Mutex<CartView>>,
}

impl RenderingObserver {
    pub fn new() -> (Self, Arc<Mutex<CartView>>) {
        let view = Arc::new(Mutex::new(CartView::default()));
        (Self { view: view.clone() }, view)
    }
}

impl CartObserver for RenderingObserver {
    fn on_cart_changed(&mut self, _event: &CartEvent, items: &[CartItem]) {
        if let Ok(mut view) = self.view.lock() {
            view.markup = render_cart(items);
            view.badge = render_badge(items.len());
            view.renders += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::builder::MassageChoice;
    use crate::core::cart::{CartService, DEFAULT_CART_KEY};

    #[test]
    fn test_render_cart_with_discount_line() {
        let items = vec![
            CartItem {
                id: 1,
                service_name: "Swedish Massage".into(),
                duration_label: "60min".into(),
                unit_price: Decimal::new(120, 0),
            },
            CartItem {
                id: 2,
                service_name: "Package Discount".into(),
                duration_label: "10% off".into(),
                unit_price: Decimal::new(-12, 0),
            },
        ];
        let out = render_cart(&items);
        assert!(out.contains("#1  Swedish Massage (60min)  $120.00"));
        assert!(out.contains("-$12.00"));
        assert!(out.ends_with("Total: $108.00\n"));
        assert_eq!(render_cart(&[]), "Your cart is empty\n");
    }

    #[test]
    fn test_render_builder_shows_duration_prompt() {
        let mut b = PackageBuilder::new();
        b.start();
        assert!(matches!(
            b.choose_massage("Swedish Massage").unwrap(),
            MassageChoice::NeedsDuration(_)
        ));
        let out = render_builder(&b);
        assert!(out.starts_with("Step 1 of 6: Choose Your Massage"));
        assert!(out.contains("60min $120.00 | 90min $165.00"));
        assert!(out.contains("Total       $0.00"));
    }

    #[tokio::test]
    async fn test_observer_rerenders_on_mutation() {
        let mut cart = CartService::load(MemoryStorage::new(), DEFAULT_CART_KEY).await;
        let (observer, view) = RenderingObserver::new();
        cart.subscribe(Box::new(observer));
        assert_eq!(view.lock().unwrap().renders, 1);
        assert_eq!(view.lock().unwrap().badge, "");

        cart.add_item("Classic Facial", "50min", Decimal::new(95, 0))
            .await
            .unwrap();
        let snapshot = view.lock().unwrap().clone();
        assert_eq!(snapshot.renders, 2);
        assert_eq!(snapshot.badge, "🛒 1");
        assert!(snapshot.markup.contains("Classic Facial"));
    }

    #[test]
    fn test_catalog_lists_every_kind() {
        let out = render_catalog();
        for header in ["[massage]", "[facial]", "[add-on]", "[membership]"] {
            assert!(out.contains(header));
        }
        assert!(out.contains("Hydrafacial Signature"));
    }
}
