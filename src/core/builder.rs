//! Custom package builder.
//!
//! A six-step wizard (massage, facial, add-ons, membership, notes, summary).
//! Selecting a single-choice item does not advance at once: it hands back a
//! [`PendingAdvance`] which the caller commits after the highlight delay.
//! Any transition in between bumps the generation, so a late commit is a no-op.

use crate::core::cart::CartService;
use crate::core::{catalog, pricing};
use crate::domain::model::{
    CartItem, CatalogEntry, CatalogKind, PackageSelection, PriceOption, Quote, SelectedService,
};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, ShopError};
use rust_decimal::Decimal;
use std::time::Duration;

pub const NOTES_LINE_NAME: &str = "Special Notes";
pub const DISCOUNT_LINE_NAME: &str = "Package Discount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuilderStep {
    Idle,
    Massage,
    Facial,
    AddOns,
    Membership,
    Notes,
    Summary,
}

impl BuilderStep {
    pub fn number(self) -> u8 {
        match self {
            BuilderStep::Idle => 0,
            BuilderStep::Massage => 1,
            BuilderStep::Facial => 2,
            BuilderStep::AddOns => 3,
            BuilderStep::Membership => 4,
            BuilderStep::Notes => 5,
            BuilderStep::Summary => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BuilderStep::Idle => "Build Your Package",
            BuilderStep::Massage => "Choose Your Massage",
            BuilderStep::Facial => "Add a Facial",
            BuilderStep::AddOns => "Enhance Your Experience",
            BuilderStep::Membership => "Join a Membership",
            BuilderStep::Notes => "Special Requests",
            BuilderStep::Summary => "Your Custom Package",
        }
    }

    fn next(self) -> Self {
        match self {
            BuilderStep::Idle => BuilderStep::Massage,
            BuilderStep::Massage => BuilderStep::Facial,
            BuilderStep::Facial => BuilderStep::AddOns,
            BuilderStep::AddOns => BuilderStep::Membership,
            BuilderStep::Membership => BuilderStep::Notes,
            BuilderStep::Notes | BuilderStep::Summary => BuilderStep::Summary,
        }
    }

    fn previous(self) -> Self {
        match self {
            BuilderStep::Idle | BuilderStep::Massage => self,
            BuilderStep::Facial => BuilderStep::Massage,
            BuilderStep::AddOns => BuilderStep::Facial,
            BuilderStep::Membership => BuilderStep::AddOns,
            BuilderStep::Notes => BuilderStep::Membership,
            BuilderStep::Summary => BuilderStep::Notes,
        }
    }
}

/// Ticket for a forward move scheduled by a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAdvance {
    generation: u64,
    from: BuilderStep,
}

impl PendingAdvance {
    pub fn from_step(&self) -> BuilderStep {
        self.from
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MassageChoice {
    /// Only one duration exists; advance once the ticket is committed.
    Selected(PendingAdvance),
    /// Pick one of these with [`PackageBuilder::choose_massage_duration`].
    NeedsDuration(&'static [PriceOption]),
}

#[derive(Debug, Clone)]
pub struct PackageBuilder {
    step: BuilderStep,
    selection: PackageSelection,
    awaiting_duration: Option<&'static CatalogEntry>,
    generation: u64,
}

impl Default for PackageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self {
            step: BuilderStep::Idle,
            selection: PackageSelection::default(),
            awaiting_duration: None,
            generation: 0,
        }
    }

    pub fn step(&self) -> BuilderStep {
        self.step
    }

    pub fn selection(&self) -> &PackageSelection {
        &self.selection
    }

    /// The multi-duration massage waiting for a duration pick, if any.
    pub fn awaiting_duration(&self) -> Option<&'static CatalogEntry> {
        self.awaiting_duration
    }

    /// Starts a fresh package at the massage step.
    pub fn start(&mut self) {
        self.selection = PackageSelection::default();
        self.awaiting_duration = None;
        self.move_to(BuilderStep::Massage);
    }

    pub fn restart(&mut self) {
        self.selection = PackageSelection::default();
        self.awaiting_duration = None;
        self.move_to(BuilderStep::Idle);
    }

    pub fn choose_massage(&mut self, name: &str) -> Result<MassageChoice> {
        self.expect_step(BuilderStep::Massage)?;
        let entry = catalog::lookup(CatalogKind::Massage, name)?;

        if entry.has_single_option() {
            self.awaiting_duration = None;
            self.selection.massage = Some(SelectedService::from_entry(entry, &entry.options[0]));
            return Ok(MassageChoice::Selected(self.schedule_advance()));
        }

        self.awaiting_duration = Some(entry);
        self.selection.massage = None;
        self.generation += 1;
        Ok(MassageChoice::NeedsDuration(entry.options))
    }

    pub fn choose_massage_duration(&mut self, label: &str) -> Result<PendingAdvance> {
        self.expect_step(BuilderStep::Massage)?;
        let entry = self
            .awaiting_duration
            .ok_or_else(|| ShopError::validation("Please select a massage first"))?;
        let option = entry
            .option(label)
            .ok_or_else(|| ShopError::not_found("duration", label))?;

        self.selection.massage = Some(SelectedService::from_entry(entry, option));
        self.awaiting_duration = None;
        Ok(self.schedule_advance())
    }

    pub fn choose_facial(&mut self, name: &str) -> Result<PendingAdvance> {
        self.expect_step(BuilderStep::Facial)?;
        let entry = catalog::lookup(CatalogKind::Facial, name)?;
        self.selection.facial = Some(SelectedService::from_entry(entry, &entry.options[0]));
        Ok(self.schedule_advance())
    }

    /// Flips an add-on in or out of the set. Returns whether it is now selected.
    pub fn toggle_addon(&mut self, name: &str) -> Result<bool> {
        self.expect_step(BuilderStep::AddOns)?;
        let entry = catalog::lookup(CatalogKind::Addon, name)?;

        if self.selection.has_addon(entry.name) {
            self.selection.addons.retain(|a| a.name != entry.name);
            Ok(false)
        } else {
            self.selection
                .addons
                .push(SelectedService::from_entry(entry, &entry.options[0]));
            Ok(true)
        }
    }

    pub fn choose_membership(&mut self, name: &str) -> Result<PendingAdvance> {
        self.expect_step(BuilderStep::Membership)?;
        let entry = catalog::lookup(CatalogKind::Membership, name)?;
        self.selection.membership = Some(SelectedService::from_entry(entry, &entry.options[0]));
        Ok(self.schedule_advance())
    }

    pub fn set_notes(&mut self, notes: &str) -> Result<PendingAdvance> {
        self.expect_step(BuilderStep::Notes)?;
        let trimmed = notes.trim();
        self.selection.notes = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Ok(self.schedule_advance())
    }

    /// Applies a scheduled advance. Returns false if the builder moved on since.
    pub fn commit(&mut self, ticket: PendingAdvance) -> bool {
        if ticket.generation != self.generation || ticket.from != self.step {
            tracing::debug!(
                "Dropping stale advance from {:?} (now at {:?})",
                ticket.from,
                self.step
            );
            return false;
        }
        self.move_to(self.step.next());
        true
    }

    /// Moves forward keeping whatever is selected on the current step.
    pub fn next(&mut self) -> Result<BuilderStep> {
        match self.step {
            BuilderStep::Idle => Err(ShopError::validation("Start building a package first")),
            BuilderStep::Summary => Err(ShopError::validation("Already at the summary")),
            step => {
                self.awaiting_duration = None;
                self.move_to(step.next());
                Ok(self.step)
            }
        }
    }

    /// Moves forward dropping the current step's selection.
    pub fn skip(&mut self) -> Result<BuilderStep> {
        match self.step {
            BuilderStep::Massage => self.selection.massage = None,
            BuilderStep::Facial => self.selection.facial = None,
            BuilderStep::AddOns => self.selection.addons.clear(),
            BuilderStep::Membership => self.selection.membership = None,
            BuilderStep::Notes => self.selection.notes = None,
            BuilderStep::Idle | BuilderStep::Summary => {}
        }
        self.next()
    }

    pub fn back(&mut self) -> Result<BuilderStep> {
        if matches!(self.step, BuilderStep::Idle | BuilderStep::Massage) {
            return Err(ShopError::validation("Nothing to go back to"));
        }
        self.awaiting_duration = None;
        self.move_to(self.step.previous());
        Ok(self.step)
    }

    pub fn summary(&self) -> Quote {
        pricing::quote(&self.selection.prices())
    }

    /// Drains the selection into the cart and resets to idle.
    ///
    /// One line per component, a zero-price notes line, and a negative
    /// discount line when the package qualifies for a tier discount, so the
    /// cart total equals [`summary`](Self::summary)'s total. The lines are
    /// written as one batch; if that fails the cart and the selection are
    /// both left as they were.
    pub async fn add_to_cart<S: Storage>(
        &mut self,
        cart: &mut CartService<S>,
    ) -> Result<Vec<CartItem>> {
        self.expect_step(BuilderStep::Summary)?;
        if self.selection.is_empty() {
            return Err(ShopError::validation(
                "Please select at least one service for your package",
            ));
        }

        let quote = self.summary();
        let mut lines: Vec<(String, String, Decimal)> = self
            .selection
            .priced_components()
            .into_iter()
            .map(|c| (c.name.clone(), c.duration_label.clone(), c.price))
            .collect();

        if let Some(notes) = &self.selection.notes {
            lines.push((NOTES_LINE_NAME.to_string(), notes.clone(), Decimal::ZERO));
        }

        if quote.discount > Decimal::ZERO {
            lines.push((
                DISCOUNT_LINE_NAME.to_string(),
                format!("{}% off", quote.discount_percent()),
                -quote.discount,
            ));
        }

        let added = cart.add_items(lines).await?;
        tracing::info!(
            "📦 Package added: {} line(s), total {:.2}",
            added.len(),
            quote.total
        );
        self.restart();
        Ok(added)
    }

    fn expect_step(&self, expected: BuilderStep) -> Result<()> {
        if self.step != expected {
            return Err(ShopError::validation(format!(
                "Not on the '{}' step (currently '{}')",
                expected.title(),
                self.step.title()
            )));
        }
        Ok(())
    }

    fn schedule_advance(&mut self) -> PendingAdvance {
        self.generation += 1;
        PendingAdvance {
            generation: self.generation,
            from: self.step,
        }
    }

    fn move_to(&mut self, step: BuilderStep) {
        tracing::debug!("Builder step {:?} -> {:?}", self.step, step);
        self.step = step;
        self.generation += 1;
    }
}

/// What to pick on each step when the wizard is driven non-interactively.
#[derive(Debug, Clone, Default)]
pub struct PackagePlan {
    pub massage: Option<String>,
    pub massage_duration: Option<String>,
    pub facial: Option<String>,
    pub addons: Vec<String>,
    pub membership: Option<String>,
    pub notes: Option<String>,
}

/// Drives a [`PackageBuilder`], waiting out the selection highlight before each advance.
pub struct BuilderSession {
    builder: PackageBuilder,
    advance_delay: Duration,
}

impl BuilderSession {
    pub fn new(advance_delay: Duration) -> Self {
        Self {
            builder: PackageBuilder::new(),
            advance_delay,
        }
    }

    pub fn builder(&self) -> &PackageBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut PackageBuilder {
        &mut self.builder
    }

    /// Sleeps for the highlight delay, then commits the ticket.
    pub async fn settle(&mut self, ticket: PendingAdvance) -> bool {
        tokio::time::sleep(self.advance_delay).await;
        self.builder.commit(ticket)
    }

    /// Walks every step according to `plan` and stops at the summary.
    pub async fn run(&mut self, plan: &PackagePlan) -> Result<Quote> {
        self.builder.start();

        match &plan.massage {
            Some(name) => {
                let ticket = match self.builder.choose_massage(name)? {
                    MassageChoice::Selected(ticket) => ticket,
                    MassageChoice::NeedsDuration(options) => {
                        let label = plan.massage_duration.as_deref().ok_or_else(|| {
                            let labels: Vec<_> = options.iter().map(|o| o.label).collect();
                            ShopError::validation(format!(
                                "Please choose a duration for {}: {}",
                                name,
                                labels.join(", ")
                            ))
                        })?;
                        self.builder.choose_massage_duration(label)?
                    }
                };
                self.settle(ticket).await;
            }
            None => {
                self.builder.skip()?;
            }
        }

        match &plan.facial {
            Some(name) => {
                let ticket = self.builder.choose_facial(name)?;
                self.settle(ticket).await;
            }
            None => {
                self.builder.skip()?;
            }
        }

        for addon in &plan.addons {
            self.builder.toggle_addon(addon)?;
        }
        self.builder.next()?;

        match &plan.membership {
            Some(name) => {
                let ticket = self.builder.choose_membership(name)?;
                self.settle(ticket).await;
            }
            None => {
                self.builder.skip()?;
            }
        }

        let ticket = self.builder.set_notes(plan.notes.as_deref().unwrap_or(""))?;
        self.settle(ticket).await;

        Ok(self.builder.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::cart::DEFAULT_CART_KEY;

    fn d(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    fn advance(builder: &mut PackageBuilder, ticket: PendingAdvance) {
        assert!(builder.commit(ticket));
    }

    #[test]
    fn test_single_duration_massage_advances_on_commit() {
        let mut b = PackageBuilder::new();
        b.start();
        assert_eq!(b.step(), BuilderStep::Massage);

        let MassageChoice::Selected(ticket) = b.choose_massage("Hot Stone Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        // 動畫延遲期間仍停在原步驟
        assert_eq!(b.step(), BuilderStep::Massage);
        advance(&mut b, ticket);
        assert_eq!(b.step(), BuilderStep::Facial);
        assert_eq!(b.selection().massage.as_ref().unwrap().price, d(150));
    }

    #[test]
    fn test_multi_duration_massage_requires_duration() {
        let mut b = PackageBuilder::new();
        b.start();

        let choice = b.choose_massage("Swedish Massage").unwrap();
        let MassageChoice::NeedsDuration(options) = choice else {
            panic!("expected duration prompt");
        };
        assert_eq!(options.len(), 2);
        assert!(b.selection().massage.is_none());

        assert!(b.choose_massage_duration("120min").is_err());
        let ticket = b.choose_massage_duration("90min").unwrap();
        advance(&mut b, ticket);
        let massage = b.selection().massage.clone().unwrap();
        assert_eq!(massage.duration_label, "90min");
        assert_eq!(massage.price, d(165));
    }

    #[test]
    fn test_stale_advance_is_ignored() {
        let mut b = PackageBuilder::new();
        b.start();
        let MassageChoice::Selected(ticket) = b.choose_massage("Prenatal Massage").unwrap() else {
            panic!("expected an immediate selection");
        };

        b.restart();
        assert!(!b.commit(ticket));
        assert_eq!(b.step(), BuilderStep::Idle);

        b.start();
        let MassageChoice::Selected(first) = b.choose_massage("Prenatal Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        let MassageChoice::Selected(second) = b.choose_massage("Hot Stone Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        assert!(!b.commit(first));
        assert!(b.commit(second));
        assert!(!b.commit(second));
        assert_eq!(b.step(), BuilderStep::Facial);
    }

    #[test]
    fn test_addons_toggle_without_advancing() {
        let mut b = PackageBuilder::new();
        b.start();
        b.skip().unwrap();
        b.skip().unwrap();
        assert_eq!(b.step(), BuilderStep::AddOns);

        assert!(b.toggle_addon("Aromatherapy").unwrap());
        assert!(b.toggle_addon("CBD Oil").unwrap());
        assert!(!b.toggle_addon("aromatherapy").unwrap());
        assert_eq!(b.step(), BuilderStep::AddOns);

        let names: Vec<_> = b.selection().addons.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["CBD Oil"]);
    }

    #[test]
    fn test_wrong_step_is_rejected() {
        let mut b = PackageBuilder::new();
        assert!(b.choose_massage("Swedish Massage").is_err());
        b.start();
        assert!(b.choose_facial("Classic Facial").is_err());
        assert!(b.toggle_addon("Hot Stones").is_err());
        assert!(b.back().is_err());
    }

    #[test]
    fn test_back_and_skip() {
        let mut b = PackageBuilder::new();
        b.start();
        let MassageChoice::Selected(t) = b.choose_massage("Hot Stone Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        advance(&mut b, t);
        assert_eq!(b.back().unwrap(), BuilderStep::Massage);
        assert!(b.selection().massage.is_some());

        assert_eq!(b.skip().unwrap(), BuilderStep::Facial);
        assert!(b.selection().massage.is_none());
        for _ in 0..4 {
            b.next().unwrap();
        }
        assert_eq!(b.step(), BuilderStep::Summary);
        assert!(b.next().is_err());
    }

    #[test]
    fn test_summary_matches_pricing() {
        let mut b = PackageBuilder::new();
        b.start();
        let MassageChoice::NeedsDuration(_) = b.choose_massage("Swedish Massage").unwrap() else {
            panic!("expected duration prompt");
        };
        let t = b.choose_massage_duration("60min").unwrap();
        advance(&mut b, t);
        let t = b.choose_facial("Hydrafacial Signature").unwrap();
        advance(&mut b, t);

        let q = b.summary();
        assert_eq!(q.subtotal, d(285));
        assert_eq!(q.discount, Decimal::ZERO);
        assert_eq!(q.total, d(285));
    }

    #[tokio::test]
    async fn test_add_to_cart_matches_summary_total() {
        let mut cart = CartService::load(MemoryStorage::new(), DEFAULT_CART_KEY).await;
        let mut b = PackageBuilder::new();
        b.start();
        let MassageChoice::Selected(t) = b.choose_massage("Hot Stone Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        advance(&mut b, t);
        let t = b.choose_facial("Classic Facial").unwrap();
        advance(&mut b, t);
        b.toggle_addon("Aromatherapy").unwrap();
        b.toggle_addon("Body Scrub").unwrap();
        b.next().unwrap();
        let t = b.choose_membership("VIP Membership").unwrap();
        advance(&mut b, t);
        let t = b.set_notes("  Lavender please  ").unwrap();
        advance(&mut b, t);
        assert_eq!(b.step(), BuilderStep::Summary);

        // 150 + 95 + 15 + 30 + 199 = 489, five items -> 15%
        let summary = b.summary();
        assert_eq!(summary.subtotal, d(489));
        assert_eq!(summary.discount, Decimal::new(7335, 2));

        let added = b.add_to_cart(&mut cart).await.unwrap();
        assert_eq!(added.len(), 7);
        assert_eq!(cart.total(), summary.total);

        let notes = added.iter().find(|i| i.service_name == NOTES_LINE_NAME).unwrap();
        assert_eq!(notes.duration_label, "Lavender please");
        assert_eq!(notes.unit_price, Decimal::ZERO);

        let discount = added.last().unwrap();
        assert_eq!(discount.service_name, DISCOUNT_LINE_NAME);
        assert_eq!(discount.duration_label, "15% off");
        assert_eq!(discount.unit_price, -summary.discount);

        assert_eq!(b.step(), BuilderStep::Idle);
        assert!(b.selection().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_cart_without_selection_fails() {
        let mut cart = CartService::load(MemoryStorage::new(), DEFAULT_CART_KEY).await;
        let mut b = PackageBuilder::new();
        b.start();
        for _ in 0..5 {
            b.skip().unwrap();
        }
        assert_eq!(b.step(), BuilderStep::Summary);

        let err = b.add_to_cart(&mut cart).await.unwrap_err();
        assert!(matches!(err, ShopError::ValidationError { .. }));
        assert!(cart.is_empty());
        assert_eq!(b.step(), BuilderStep::Summary);
    }

    #[tokio::test]
    async fn test_add_to_cart_only_from_summary() {
        let mut cart = CartService::load(MemoryStorage::new(), DEFAULT_CART_KEY).await;
        let mut b = PackageBuilder::new();
        b.start();
        let MassageChoice::Selected(t) = b.choose_massage("Hot Stone Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        advance(&mut b, t);

        assert!(b.add_to_cart(&mut cart).await.is_err());
        assert!(cart.is_empty());
        assert_eq!(b.step(), BuilderStep::Facial);
        assert!(b.selection().massage.is_some());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cart_and_selection_intact() {
        let storage = MemoryStorage::new();
        let mut cart = CartService::load(storage.clone(), DEFAULT_CART_KEY).await;
        let mut b = PackageBuilder::new();
        b.start();
        let MassageChoice::Selected(t) = b.choose_massage("Hot Stone Massage").unwrap() else {
            panic!("expected an immediate selection");
        };
        advance(&mut b, t);
        let t = b.choose_facial("Classic Facial").unwrap();
        advance(&mut b, t);
        for _ in 0..3 {
            b.skip().unwrap();
        }
        assert_eq!(b.step(), BuilderStep::Summary);

        storage.fail_writes(true);
        assert!(b.add_to_cart(&mut cart).await.is_err());
        assert!(cart.is_empty());
        assert_eq!(storage.get(DEFAULT_CART_KEY), None);
        assert_eq!(b.step(), BuilderStep::Summary);
        assert_eq!(b.selection().priced_components().len(), 2);

        // 重試只會加入一次
        storage.fail_writes(false);
        let added = b.add_to_cart(&mut cart).await.unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(cart.total(), d(245));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_waits_for_highlight_delay() {
        let mut session = BuilderSession::new(Duration::from_millis(300));
        let plan = PackagePlan {
            massage: Some("Swedish Massage".into()),
            massage_duration: Some("60min".into()),
            facial: Some("Hydrafacial Signature".into()),
            addons: vec!["Hot Stones".into()],
            ..Default::default()
        };

        let started = tokio::time::Instant::now();
        let quote = session.run(&plan).await.unwrap();

        // massage, facial, notes each wait once
        assert!(started.elapsed() >= Duration::from_millis(900));
        assert_eq!(session.builder().step(), BuilderStep::Summary);
        assert_eq!(quote.subtotal, d(305));
        assert_eq!(quote.discount, Decimal::new(3050, 2));
        assert_eq!(quote.total, Decimal::new(27450, 2));
    }

    #[tokio::test]
    async fn test_session_reports_missing_duration() {
        let mut session = BuilderSession::new(Duration::ZERO);
        let plan = PackagePlan {
            massage: Some("Deep Tissue Massage".into()),
            ..Default::default()
        };
        let err = session.run(&plan).await.unwrap_err();
        assert!(err.to_string().contains("60min, 90min"));
    }
}
