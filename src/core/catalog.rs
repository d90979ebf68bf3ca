use crate::domain::model::{CatalogEntry, CatalogKind, PriceOption};
use crate::utils::error::{Result, ShopError};

const fn opt(label: &'static str, price_cents: i64) -> PriceOption {
    PriceOption { label, price_cents }
}

static MASSAGES: &[CatalogEntry] = &[
    CatalogEntry {
        kind: CatalogKind::Massage,
        name: "Swedish Massage",
        description: "Long, flowing strokes for full-body relaxation",
        options: &[opt("60min", 12000), opt("90min", 16500)],
    },
    CatalogEntry {
        kind: CatalogKind::Massage,
        name: "Deep Tissue Massage",
        description: "Firm pressure targeting chronic tension",
        options: &[opt("60min", 13500), opt("90min", 18500)],
    },
    CatalogEntry {
        kind: CatalogKind::Massage,
        name: "Hot Stone Massage",
        description: "Heated basalt stones melt away muscle tightness",
        options: &[opt("75min", 15000)],
    },
    CatalogEntry {
        kind: CatalogKind::Massage,
        name: "Prenatal Massage",
        description: "Side-lying support for expecting mothers",
        options: &[opt("60min", 12500)],
    },
    CatalogEntry {
        kind: CatalogKind::Massage,
        name: "Couples Massage",
        description: "Side-by-side treatment in our private suite",
        options: &[opt("60min", 24000), opt("90min", 33000)],
    },
];

static FACIALS: &[CatalogEntry] = &[
    CatalogEntry {
        kind: CatalogKind::Facial,
        name: "Classic Facial",
        description: "Cleanse, exfoliate, extract and hydrate",
        options: &[opt("50min", 9500)],
    },
    CatalogEntry {
        kind: CatalogKind::Facial,
        name: "Hydrafacial Signature",
        description: "Deep cleanse, extraction and hydration",
        options: &[opt("45min", 16500)],
    },
    CatalogEntry {
        kind: CatalogKind::Facial,
        name: "Hydrafacial Deluxe",
        description: "Signature treatment plus booster and LED therapy",
        options: &[opt("60min", 21500)],
    },
    CatalogEntry {
        kind: CatalogKind::Facial,
        name: "Anti-Aging Facial",
        description: "Peptide serums and lifting massage",
        options: &[opt("60min", 14000)],
    },
];

static ADDONS: &[CatalogEntry] = &[
    CatalogEntry {
        kind: CatalogKind::Addon,
        name: "Aromatherapy",
        description: "Essential oil blend of your choice",
        options: &[opt("Add-on", 1500)],
    },
    CatalogEntry {
        kind: CatalogKind::Addon,
        name: "Hot Stones",
        description: "Add heated stones to any massage",
        options: &[opt("Add-on", 2000)],
    },
    CatalogEntry {
        kind: CatalogKind::Addon,
        name: "CBD Oil",
        description: "Full-spectrum CBD for deeper relief",
        options: &[opt("Add-on", 2500)],
    },
    CatalogEntry {
        kind: CatalogKind::Addon,
        name: "Scalp Treatment",
        description: "Nourishing scalp massage with warm oil",
        options: &[opt("Add-on", 2000)],
    },
    CatalogEntry {
        kind: CatalogKind::Addon,
        name: "Body Scrub",
        description: "Sea-salt exfoliation",
        options: &[opt("Add-on", 3000)],
    },
];

static MEMBERSHIPS: &[CatalogEntry] = &[
    CatalogEntry {
        kind: CatalogKind::Membership,
        name: "Massage Membership",
        description: "One 60min massage every month",
        options: &[opt("Monthly", 9900)],
    },
    CatalogEntry {
        kind: CatalogKind::Membership,
        name: "Facial Membership",
        description: "One signature facial every month",
        options: &[opt("Monthly", 11900)],
    },
    CatalogEntry {
        kind: CatalogKind::Membership,
        name: "VIP Membership",
        description: "One massage and one facial every month",
        options: &[opt("Monthly", 19900)],
    },
];

pub fn massages() -> &'static [CatalogEntry] {
    MASSAGES
}

pub fn facials() -> &'static [CatalogEntry] {
    FACIALS
}

pub fn addons() -> &'static [CatalogEntry] {
    ADDONS
}

pub fn memberships() -> &'static [CatalogEntry] {
    MEMBERSHIPS
}

pub fn entries(kind: CatalogKind) -> &'static [CatalogEntry] {
    match kind {
        CatalogKind::Massage => MASSAGES,
        CatalogKind::Facial => FACIALS,
        CatalogKind::Addon => ADDONS,
        CatalogKind::Membership => MEMBERSHIPS,
    }
}

/// Case-insensitive lookup by name within one catalog.
pub fn find(kind: CatalogKind, name: &str) -> Option<&'static CatalogEntry> {
    entries(kind)
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
}

pub fn lookup(kind: CatalogKind, name: &str) -> Result<&'static CatalogEntry> {
    find(kind, name).ok_or_else(|| ShopError::not_found(kind.label(), name))
}
