use anyhow::Result;
use rust_decimal::Decimal;
use spa_cart::adapters::payment::SimulatedGateway;
use spa_cart::core::builder::{BuilderSession, BuilderStep, PackagePlan};
use spa_cart::core::handshake::ContinuationParams;
use spa_cart::{CartService, CheckoutService, LocalStorage};
use spa_cart::domain::model::{CardInput, CustomerInfo};
use std::time::Duration;
use tempfile::TempDir;

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Grace Hopper".into(),
        email: "grace@example.com".into(),
        phone: "555-0199".into(),
        notes: "First visit".into(),
    }
}

fn card() -> CardInput {
    CardInput {
        number: "4111111111111111".into(),
        expiry: "09/31".into(),
        cvv: "321".into(),
        postal_code: "02139".into(),
    }
}

#[tokio::test]
async fn test_package_to_checkout_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    let mut cart = CartService::load(storage.clone(), "spaCart").await;
    assert!(cart.is_empty());

    let mut session = BuilderSession::new(Duration::ZERO);
    let plan = PackagePlan {
        massage: Some("Deep Tissue Massage".into()),
        massage_duration: Some("90min".into()),
        facial: Some("Anti-Aging Facial".into()),
        addons: vec!["Scalp Treatment".into()],
        membership: None,
        notes: Some("Allergic to nuts".into()),
    };
    let quote = session.run(&plan).await?;
    assert_eq!(session.builder().step(), BuilderStep::Summary);

    // 185 + 140 + 20 = 345, three items -> 10%
    assert_eq!(quote.subtotal, Decimal::new(345, 0));
    assert_eq!(quote.total, Decimal::new(31050, 2));

    session.builder_mut().add_to_cart(&mut cart).await?;
    assert_eq!(cart.total(), quote.total);
    assert_eq!(session.builder().step(), BuilderStep::Idle);

    // 重新載入後內容一致
    let reloaded = CartService::load(storage.clone(), "spaCart").await;
    assert_eq!(reloaded.items(), cart.items());
    assert_eq!(reloaded.total(), Decimal::new(31050, 2));

    let stored = std::fs::read_to_string(storage.path_for("spaCart"))?;
    let json: serde_json::Value = serde_json::from_str(&stored)?;
    let first = &json[0];
    assert_eq!(first["service"], "Deep Tissue Massage");
    assert_eq!(first["duration"], "90min");
    assert_eq!(first["price"], 185.0);
    assert!(first["id"].is_i64());

    let continuation = ContinuationParams::new(cart.total());
    assert_eq!(
        continuation.prefill_message(),
        "I'd like to complete my booking. Cart total: $310.50"
    );

    let checkout = CheckoutService::new(SimulatedGateway::new("sandbox-app", "LOC1", Duration::ZERO));
    let confirmation = checkout.checkout(&mut cart, &customer(), &card()).await?;
    assert_eq!(confirmation.total, Decimal::new(31050, 2));
    assert_eq!(confirmation.items.len(), 5);
    assert!(cart.is_empty());

    let after = CartService::load(storage, "spaCart").await;
    assert!(after.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_cart_file_is_treated_as_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());
    std::fs::write(storage.path_for("spaCart"), "[{\"id\": \"oops\"")?;

    let mut cart = CartService::load(storage.clone(), "spaCart").await;
    assert!(cart.is_empty());

    cart.add_item("Classic Facial", "50min", Decimal::new(95, 0)).await?;
    let reloaded = CartService::load(storage, "spaCart").await;
    assert_eq!(reloaded.item_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_legacy_cart_layout_loads() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());
    std::fs::write(
        storage.path_for("spaCart"),
        r#"[{"id":1718000000000,"service":"Swedish Massage","duration":"60min","price":120},
            {"id":1718000000500,"service":"Hydrafacial Signature","duration":"45min","price":165}]"#,
    )?;

    let cart = CartService::load(storage, "spaCart").await;
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total(), Decimal::new(285, 0));
    Ok(())
}
