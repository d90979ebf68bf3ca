use anyhow::Context;
use clap::Parser;
use spa_cart::adapters::payment::{SimulatedGateway, UnavailableGateway};
use spa_cart::adapters::storage::LocalStorage;
use spa_cart::adapters::webhook::HttpOrderWebhook;
use spa_cart::config::cli::{CartCommand, CheckoutArgs, Command, FireworksArgs, PackageArgs};
use spa_cart::core::builder::{BuilderSession, PackagePlan};
use spa_cart::core::fireworks::{self, FireworksOrder};
use spa_cart::core::handshake::ContinuationParams;
use spa_cart::core::notify::{NotificationCenter, ToastObserver};
use spa_cart::domain::model::{CardInput, CustomerInfo, OrderLine};
use spa_cart::domain::ports::PaymentGateway;
use spa_cart::render::{self, RenderingObserver};
use spa_cart::utils::error::{ErrorSeverity, ShopError};
use spa_cart::utils::{logger, validation::Validate};
use spa_cart::{AppConfig, CartService, CheckoutService, CliConfig};

type Cart = CartService<LocalStorage>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI args: {:?}", cli);

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config file '{}'", cli.config))?;
    if let Some(path) = &cli.storage_path {
        config.storage.path = path.clone();
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.storage.path.clone());
    let mut cart = CartService::load(storage, config.storage.cart_key.clone()).await;
    let notifications = NotificationCenter::new();
    cart.subscribe(Box::new(ToastObserver::new(
        notifications.clone(),
        config.dismiss_after(),
    )));
    let (renderer, view) = RenderingObserver::new();
    cart.subscribe(Box::new(renderer));

    let outcome = match cli.command {
        Command::Catalog => {
            print!("{}", render::render_catalog());
            Ok(())
        }
        Command::Cart(command) => run_cart(&mut cart, command).await,
        Command::Quote { prices } => {
            let quote = spa_cart::core::pricing::quote(&prices);
            println!("Items:    {}", quote.item_count);
            println!("Subtotal: ${:.2}", quote.subtotal);
            println!(
                "Discount: ${:.2} ({}%)",
                quote.discount,
                quote.discount_percent()
            );
            println!("Total:    ${:.2}", quote.total);
            Ok(())
        }
        Command::Package(args) => run_package(&config, &mut cart, args).await,
        Command::Checkout(args) => run_checkout(&config, &mut cart, args).await,
        Command::Continue { url } => run_continue(&config, &cart, url),
        Command::Fireworks(args) => run_fireworks(&config, args).await,
    };

    if let Some(toast) = notifications.current() {
        println!("{}", toast.message);
    }
    if let Ok(view) = view.lock() {
        if view.renders > 1 && !view.badge.is_empty() {
            println!("{}", view.badge);
        }
    }

    if let Err(e) = outcome {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run_cart(cart: &mut Cart, command: CartCommand) -> Result<(), ShopError> {
    match command {
        CartCommand::Show => print!("{}", render::render_cart(cart.items())),
        CartCommand::Add {
            service,
            duration,
            price,
        } => {
            let item = cart.add_item(service, duration, price).await?;
            println!("Added #{}", item.id);
        }
        CartCommand::Remove { id } => {
            if !cart.remove_item(id).await? {
                println!("No item #{} in cart", id);
            }
            print!("{}", render::render_cart(cart.items()));
        }
        CartCommand::Clear => {
            cart.clear().await?;
            println!("Cart cleared");
        }
        CartCommand::Total => println!("${:.2}", cart.total()),
    }
    Ok(())
}

async fn run_package(config: &AppConfig, cart: &mut Cart, args: PackageArgs) -> Result<(), ShopError> {
    let plan = PackagePlan {
        massage: args.massage,
        massage_duration: args.duration,
        facial: args.facial,
        addons: args.addons,
        membership: args.membership,
        notes: args.notes,
    };

    let mut session = BuilderSession::new(config.advance_delay());
    session.run(&plan).await?;
    print!("{}", render::render_builder(session.builder()));

    if args.dry_run {
        return Ok(());
    }
    let added = session.builder_mut().add_to_cart(cart).await?;
    println!("Added {} line(s) to cart, cart total ${:.2}", added.len(), cart.total());
    Ok(())
}

async fn run_checkout(config: &AppConfig, cart: &mut Cart, args: CheckoutArgs) -> Result<(), ShopError> {
    let customer = CustomerInfo {
        name: args.name,
        email: args.email,
        phone: args.phone,
        notes: args.notes,
    };
    let card = CardInput {
        number: args.card,
        expiry: args.expiry,
        cvv: args.cvv,
        postal_code: args.postal_code,
    };

    let payment = &config.payment;
    if !payment.enabled {
        return checkout_with(
            CheckoutService::new(UnavailableGateway::new("online payment is disabled")),
            cart,
            &customer,
            &card,
        )
        .await;
    }

    let gateway = SimulatedGateway::new(
        payment.application_id.clone().unwrap_or_default(),
        payment.location_id.clone().unwrap_or_default(),
        config.payment_delay(),
    );
    checkout_with(CheckoutService::new(gateway), cart, &customer, &card).await
}

async fn checkout_with<G: PaymentGateway>(
    service: CheckoutService<G>,
    cart: &mut Cart,
    customer: &CustomerInfo,
    card: &CardInput,
) -> Result<(), ShopError> {
    println!("{}", service.status_message());
    let confirmation = service.checkout(cart, customer, card).await?;
    println!("✅ Booking confirmed: {}", confirmation.order_id);
    println!("   Charged ${:.2} to card ****{}", confirmation.total, confirmation.receipt.card_last4);
    Ok(())
}

fn run_continue(config: &AppConfig, cart: &Cart, url: Option<String>) -> Result<(), ShopError> {
    match url {
        Some(url) => match ContinuationParams::parse(&url)? {
            Some(params) => println!("{}", params.prefill_message()),
            None => println!("No checkout parameters in URL"),
        },
        None => {
            let site = config
                .site
                .as_ref()
                .ok_or_else(|| ShopError::MissingConfigError {
                    field: "site.contact_url".to_string(),
                })?;
            let base = url::Url::parse(&site.contact_url).map_err(|e| ShopError::ConfigError {
                message: format!("site.contact_url: {}", e),
            })?;
            println!("{}", ContinuationParams::new(cart.total()).apply_to(&base));
        }
    }
    Ok(())
}

async fn run_fireworks(config: &AppConfig, args: FireworksArgs) -> Result<(), ShopError> {
    let mut lines = Vec::new();
    for (name, quantity) in &args.items {
        let product = fireworks::find_product(name)
            .ok_or_else(|| ShopError::not_found("product", name.as_str()))?;
        lines.push(OrderLine::new(product.name, *quantity, product.price()));
    }
    let order = FireworksOrder::new(&args.customer, args.fulfillment, lines)?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&order.to_payload())?);
        return Ok(());
    }

    let endpoint = config
        .webhook
        .as_ref()
        .ok_or_else(|| ShopError::MissingConfigError {
            field: "webhook.endpoint".to_string(),
        })?;
    let webhook = HttpOrderWebhook::new(endpoint.endpoint.clone(), config.webhook_timeout())?;
    let message = fireworks::submit_order(&webhook, &order).await?;
    println!("🎆 Order submitted: {}", message);
    Ok(())
}
