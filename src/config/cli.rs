use crate::domain::model::FulfillmentMethod;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Parser)]
#[command(name = "spa-cart")]
#[command(about = "Spa booking cart, package builder and order intake")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "spa-cart.toml")]
    pub config: String,

    /// Override [storage] path from config
    #[arg(long)]
    pub storage_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the service menu
    Catalog,
    /// Inspect or change the cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Price a list of services with the package tier discount
    Quote {
        #[arg(required = true)]
        prices: Vec<Decimal>,
    },
    /// Build a custom package and add it to the cart
    Package(PackageArgs),
    /// Pay for the cart
    Checkout(CheckoutArgs),
    /// Read a checkout-continuation URL, or build one from the cart total
    Continue {
        /// URL carrying ?checkout=true&total=...; omit to build one
        url: Option<String>,
    },
    /// Submit a fireworks order to the order webhook
    Fireworks(FireworksArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    Show,
    Add {
        #[arg(long)]
        service: String,
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, allow_hyphen_values = true)]
        price: Decimal,
    },
    Remove {
        id: i64,
    },
    Clear,
    Total,
}

#[derive(Debug, Clone, Args)]
pub struct PackageArgs {
    #[arg(long)]
    pub massage: Option<String>,
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub facial: Option<String>,
    #[arg(long = "addon")]
    pub addons: Vec<String>,
    #[arg(long)]
    pub membership: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Show the summary without adding to the cart
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    #[arg(long)]
    pub card: String,
    #[arg(long)]
    pub expiry: String,
    #[arg(long)]
    pub cvv: String,
    #[arg(long, default_value = "")]
    pub postal_code: String,
}

#[derive(Debug, Clone, Args)]
pub struct FireworksArgs {
    #[arg(long)]
    pub customer: String,
    #[arg(long, default_value = "pickup")]
    pub fulfillment: FulfillmentMethod,
    /// `<product>=<quantity>`, repeatable
    #[arg(long = "item", value_parser = parse_item)]
    pub items: Vec<(String, u32)>,
    /// Print the payload instead of posting it
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_item(raw: &str) -> Result<(String, u32), String> {
    let (name, qty) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected <product>=<quantity>, got '{}'", raw))?;
    let qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("bad quantity in '{}': {}", raw, e))?;
    Ok((name.trim().to_string(), qty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        assert_eq!(parse_item("500g Cake=2").unwrap(), ("500g Cake".to_string(), 2));
        assert!(parse_item("500g Cake").is_err());
        assert!(parse_item("Cake=-1").is_err());
    }

    #[test]
    fn test_parse_cli() {
        let cli = CliConfig::try_parse_from([
            "spa-cart",
            "package",
            "--massage",
            "Swedish Massage",
            "--duration",
            "60min",
            "--addon",
            "CBD Oil",
            "--addon",
            "Hot Stones",
        ])
        .unwrap();
        let Command::Package(args) = cli.command else {
            panic!("expected package command");
        };
        assert_eq!(args.addons, vec!["CBD Oil", "Hot Stones"]);
        assert_eq!(cli.config, "spa-cart.toml");
    }

    #[test]
    fn test_negative_price_allowed() {
        let cli = CliConfig::try_parse_from([
            "spa-cart", "cart", "add", "--service", "Discount", "--price", "-10.50",
        ])
        .unwrap();
        let Command::Cart(CartCommand::Add { price, .. }) = cli.command else {
            panic!("expected cart add");
        };
        assert_eq!(price, Decimal::new(-1050, 2));
    }
}
