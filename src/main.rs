use clap::{Parser, Subcommand};
use eyre::Result;

use teller::config::Config;
use teller::portfolio::{Allocation, ChartConfig, PieChart};
use teller::session::{parse_amount, parse_percentage, Session};
use teller::utils::app_context::AppContext;
use teller::utils::logger::setup_logger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the vault balance
    Balance,
    /// Deposit into the vault and wait for confirmation
    Deposit { amount: String },
    /// Withdraw from the vault and wait for confirmation
    Withdraw { amount: String },
    /// Draw the portfolio allocation chart
    Chart {
        /// Emit a Chart.js pie configuration as JSON instead of drawing
        #[arg(long)]
        json: bool,
    },
    /// Adjust one asset's share and draw the resulting chart
    Adjust { asset: String, percentage: String },
}

async fn show_balance() -> Result<()> {
    let context = AppContext::new(Config::from_env()).await?;
    let balance = context.atm().get_balance().await?;
    println!("Your account: {}", context.account);
    println!("Your balance: {balance}");
    Ok(())
}

async fn deposit(amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    let context = AppContext::new(Config::from_env()).await?;
    let atm = context.atm();
    atm.deposit(amount).await?;
    println!("Deposited {amount}. Your balance: {}", atm.get_balance().await?);
    Ok(())
}

async fn withdraw(amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    let context = AppContext::new(Config::from_env()).await?;
    let atm = context.atm();
    atm.withdraw(amount).await?;
    println!("Withdrew {amount}. Your balance: {}", atm.get_balance().await?);
    Ok(())
}

fn show_chart(json: bool) -> Result<()> {
    let allocation = Allocation::default_mix();
    if json {
        println!("{}", ChartConfig::from_allocation(&allocation).to_json()?);
    } else {
        print!("{}", PieChart::default().render(&allocation));
    }
    Ok(())
}

fn adjust(asset: &str, percentage: &str) -> Result<()> {
    let target_pct = parse_percentage(percentage)?;
    let mut allocation = Allocation::default_mix();
    allocation.adjust(asset, target_pct)?;
    print!("{}", PieChart::default().render(&allocation));
    Ok(())
}

async fn run_session() -> Result<()> {
    let context = AppContext::new(Config::from_env()).await?;
    let mut session = Session::new(context.atm(), context.account);
    session.run().await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    setup_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Balance) => show_balance().await?,
        Some(Commands::Deposit { amount }) => deposit(&amount).await?,
        Some(Commands::Withdraw { amount }) => withdraw(&amount).await?,
        Some(Commands::Chart { json }) => show_chart(json)?,
        Some(Commands::Adjust { asset, percentage }) => adjust(&asset, &percentage)?,
        None => run_session().await?,
    }

    Ok(())
}
