//! Interactive vault session: the terminal counterpart of the single page.
//!
//! One session owns the allocation and a cached balance. Every command is a
//! single round trip handled to completion before the next prompt; invalid
//! input is reported and changes nothing.

use alloy::primitives::{Address, U256};
use eyre::{eyre, Result};
use log::warn;
use std::io::Write as _;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::atm::Atm;
use crate::portfolio::{AdjustError, Allocation, PieChart};

/// Parses a whole-token amount typed by the user.
///
/// # Errors
/// * If the input is not a non-negative decimal integer
pub fn parse_amount(raw: &str) -> Result<U256> {
    raw.trim()
        .parse::<U256>()
        .map_err(|_| eyre!("please enter a valid amount, got {raw:?}"))
}

/// Parses a percentage typed by the user. Range checking happens in the
/// allocation itself.
///
/// # Errors
/// * If the input is not a number
pub fn parse_percentage(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| eyre!("please enter a valid percentage, got {raw:?}"))
}

/// One line of user input, parsed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Balance,
    Deposit(U256),
    Withdraw(U256),
    Adjust { asset: String, target_pct: f64 },
    Chart,
    Assets,
    Help,
    Quit,
}

impl Command {
    /// Parses a prompt line.
    ///
    /// The asset name in `set` may contain spaces ("Binance Coin"), so the
    /// percentage is the last word and the name is everything in between.
    ///
    /// # Errors
    /// * If the line is empty, unknown, or its arguments do not parse
    pub fn parse(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => Err(eyre!("empty command, try `help`")),
            ["balance"] => Ok(Self::Balance),
            ["deposit", amount] => Ok(Self::Deposit(parse_amount(amount)?)),
            ["deposit", ..] => Err(eyre!("usage: deposit <amount>")),
            ["withdraw", amount] => Ok(Self::Withdraw(parse_amount(amount)?)),
            ["withdraw", ..] => Err(eyre!("usage: withdraw <amount>")),
            ["set", middle @ .., last] if !middle.is_empty() => Ok(Self::Adjust {
                asset: middle.join(" "),
                target_pct: parse_percentage(last)?,
            }),
            ["set", ..] => Err(eyre!("usage: set <asset> <percentage>")),
            ["chart"] => Ok(Self::Chart),
            ["assets"] => Ok(Self::Assets),
            ["help"] => Ok(Self::Help),
            ["quit" | "exit"] => Ok(Self::Quit),
            [other, ..] => Err(eyre!("unknown command {other:?}, try `help`")),
        }
    }
}

/// Whether the loop continues after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// The session state: one vault client, one account, one allocation
pub struct Session<A> {
    atm: A,
    account: Address,
    allocation: Allocation,
    chart: PieChart,
    balance: Option<U256>,
}

impl<A: Atm> Session<A> {
    pub fn new(atm: A, account: Address) -> Self {
        Self {
            atm,
            account,
            allocation: Allocation::default_mix(),
            chart: PieChart::default(),
            balance: None,
        }
    }

    #[must_use]
    pub const fn balance(&self) -> Option<U256> {
        self.balance
    }

    #[must_use]
    pub const fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Fetches the vault balance and caches it.
    ///
    /// # Errors
    /// * If the balance call fails
    pub async fn refresh_balance(&mut self) -> Result<U256> {
        let balance = self.atm.balance().await?;
        self.balance = Some(balance);
        Ok(balance)
    }

    /// Deposits and refreshes the cached balance.
    ///
    /// # Errors
    /// * If the deposit or the follow-up balance call fails
    pub async fn deposit(&mut self, amount: U256) -> Result<U256> {
        self.atm.deposit(amount).await?;
        self.refresh_balance().await
    }

    /// Withdraws and refreshes the cached balance.
    ///
    /// # Errors
    /// * If the withdrawal or the follow-up balance call fails
    pub async fn withdraw(&mut self, amount: U256) -> Result<U256> {
        self.atm.withdraw(amount).await?;
        self.refresh_balance().await
    }

    /// Adjusts one asset's share of the allocation.
    ///
    /// # Errors
    /// * Any `AdjustError`; the allocation is unchanged on error
    pub fn adjust(&mut self, asset: &str, target_pct: f64) -> Result<(), AdjustError> {
        self.allocation.adjust(asset, target_pct)?;
        Ok(())
    }

    #[must_use]
    pub fn render_chart(&self) -> String {
        self.chart.render(&self.allocation)
    }

    fn print_assets(&self) {
        for asset in self.allocation.assets() {
            println!("  {asset}");
        }
    }

    fn print_help() {
        println!("Commands:");
        println!("  balance                  show the vault balance");
        println!("  deposit <amount>         deposit into the vault");
        println!("  withdraw <amount>        withdraw from the vault");
        println!("  set <asset> <percent>    adjust one asset's share");
        println!("  chart                    redraw the allocation chart");
        println!("  assets                   list tracked assets");
        println!("  quit                     leave the session");
    }

    /// Runs one parsed command to completion.
    ///
    /// Errors from the vault or the allocation are reported here and the
    /// session keeps going; only I/O on the terminal would end it.
    pub async fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::Balance => match self.refresh_balance().await {
                Ok(balance) => println!("Your balance: {balance}"),
                Err(e) => println!("Balance unavailable: {e}"),
            },
            Command::Deposit(amount) => match self.deposit(amount).await {
                Ok(balance) => println!("Deposited {amount}. Your balance: {balance}"),
                Err(e) => println!("Deposit failed: {e}"),
            },
            Command::Withdraw(amount) => match self.withdraw(amount).await {
                Ok(balance) => println!("Withdrew {amount}. Your balance: {balance}"),
                Err(e) => println!("Withdrawal failed: {e}"),
            },
            Command::Adjust { asset, target_pct } => match self.adjust(&asset, target_pct) {
                Ok(()) => print!("{}", self.render_chart()),
                Err(e) => {
                    println!("{e}");
                    if matches!(e, AdjustError::UnknownAsset { .. }) {
                        println!("Tracked assets:");
                        self.print_assets();
                    }
                }
            },
            Command::Chart => print!("{}", self.render_chart()),
            Command::Assets => self.print_assets(),
            Command::Help => Self::print_help(),
            Command::Quit => return Outcome::Quit,
        }
        Outcome::Continue
    }

    /// Runs the interactive loop until `quit` or end of input.
    ///
    /// # Errors
    /// * If reading from or flushing the terminal fails
    pub async fn run(&mut self) -> Result<()> {
        println!("Welcome to the Metacrafters ATM!");
        println!("Your account: {}", self.account);

        match self.refresh_balance().await {
            Ok(balance) => println!("Your balance: {balance}"),
            Err(e) => warn!("Could not fetch balance: {e}"),
        }
        println!("\nPortfolio tracking");
        print!("{}", self.render_chart());
        Self::print_help();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let outcome = match Command::parse(&line) {
                Ok(command) => self.handle(command).await,
                Err(e) => {
                    println!("{e}");
                    Outcome::Continue
                }
            };
            if outcome == Outcome::Quit {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::bail;
    use std::sync::Mutex;

    /// In-memory stand-in for the deployed vault
    struct FakeAtm {
        balance: Mutex<U256>,
    }

    impl FakeAtm {
        fn with_balance(balance: u64) -> Self {
            Self {
                balance: Mutex::new(U256::from(balance)),
            }
        }
    }

    impl Atm for FakeAtm {
        async fn balance(&self) -> Result<U256> {
            Ok(*self.balance.lock().unwrap())
        }

        async fn deposit(&self, amount: U256) -> Result<()> {
            let mut balance = self.balance.lock().unwrap();
            *balance += amount;
            Ok(())
        }

        async fn withdraw(&self, amount: U256) -> Result<()> {
            let mut balance = self.balance.lock().unwrap();
            if *balance < amount {
                bail!("insufficient balance: {} < {amount}", *balance);
            }
            *balance -= amount;
            Ok(())
        }
    }

    fn session(balance: u64) -> Session<FakeAtm> {
        Session::new(FakeAtm::with_balance(balance), Address::ZERO)
    }

    #[tokio::test]
    async fn test_balance_fetched_on_demand() {
        let mut session = session(42);
        assert_eq!(session.balance(), None);
        assert_eq!(session.refresh_balance().await.unwrap(), U256::from(42));
        assert_eq!(session.balance(), Some(U256::from(42)));
    }

    #[tokio::test]
    async fn test_deposit_updates_cached_balance() {
        let mut session = session(10);
        let balance = session.deposit(U256::from(5)).await.unwrap();
        assert_eq!(balance, U256::from(15));
        assert_eq!(session.balance(), Some(U256::from(15)));
    }

    #[tokio::test]
    async fn test_withdraw_updates_cached_balance() {
        let mut session = session(10);
        let balance = session.withdraw(U256::from(4)).await.unwrap();
        assert_eq!(balance, U256::from(6));
        assert_eq!(session.balance(), Some(U256::from(6)));
    }

    #[tokio::test]
    async fn test_failed_withdrawal_leaves_balance() {
        let mut session = session(3);
        session.refresh_balance().await.unwrap();

        assert!(session.withdraw(U256::from(10)).await.is_err());
        assert_eq!(session.balance(), Some(U256::from(3)));
    }

    #[tokio::test]
    async fn test_adjust_flows_into_chart() {
        let mut session = session(0);
        session.adjust("Bitcoin", 10.0).unwrap();
        assert!((session.allocation().weights()[1] - 10.0).abs() < 1e-9);
        assert!(session.render_chart().contains("Bitcoin"));
    }

    #[tokio::test]
    async fn test_handle_quit() {
        let mut session = session(0);
        assert_eq!(session.handle(Command::Quit).await, Outcome::Quit);
        assert_eq!(session.handle(Command::Help).await, Outcome::Continue);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("balance").unwrap(), Command::Balance);
        assert_eq!(
            Command::parse("deposit 100").unwrap(),
            Command::Deposit(U256::from(100))
        );
        assert_eq!(
            Command::parse(" withdraw  7 ").unwrap(),
            Command::Withdraw(U256::from(7))
        );
        assert_eq!(
            Command::parse("set Binance Coin 12.5").unwrap(),
            Command::Adjust {
                asset: "Binance Coin".to_string(),
                target_pct: 12.5
            }
        );
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("deposit").is_err());
        assert!(Command::parse("deposit ten").is_err());
        assert!(Command::parse("deposit -5").is_err());
        assert!(Command::parse("set Bitcoin").is_err());
        assert!(Command::parse("set Bitcoin lots").is_err());
        assert!(Command::parse("teleport").is_err());
    }

    #[test]
    fn test_parse_amount_bounds() {
        assert_eq!(parse_amount("0").unwrap(), U256::ZERO);
        assert!(parse_amount("1.5").is_err());
        assert!(parse_amount("").is_err());
    }
}
