//! Typed client for the deployed `Assessment` vault contract.
//!
//! The contract interface is fixed, out-of-band configuration: a balance
//! getter plus deposit/withdraw mutations. Each operation here is one round
//! trip; mutations send a transaction and wait for its receipt before
//! returning, the way the page awaited `tx.wait()`.

use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionReceipt;
use alloy::sol;
use eyre::{ensure, Result, WrapErr};
use log::info;

sol! {
    #[sol(rpc)]
    contract Assessment {
        address payable public owner;
        uint256 public balance;

        event Deposit(uint256 amount);
        event Withdraw(uint256 amount);

        error InsufficientBalance(uint256 balance, uint256 withdrawAmount);

        function getBalance() public view returns (uint256);
        function deposit(uint256 _amount) public payable;
        function withdraw(uint256 _withdrawAmount) public;
    }
}

/// Vault operations the session needs, as a seam so tests can substitute an
/// in-memory fake for the deployed contract.
#[allow(async_fn_in_trait)]
pub trait Atm {
    async fn balance(&self) -> Result<U256>;
    async fn deposit(&self, amount: U256) -> Result<()>;
    async fn withdraw(&self, amount: U256) -> Result<()>;
}

/// Client bound to one deployed `Assessment` instance
#[derive(Debug, Clone)]
pub struct AtmClient<P> {
    address: Address,
    provider: P,
}

impl<P: Provider<Ethereum> + Clone> AtmClient<P> {
    pub const fn new(address: Address, provider: P) -> Self {
        Self { address, provider }
    }

    /// Reads the vault balance.
    ///
    /// # Errors
    /// * If the `getBalance` call fails
    pub async fn get_balance(&self) -> Result<U256> {
        let vault = Assessment::new(self.address, self.provider.clone());
        let balance = vault.getBalance().call().await?._0;
        Ok(balance)
    }

    /// Deposits `amount` and waits for the transaction receipt.
    ///
    /// # Errors
    /// * If sending the transaction fails or the receipt reports a revert
    pub async fn deposit(&self, amount: U256) -> Result<TransactionReceipt> {
        let vault = Assessment::new(self.address, self.provider.clone());
        let receipt = vault
            .deposit(amount)
            .send()
            .await
            .wrap_err("deposit rejected")?
            .get_receipt()
            .await?;
        ensure!(
            receipt.status(),
            "deposit reverted in transaction {}",
            receipt.transaction_hash
        );
        info!("Deposited {amount} in {}", receipt.transaction_hash);
        Ok(receipt)
    }

    /// Withdraws `amount` and waits for the transaction receipt.
    ///
    /// The contract reverts with `InsufficientBalance` when the vault holds
    /// less than `amount`; that surfaces here as an error.
    ///
    /// # Errors
    /// * If sending the transaction fails or the receipt reports a revert
    pub async fn withdraw(&self, amount: U256) -> Result<TransactionReceipt> {
        let vault = Assessment::new(self.address, self.provider.clone());
        let receipt = vault
            .withdraw(amount)
            .send()
            .await
            .wrap_err("withdrawal rejected")?
            .get_receipt()
            .await?;
        ensure!(
            receipt.status(),
            "withdrawal reverted in transaction {}",
            receipt.transaction_hash
        );
        info!("Withdrew {amount} in {}", receipt.transaction_hash);
        Ok(receipt)
    }
}

impl<P: Provider<Ethereum> + Clone> Atm for AtmClient<P> {
    async fn balance(&self) -> Result<U256> {
        self.get_balance().await
    }

    async fn deposit(&self, amount: U256) -> Result<()> {
        Self::deposit(self, amount).await.map(|_| ())
    }

    async fn withdraw(&self, amount: U256) -> Result<()> {
        Self::withdraw(self, amount).await.map(|_| ())
    }
}
