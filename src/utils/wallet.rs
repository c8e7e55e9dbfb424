//! Wallet connector: detects a configured wallet key and authorizes accounts.
//!
//! This is the CLI stand-in for a browser-injected provider. Detection asks
//! whether a key is configured at all, and `request_accounts` plays the role
//! of the authorization prompt: until it is called, `accounts` stays empty.

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use derive_more::Display;
use log::info;

use crate::config::Config;

/// Why a wallet is unusable
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WalletError {
    /// No key configured at all, the install-prompt case
    #[display("no wallet detected: set TELLER_PRIVATE_KEY to use the vault")]
    Missing,
    /// A key is configured but cannot be parsed
    #[display("wallet key is invalid: {reason}")]
    Invalid { reason: String },
    /// A wallet exists but no account has been authorized yet
    #[display("no account connected: request accounts before using the vault")]
    NotConnected,
}

impl std::error::Error for WalletError {}

/// A detected wallet and the accounts it has authorized so far
#[derive(Debug)]
pub struct WalletConnector {
    signer: PrivateKeySigner,
    accounts: Vec<Address>,
}

impl WalletConnector {
    /// Looks for a configured wallet key.
    ///
    /// # Errors
    /// * `WalletError::Missing` if no key is configured
    /// * `WalletError::Invalid` if the key does not parse
    pub fn detect(config: &Config) -> Result<Self, WalletError> {
        let key = config.private_key.as_deref().ok_or(WalletError::Missing)?;
        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|e| WalletError::Invalid {
                reason: e.to_string(),
            })?;

        Ok(Self {
            signer,
            accounts: Vec::new(),
        })
    }

    /// Authorizes the wallet's accounts and returns them.
    pub fn request_accounts(&mut self) -> &[Address] {
        if self.accounts.is_empty() {
            let address = self.signer.address();
            info!("Account connected: {address}");
            self.accounts.push(address);
        }
        &self.accounts
    }

    /// Accounts authorized so far, empty before `request_accounts`
    #[must_use]
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// The first authorized account.
    ///
    /// # Errors
    /// * `WalletError::NotConnected` before `request_accounts`
    pub fn account(&self) -> Result<Address, WalletError> {
        self.accounts
            .first()
            .copied()
            .ok_or(WalletError::NotConnected)
    }

    /// Signing wallet for transaction-sending providers
    #[must_use]
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // First default hardhat/anvil development key and its address
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn config_with_key(key: Option<&str>) -> Config {
        let mut config = Config::test_config();
        config.private_key = key.map(ToString::to_string);
        config
    }

    #[test]
    fn test_detect_missing() {
        let err = WalletConnector::detect(&config_with_key(None)).unwrap_err();
        assert_eq!(err, WalletError::Missing);
    }

    #[test]
    fn test_detect_invalid_key() {
        let err = WalletConnector::detect(&config_with_key(Some("0xnot-a-key"))).unwrap_err();
        assert!(matches!(err, WalletError::Invalid { .. }));
    }

    #[test]
    fn test_accounts_empty_until_requested() {
        let mut connector = WalletConnector::detect(&config_with_key(Some(DEV_KEY))).unwrap();
        assert!(connector.accounts().is_empty());
        assert_eq!(connector.account().unwrap_err(), WalletError::NotConnected);

        let accounts = connector.request_accounts().to_vec();
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            accounts[0],
            DEV_ADDRESS.parse::<Address>().unwrap()
        );
        assert_eq!(connector.accounts(), accounts.as_slice());
        assert_eq!(connector.account().unwrap(), accounts[0]);
    }

    #[test]
    fn test_request_accounts_is_idempotent() {
        let mut connector = WalletConnector::detect(&config_with_key(Some(DEV_KEY))).unwrap();
        connector.request_accounts();
        connector.request_accounts();
        assert_eq!(connector.accounts().len(), 1);
    }
}
