//! Application context for the vault session: configuration, the connected
//! account, and a signing provider bound to the configured network.

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::Address;
use alloy::providers::fillers::{
    BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller,
};
use alloy::providers::{Identity, ProviderBuilder, RootProvider, WsConnect};
use eyre::{Result, WrapErr};
use log::info;
use url::Url;

use crate::atm::AtmClient;
use crate::config::Config;
use crate::utils::wallet::WalletConnector;

// There has to be a better way to do this
pub type TellerProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
    Ethereum,
>;

/// Shared state for every chain-touching command
pub struct AppContext {
    pub config: Config,
    pub provider: TellerProvider,
    /// The authorized wallet account
    pub account: Address,
    /// The deployed vault contract
    pub contract_address: Address,
}

impl AppContext {
    /// Detects the wallet, authorizes an account, and connects a provider.
    ///
    /// # Errors
    /// * If no wallet is configured or the key is invalid
    /// * If the contract address in configuration does not parse
    /// * If the provider connection fails
    pub async fn new(config: Config) -> Result<Self> {
        let mut connector = WalletConnector::detect(&config)?;
        connector.request_accounts();
        let account = connector.account()?;

        let contract_address = config
            .contract_address
            .parse::<Address>()
            .wrap_err("invalid TELLER_CONTRACT_ADDRESS")?;

        let provider = Self::create_provider(&config, connector.wallet()).await?;

        Ok(Self {
            config,
            provider,
            account,
            contract_address,
        })
    }

    /// Creates a signing provider from the configured endpoint, preferring
    /// WebSocket when one is configured.
    ///
    /// # Errors
    /// * If the endpoint URL is invalid
    /// * If the WebSocket connection fails
    async fn create_provider(config: &Config, wallet: EthereumWallet) -> Result<TellerProvider> {
        if let Some(ws_url) = &config.ws_url {
            info!("Using WebSocket provider at {ws_url}");
            let ws = WsConnect::new(ws_url);
            Ok(ProviderBuilder::new().wallet(wallet).on_ws(ws).await?)
        } else {
            info!("Using HTTP provider at {}", config.rpc_url);
            let url = Url::parse(&config.rpc_url).wrap_err("invalid RPC_URL")?;
            Ok(ProviderBuilder::new().wallet(wallet).on_http(url))
        }
    }

    /// Client for the configured vault contract
    #[must_use]
    pub fn atm(&self) -> AtmClient<TellerProvider> {
        AtmClient::new(self.contract_address, self.provider.clone())
    }
}
