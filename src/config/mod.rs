use std::env;

/// Configuration struct for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub ws_url: Option<String>,
    pub contract_address: String,
    pub private_key: Option<String>,
}

impl Config {
    /// Default values for configuration
    fn defaults() -> Self {
        Self {
            // Local hardhat node and the address the Assessment contract
            // gets on a fresh deployment there
            rpc_url: "http://localhost:8545".to_string(),
            ws_url: None,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            private_key: None,
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Environment Variables:
    /// - `RPC_URL`: Ethereum HTTP RPC endpoint URL
    /// - `RPC_WS_URL`: WebSocket endpoint, preferred over HTTP when set
    /// - `TELLER_CONTRACT_ADDRESS`: deployed `Assessment` contract address
    /// - `TELLER_PRIVATE_KEY`: wallet key; without it no wallet is detected
    ///
    /// # Returns
    /// Returns `Config` with values from environment variables or defaults
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::defaults();

        Self {
            rpc_url: env::var("RPC_URL").unwrap_or(defaults.rpc_url),
            ws_url: env::var("RPC_WS_URL").ok(),
            contract_address: env::var("TELLER_CONTRACT_ADDRESS")
                .unwrap_or(defaults.contract_address),
            private_key: env::var("TELLER_PRIVATE_KEY").ok(),
        }
    }

    /// Create a test configuration
    #[cfg(test)]
    #[must_use]
    pub fn test_config() -> Self {
        Self::defaults()
    }
}
