use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use account_contracts_api::{ContractError, ContractResult, SmartContract};

use super::casa::CasaContract;
use super::time_deposit::TimeDepositContract;

/// Contracts available to a host, keyed by product name
pub struct ContractFactory {
    contracts: BTreeMap<&'static str, Arc<dyn SmartContract>>,
}

impl ContractFactory {
    /// Factory with every contract of this crate registered
    pub fn new() -> Self {
        let mut factory = Self {
            contracts: BTreeMap::new(),
        };
        factory.register(Arc::new(CasaContract::new()));
        factory.register(Arc::new(TimeDepositContract::new()));
        factory
    }

    /// Registers `contract` under its name, replacing any contract of the same name
    pub fn register(&mut self, contract: Arc<dyn SmartContract>) {
        debug!("Registering contract {} version {}", contract.name(), contract.version());
        self.contracts.insert(contract.name(), contract);
    }

    pub fn get(&self, name: &str) -> ContractResult<Arc<dyn SmartContract>> {
        self.contracts
            .get(name)
            .cloned()
            .ok_or_else(|| ContractError::InvalidConfiguration(format!("No contract registered for product {name}")))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.contracts.keys().copied()
    }
}

impl Default for ContractFactory {
    fn default() -> Self {
        Self::new()
    }
}
