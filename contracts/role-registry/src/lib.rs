#![no_std]

#[cfg(feature = "contract")]
mod contract;

#[cfg(feature = "contract")]
mod storage;

#[cfg(feature = "interface")]
mod interface;

#[cfg(feature = "contract")]
pub use contract::RoleRegistry;

#[cfg(all(feature = "contract", not(feature = "interface")))]
pub use contract::RoleRegistryClient;

#[cfg(feature = "interface")]
pub use interface::RoleRegistryClient;

#[cfg(test)]
mod test;
