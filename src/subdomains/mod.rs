pub mod filter;
pub mod provider;
pub mod resolver;

pub use filter::{filter_subdomains, FilterOptions};
pub use provider::{HttpSubdomainSource, ProviderEntry, ProviderResponse, SubdomainSource};
pub use resolver::{Resolution, SubdomainResolver};
