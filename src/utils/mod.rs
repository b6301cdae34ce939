pub mod domain;
pub mod formatting;
pub mod truncation;

pub use domain::{extract_host, get_root_domain, https_url, is_within};
