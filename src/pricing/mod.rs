mod builtin;
mod catalog;
mod policy;

pub(crate) use catalog::Catalog;
pub(crate) use policy::{ProviderPolicy, policy_for};
