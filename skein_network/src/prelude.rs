//! Collects commonly-used names for convenient import

pub use crate::{
    id::*,
    modes::{MemberFlag, MemberFlagSet},
    network::errors::{LookupError, LookupResult},
    network::*,
    utils::OrLog,
    validated::*,
};
