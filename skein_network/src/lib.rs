pub mod prelude;

pub mod id;
pub mod validated;
pub mod modes;

pub mod protocol;

pub mod network;

pub mod router;

pub mod utils;
