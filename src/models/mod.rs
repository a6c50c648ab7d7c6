mod configs;
mod network;

pub use configs::*;
pub use network::*;
