pub mod deploy;
pub mod networks;
