pub mod types;

pub use types::GuardianError;
