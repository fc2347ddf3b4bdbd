pub mod helm;
pub mod outputs;
pub mod secret_stores;
