pub mod applier;
pub mod output_store;
pub mod secret_store;
