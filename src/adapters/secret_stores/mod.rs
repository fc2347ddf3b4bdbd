pub mod dotenv_secret_store;
pub mod env_secret_store;
pub mod layered_secret_store;
