pub mod deploy_service;
pub mod descriptor_loader;
pub mod secret_resolver;
pub mod values_composer;
