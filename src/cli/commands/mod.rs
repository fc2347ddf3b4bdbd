pub mod check;
pub mod deploy;
pub mod history;
pub mod outputs;
pub mod render;
