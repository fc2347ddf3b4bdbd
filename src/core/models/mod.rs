pub mod chart_values;
pub mod descriptor;
pub mod release;
pub mod resolved_secrets;
pub mod run_outputs;
