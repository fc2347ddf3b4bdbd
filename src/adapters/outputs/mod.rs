pub mod json_output_store;
