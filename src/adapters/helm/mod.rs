pub mod helm_applier;
