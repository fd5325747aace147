pub mod exit_codes;
pub mod extract;
pub mod reconcile;
