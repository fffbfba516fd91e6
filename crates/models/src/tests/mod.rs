
/// Input and patch validation for every resource
pub mod validation_tests;
