mod audit_tests;
mod utils;
