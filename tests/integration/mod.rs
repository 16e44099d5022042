//! Integration tests for pydepin

mod helpers;
mod test_cli;
mod test_config;
mod test_scenarios;
