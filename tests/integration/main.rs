//! Integration tests for the standings crawler
//!
//! These tests use wiremock to stand in for the contest site and run the
//! catalog sweep and standings reconstruction end-to-end over HTTP.

mod catalog_tests;
mod common;
mod standings_tests;
