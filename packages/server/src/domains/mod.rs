// Business domains
pub mod auth;
pub mod businesses;
pub mod competitor_rates;
