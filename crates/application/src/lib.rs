//! DNS Intercept Application Layer
//!
//! Policy matching, answer synthesis and the dispatcher that either answers
//! a query locally or hands it to the next handler in the chain.
pub mod ports;
pub mod services;
pub mod use_cases;
