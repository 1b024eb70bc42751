//! Principal token handling.
//!
//! The external auth provider signs the tokens; this service only verifies
//! them and reads the principal out of the claims.

pub mod jwt;
