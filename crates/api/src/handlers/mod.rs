pub mod accounts;
pub mod invitations;
pub mod pitches;
pub mod reviews;
pub mod session;
