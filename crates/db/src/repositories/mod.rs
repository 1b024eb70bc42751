//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Chapter-scoped list methods
//! take an optional chapter; `None` means unfiltered.

pub mod account_repo;
pub mod invitation_repo;
pub mod pitch_repo;
pub mod review_repo;

pub use account_repo::AccountRepo;
pub use invitation_repo::InvitationRepo;
pub use pitch_repo::PitchRepo;
pub use review_repo::ReviewRepo;
