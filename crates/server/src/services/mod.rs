//! Service layer: credential issuance/verification, the ownership gate, and
//! the user lifecycle orchestration.

pub mod credential;
pub mod ownership;
pub mod users;

pub use credential::{Claims, CredentialCodec, CredentialError};
pub use ownership::{Decision, authorize};
pub use users::{UserService, UserServiceError};
