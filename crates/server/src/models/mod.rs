//! Domain and wire types for the user service.

pub mod user;

pub use user::{
    CreateUser, PublicUser, UserDocument, UserRecord, ValidCreateUser, ValidUserDocument,
    ValidationError,
};
