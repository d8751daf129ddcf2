pub mod abbreviation;
pub mod account;
pub mod validation;

pub use crate::types::identifiers::{AbbreviationId, UserId};
pub use abbreviation::{Abbreviation, Comment, UserSummary, Vote, VoteValue};
pub use account::{NewAccount, Role, UserAccount};
pub use validation::{
    AbbreviationPatch, FieldError, NewAbbreviation, UniquenessCheck, ValidationErrors,
};
