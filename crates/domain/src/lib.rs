//! Self-validating value objects and the entity base.
//!
//! Every scalar here is immutable once built and can only be built through a
//! constructor that runs its rule set. Direct construction reports failures
//! under the type's own field name using the default message catalog; request
//! validators reuse the `check` functions under their own field names.

pub mod datetime;
pub mod email;
pub mod entity;
pub mod id;
pub mod password;

pub use datetime::{CreatedAt, TaggedDateTime, UtcDateTime};
pub use email::Email;
pub use entity::{Entity, EntityBase};
pub use id::Id;
pub use password::{Password, PasswordHash};

pub use common::validation::{ValidationError, ValidationFailure};
