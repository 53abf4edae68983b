use domain::{CreatedAt, Email, Entity, EntityBase, Id, PasswordHash};

/// Registered user. Only the email and password hash change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    base: EntityBase,
    email: Email,
    password_hash: PasswordHash,
}

impl User {
    pub fn new(email: Email, password_hash: PasswordHash) -> Self {
        Self { base: EntityBase::new(), email, password_hash }
    }

    /// Rebuild a stored user.
    pub fn restore(id: Id, created_at: CreatedAt, email: Email, password_hash: PasswordHash) -> Self {
        Self { base: EntityBase::with(id, created_at), email, password_hash }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
    }

    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }
}

impl Entity for User {
    fn base(&self) -> &EntityBase {
        &self.base
    }
}
