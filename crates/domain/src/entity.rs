use crate::{CreatedAt, Id};

/// Identity and creation time shared by every entity. Both are set once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBase {
    id: Id,
    created_at: CreatedAt,
}

impl EntityBase {
    /// Fresh id, created now.
    pub fn new() -> Self {
        Self { id: Id::generate(), created_at: CreatedAt::now() }
    }

    pub fn with(id: Id, created_at: CreatedAt) -> Self {
        Self { id, created_at }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn created_at(&self) -> CreatedAt {
        self.created_at
    }
}

impl Default for EntityBase {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Entity {
    fn base(&self) -> &EntityBase;

    fn id(&self) -> &Id {
        self.base().id()
    }

    fn created_at(&self) -> CreatedAt {
        self.base().created_at()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    struct Note {
        base: EntityBase,
    }

    impl Entity for Note {
        fn base(&self) -> &EntityBase {
            &self.base
        }
    }

    #[test]
    fn new_entities_get_distinct_ids() {
        let a = Note { base: EntityBase::new() };
        let b = Note { base: EntityBase::new() };
        assert_ne!(a.id(), b.id());
        assert!(a.created_at() <= CreatedAt::now());
    }

    #[test]
    fn supplied_fields_are_kept() {
        let id = Id::new("note-1").unwrap();
        let at = CreatedAt::new(Utc.with_ymd_and_hms(2023, 3, 4, 5, 6, 7).unwrap()).unwrap();
        let note = Note { base: EntityBase::with(id.clone(), at) };
        assert_eq!(note.id(), &id);
        assert_eq!(note.created_at(), at);
    }
}
