use crate::core::Record;

/// Form state of one kind.
///
/// `Hidden` -> `begin_create` -> `Visible { editing: None }`,
/// `Hidden` -> `begin_edit(r)` -> `Visible { editing: Some(r) }`,
/// and any submit or cancel returns to `Hidden`.
#[derive(Debug, Clone, PartialEq)]
pub enum EditingSession<D> {
    Hidden,
    Visible { editing: Option<Record<D>> },
}

impl<D> Default for EditingSession<D> {
    fn default() -> Self {
        EditingSession::Hidden
    }
}

impl<D> EditingSession<D> {
    pub fn begin_create(&mut self) {
        *self = EditingSession::Visible { editing: None };
    }

    pub fn begin_edit(&mut self, record: Record<D>) {
        *self = EditingSession::Visible {
            editing: Some(record),
        };
    }

    pub fn close(&mut self) {
        *self = EditingSession::Hidden;
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, EditingSession::Visible { .. })
    }

    pub fn editing(&self) -> Option<&Record<D>> {
        match self {
            EditingSession::Visible { editing } => editing.as_ref(),
            EditingSession::Hidden => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserData;

    #[test]
    fn test_state_machine() {
        let mut session: EditingSession<UserData> = EditingSession::default();
        assert!(!session.is_visible());

        session.begin_create();
        assert!(session.is_visible());
        assert!(session.editing().is_none());

        session.begin_edit(Record::new("u1", UserData::default()));
        assert_eq!(session.editing().map(|r| r.id.as_str()), Some("u1"));

        session.close();
        assert_eq!(session, EditingSession::Hidden);
        assert!(session.editing().is_none());
    }
}
