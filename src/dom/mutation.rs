use super::NodeId;

/// Who performed a document write.
///
/// Writes made while the engine runs a recomputation pass are tagged with that
/// pass number; everything else is attributed to the host (other users, the
/// board re-rendering itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provenance {
    #[default]
    Host,
    Engine(u64),
}

impl Provenance {
    pub fn is_engine(&self) -> bool {
        matches!(self, Self::Engine(_))
    }
}

/// The kind of change a [`MutationRecord`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added to or removed from the target.
    ChildList,
    /// An attribute (or the class list) of the target changed.
    Attributes,
    /// The text of a text node changed in place.
    CharacterData,
}

/// One atomic change to the document, delivered to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
    /// Name of the changed attribute for [`MutationKind::Attributes`].
    pub attribute: Option<String>,
    pub provenance: Provenance,
}

impl MutationRecord {
    pub fn child_list(
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
        provenance: Provenance,
    ) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added,
            removed,
            attribute: None,
            provenance,
        }
    }

    pub fn attribute(target: NodeId, name: &str, provenance: Provenance) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            added: Vec::new(),
            removed: Vec::new(),
            attribute: Some(name.to_string()),
            provenance,
        }
    }

    pub fn character_data(target: NodeId, provenance: Provenance) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            added: Vec::new(),
            removed: Vec::new(),
            attribute: None,
            provenance,
        }
    }
}

/// Which changes an observation registration reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    /// Also report changes to descendants of the target.
    pub subtree: bool,
}

impl ObserveOptions {
    pub fn child_list() -> Self {
        Self {
            child_list: true,
            ..Self::default()
        }
    }

    pub fn attributes() -> Self {
        Self {
            attributes: true,
            ..Self::default()
        }
    }

    pub fn with_subtree(mut self) -> Self {
        self.subtree = true;
        self
    }

    pub fn accepts(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::Attributes => self.attributes,
            MutationKind::CharacterData => self.character_data,
        }
    }
}
