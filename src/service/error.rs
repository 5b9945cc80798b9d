use thiserror::Error;

use crate::dom::NodeId;

/// Errors for edits applied through [`super::BoardService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Card not found: {0}")]
    CardNotFound(NodeId),

    #[error("List not found: {0}")]
    ListNotFound(NodeId),

    #[error("Board has no list container")]
    NoListContainer,

    #[error("The point picker is disabled")]
    PickerDisabled,

    #[error("The picker does not offer {0} values")]
    NoPicker(&'static str),

    #[error("Value {0} is not on the picker scale")]
    InvalidValue(f64),
}
