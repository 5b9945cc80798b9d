use super::{Document, NodeId};

/// Find the first `span` labeled with `class` under `parent`, or create one and
/// insert it before `before`.
pub fn find_or_insert_span(
    doc: &mut Document,
    parent: NodeId,
    class: &str,
    before: Option<NodeId>,
) -> NodeId {
    if let Some(existing) = doc.query(parent, class) {
        return existing;
    }
    let span = doc.create_element(&[class]);
    doc.insert_before(parent, span, before);
    span
}

/// Detach the first node labeled with `class` under `parent`, if any.
pub fn remove_if_exists(doc: &mut Document, parent: NodeId, class: &str) -> bool {
    match doc.query(parent, class) {
        Some(element) => {
            doc.remove(element);
            true
        }
        None => false,
    }
}
