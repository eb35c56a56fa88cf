//! Create/delete tracking and outcome reporting.

use crate::domain::{ItemId, NewNote, ResourceKind};
use crate::gateway::{Gateway, GatewayError, HttpRequest, HttpResponse, RequestId, RequestIds};
use std::collections::HashMap;
use std::fmt;

/// Which mutation ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    Create,
    Delete(ItemId),
}

impl MutationOp {
    const fn verb(&self) -> &'static str {
        match self {
            Self::Create => "creating",
            Self::Delete(_) => "deleting",
        }
    }

    const fn past(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Delete(_) => "deleted",
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Delete(id) => write!(f, "delete {id}"),
        }
    }
}

/// Outcome of a finished (or refused) mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationEvent {
    /// The server accepted the mutation. The caller invalidates `resource`.
    Succeeded {
        resource: ResourceKind,
        op: MutationOp,
        message: String,
    },
    /// The mutation failed. The cache must be left alone.
    Failed {
        resource: ResourceKind,
        op: MutationOp,
        error: GatewayError,
    },
}

impl MutationEvent {
    /// One-line text for the notice area.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Succeeded { message, .. } => message.clone(),
            Self::Failed { resource, op, error } => {
                format!("Error {} {}: {}", op.verb(), singular(*resource), error.describe())
            }
        }
    }

    #[must_use]
    pub const fn resource(&self) -> ResourceKind {
        match self {
            Self::Succeeded { resource, .. } | Self::Failed { resource, .. } => *resource,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

const fn singular(resource: ResourceKind) -> &'static str {
    match resource {
        ResourceKind::Notes => "note",
        ResourceKind::Movies => "movie",
    }
}

#[derive(Debug, Clone)]
struct Outstanding {
    resource: ResourceKind,
    op: MutationOp,
}

/// Tracks outstanding mutations for UI disabling and turns their responses
/// into [`MutationEvent`]s.
///
/// At most one create is outstanding at a time. Deletes are tracked per item,
/// so different items may be deleted concurrently while a repeat delete of the
/// same item is ignored.
#[derive(Debug, Default)]
pub struct MutationCoordinator {
    creating: Option<RequestId>,
    deleting: HashMap<ItemId, RequestId>,
    outstanding: HashMap<RequestId, Outstanding>,
}

impl MutationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a create.
    ///
    /// Returns `Ok(None)` while another create is outstanding.
    ///
    /// # Errors
    ///
    /// Returns the failure event right away when the gateway refuses to build
    /// the request (a read-only collection). No request is issued then.
    pub fn begin_create(
        &mut self,
        resource: ResourceKind,
        note: &NewNote,
        gateway: &Gateway,
        ids: &mut RequestIds,
    ) -> Result<Option<HttpRequest>, MutationEvent> {
        if self.creating.is_some() {
            tracing::debug!(%resource, "create already in flight");
            return Ok(None);
        }

        let id = ids.next_id();
        let request = gateway
            .create_request(resource, id, note)
            .map_err(|error| MutationEvent::Failed {
                resource,
                op: MutationOp::Create,
                error,
            })?;

        tracing::debug!(%resource, token = %id, title = %note.title, "create issued");
        self.creating = Some(id);
        self.outstanding.insert(
            id,
            Outstanding {
                resource,
                op: MutationOp::Create,
            },
        );
        Ok(Some(request))
    }

    /// Starts a delete of `item`.
    ///
    /// Returns `Ok(None)` while a delete of the same item is outstanding.
    ///
    /// # Errors
    ///
    /// As for [`Self::begin_create`].
    pub fn begin_delete(
        &mut self,
        resource: ResourceKind,
        item: &ItemId,
        gateway: &Gateway,
        ids: &mut RequestIds,
    ) -> Result<Option<HttpRequest>, MutationEvent> {
        if self.deleting.contains_key(item) {
            tracing::debug!(%resource, %item, "delete already in flight");
            return Ok(None);
        }

        let id = ids.next_id();
        let op = MutationOp::Delete(item.clone());
        let request = match gateway.delete_request(resource, id, item) {
            Ok(request) => request,
            Err(error) => return Err(MutationEvent::Failed { resource, op, error }),
        };

        tracing::debug!(%resource, %item, token = %id, "delete issued");
        self.deleting.insert(item.clone(), id);
        self.outstanding.insert(id, Outstanding { resource, op });
        Ok(Some(request))
    }

    /// Whether `id` belongs to a mutation this coordinator issued.
    #[must_use]
    pub fn owns(&self, id: RequestId) -> bool {
        self.outstanding.contains_key(&id)
    }

    /// Decodes the response to an outstanding mutation.
    ///
    /// Returns `None` for ids this coordinator does not know.
    pub fn complete(&mut self, gateway: &Gateway, response: &HttpResponse) -> Option<MutationEvent> {
        let Outstanding { resource, op } = self.outstanding.remove(&response.id)?;

        let result = match &op {
            MutationOp::Create => {
                self.creating = None;
                gateway
                    .decode_created(resource, response)
                    .map(|item| format!("{} \"{}\" created", capitalized(resource), item.title()))
            }
            MutationOp::Delete(item) => {
                self.deleting.remove(item);
                gateway
                    .decode_deleted(resource, item, response)
                    .map(|_| format!("{} {}", capitalized(resource), op.past()))
            }
        };

        Some(match result {
            Ok(message) => {
                tracing::debug!(%resource, %op, "mutation succeeded");
                MutationEvent::Succeeded { resource, op, message }
            }
            Err(error) => {
                tracing::debug!(%resource, %op, %error, "mutation failed");
                MutationEvent::Failed { resource, op, error }
            }
        })
    }

    #[must_use]
    pub const fn is_creating(&self) -> bool {
        self.creating.is_some()
    }

    #[must_use]
    pub fn is_deleting(&self, item: &ItemId) -> bool {
        self.deleting.contains_key(item)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.outstanding.is_empty()
    }
}

const fn capitalized(resource: ResourceKind) -> &'static str {
    match resource {
        ResourceKind::Notes => "Note",
        ResourceKind::Movies => "Movie",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoteTag;
    use crate::gateway::{ErrorKind, Method};

    fn draft() -> NewNote {
        NewNote {
            title: "Groceries".into(),
            body: "milk".into(),
            tag: NoteTag::Shopping,
        }
    }

    fn respond(request: &HttpRequest, status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            id: request.id,
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn one_create_at_a_time() {
        let gateway = Gateway::default();
        let mut ids = RequestIds::default();
        let mut coordinator = MutationCoordinator::new();

        let request = coordinator
            .begin_create(ResourceKind::Notes, &draft(), &gateway, &mut ids)
            .unwrap()
            .expect("first create is issued");
        assert_eq!(request.method, Method::Post);
        assert!(coordinator.is_creating());

        let again = coordinator.begin_create(ResourceKind::Notes, &draft(), &gateway, &mut ids);
        assert_eq!(again, Ok(None));

        let event = coordinator
            .complete(
                &gateway,
                &respond(&request, 201, r#"{"id":"n1","title":"Groceries","content":"milk","tag":"Shopping"}"#),
            )
            .unwrap();
        assert!(event.is_success());
        assert_eq!(event.message(), "Note \"Groceries\" created");
        assert!(!coordinator.is_busy());
    }

    #[test]
    fn deletes_are_tracked_per_item() {
        let gateway = Gateway::default();
        let mut ids = RequestIds::default();
        let mut coordinator = MutationCoordinator::new();
        let first = ItemId::new("a");
        let second = ItemId::new("b");

        let a = coordinator
            .begin_delete(ResourceKind::Notes, &first, &gateway, &mut ids)
            .unwrap()
            .unwrap();
        assert!(coordinator
            .begin_delete(ResourceKind::Notes, &second, &gateway, &mut ids)
            .unwrap()
            .is_some());
        assert_eq!(
            coordinator.begin_delete(ResourceKind::Notes, &first, &gateway, &mut ids),
            Ok(None)
        );

        coordinator.complete(&gateway, &respond(&a, 200, r#"{"id":"a","title":"x"}"#));
        assert!(!coordinator.is_deleting(&first));
        assert!(coordinator.is_deleting(&second));
    }

    #[test]
    fn missing_item_reports_not_found() {
        let gateway = Gateway::default();
        let mut ids = RequestIds::default();
        let mut coordinator = MutationCoordinator::new();
        let ghost = ItemId::new("ghost");

        let request = coordinator
            .begin_delete(ResourceKind::Notes, &ghost, &gateway, &mut ids)
            .unwrap()
            .unwrap();
        let event = coordinator
            .complete(&gateway, &respond(&request, 404, r#"{"message":"Note not found"}"#))
            .unwrap();

        match &event {
            MutationEvent::Failed { error, op, .. } => {
                assert_eq!(error.kind, ErrorKind::NotFound);
                assert_eq!(op, &MutationOp::Delete(ghost));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(event.message().starts_with("Error deleting note"));
    }

    #[test]
    fn read_only_collection_fails_without_request() {
        let gateway = Gateway::default();
        let mut ids = RequestIds::default();
        let mut coordinator = MutationCoordinator::new();

        let refused = coordinator.begin_create(ResourceKind::Movies, &draft(), &gateway, &mut ids);
        match refused {
            Err(MutationEvent::Failed { error, .. }) => assert_eq!(error.kind, ErrorKind::Validation),
            other => panic!("expected refusal, got {other:?}"),
        }
        assert!(!coordinator.is_busy());
    }

    #[test]
    fn unknown_responses_are_ignored() {
        let gateway = Gateway::default();
        let mut coordinator = MutationCoordinator::new();
        let stray = HttpResponse {
            id: RequestId::new(99),
            status: 200,
            body: Vec::new(),
        };
        assert_eq!(coordinator.complete(&gateway, &stray), None);
    }
}
