use derive_more::Display;
use std::sync::Arc;

/// Whether an id-keyed mutation found its record
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum MutationOutcome {
    Updated,
    NotFound,
}

impl MutationOutcome {
    pub fn is_updated(self) -> bool { self == MutationOutcome::Updated }
}

/// Emitted to subscribers after a mutation has been persisted
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum CatalogEvent {
    #[display("added [{id}]")]
    Added { id: String },
    #[display("updated [{id}]")]
    Updated { id: String },
    #[display("checkout of [{id}] toggled to [{checked_out}]")]
    CheckoutToggled { id: String, checked_out: bool },
    #[display("deactivated [{id}]")]
    Deactivated { id: String },
    #[display("condition of [{id}] updated")]
    ConditionUpdated { id: String },
}

impl CatalogEvent {
    pub fn id(&self) -> &str {
        match self {
            CatalogEvent::Added { id }
            | CatalogEvent::Updated { id }
            | CatalogEvent::CheckoutToggled { id, .. }
            | CatalogEvent::Deactivated { id }
            | CatalogEvent::ConditionUpdated { id } => id,
        }
    }
}

pub type ChangeHook = Arc<dyn Fn(&CatalogEvent) + Send + Sync>;
