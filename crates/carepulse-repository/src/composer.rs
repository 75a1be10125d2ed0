//! Key composers: per-entity strategies that derive all key material from an
//! entity's current field values.
//!
//! A composer is pure and side-effect-free. Calling it twice on the same
//! logical state yields identical keys, which is what lets the repository
//! recompute keys on every write without drift between the keys and the data
//! they index. The id is the only field a composer never derives; it is
//! assigned once by the repository and read back verbatim.

use std::marker::PhantomData;

use carepulse_store::{IndexKeys, Item, ItemKey};
use carepulse_types::{
    kind, AnswerBatch, Entity, FieldAnswer, Registration, ScheduledJob, ValidatedSurveys,
};

use crate::keys;

/// Strategy object computing primary and secondary keys for one entity type.
///
/// The default methods cover the common case: primary partition
/// `<OWNER_KIND>#<owner_id>`, primary sort `<KIND>#<id>`, no secondary
/// indexes. Entities with extra access patterns override [`index_keys`].
///
/// [`index_keys`]: KeyComposer::index_keys
pub trait KeyComposer<E: Entity>: Send + Sync {
    /// Primary key for an entity id under an owner, without needing the
    /// entity itself. Point reads and deletes use this.
    fn primary_key_for_id(&self, owner_id: &str, id: &str) -> ItemKey {
        ItemKey::new(
            keys::owner_partition(E::OWNER_KIND, owner_id),
            keys::scoped(E::KIND, id),
        )
    }

    /// Primary key for an entity instance.
    fn primary_key(&self, owner_id: &str, entity: &E) -> ItemKey {
        self.primary_key_for_id(owner_id, entity.id())
    }

    /// Secondary index keys derived from current field values. Recomputed on
    /// every write.
    fn index_keys(&self, owner_id: &str, entity: &E) -> IndexKeys {
        let _ = (owner_id, entity);
        IndexKeys::default()
    }
}

/// Attach composed keys to a serialized payload, producing the storable item.
pub(crate) fn compose_item<E, C>(
    composer: &C,
    owner_id: &str,
    entity: &E,
    payload: Vec<u8>,
) -> Item
where
    E: Entity,
    C: KeyComposer<E> + ?Sized,
{
    Item::new(composer.primary_key(owner_id, entity), payload)
        .with_index_keys(composer.index_keys(owner_id, entity))
}

/// Composer for entities with no secondary access patterns.
pub struct BasicKeys<E>(PhantomData<E>);

impl<E> Default for BasicKeys<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E> Clone for BasicKeys<E> {
    fn clone(&self) -> Self {
        Self(PhantomData)
    }
}

impl<E: Entity> KeyComposer<E> for BasicKeys<E> {}

/// Composer for answer batches.
///
/// - `gsi1`: patient-scoped time index — partition `PATIENT#<patient_id>`,
///   sort `<submitted_at>`.
/// - `gsi2`: outcome-scope composite, present only when the batch carries a
///   strategy and category.
/// - `gsi3`: questionnaire discriminator — partition `VALIDATED#<survey>` or
///   `CUSTOM#<survey>` depending on catalogue membership, sort
///   `<submitted_at>`. Because the token lives in the key string, changing
///   catalogue membership moves a batch only once its item is rewritten.
#[derive(Clone)]
pub struct AnswerBatchKeys {
    validated: ValidatedSurveys,
}

impl AnswerBatchKeys {
    pub fn new(validated: ValidatedSurveys) -> Self {
        Self { validated }
    }

    /// The catalogue this composer consults for the discriminator.
    pub fn validated(&self) -> &ValidatedSurveys {
        &self.validated
    }
}

impl KeyComposer<AnswerBatch> for AnswerBatchKeys {
    fn index_keys(&self, owner_id: &str, batch: &AnswerBatch) -> IndexKeys {
        let submitted = keys::timestamp(batch.submitted_at);

        let gsi2 = match (&batch.strategy_id, batch.category) {
            (Some(strategy_id), Some(category)) => Some(ItemKey::new(
                keys::outcome_scope(&batch.project_id, strategy_id, category),
                keys::scoped(AnswerBatch::KIND, batch.id()),
            )),
            _ => None,
        };

        IndexKeys {
            gsi1: Some(ItemKey::new(
                keys::scoped(kind::PATIENT, &batch.patient_id),
                submitted.clone(),
            )),
            gsi2,
            gsi3: Some(ItemKey::new(
                keys::questionnaire_partition(owner_id, self.validated.contains(owner_id)),
                submitted,
            )),
        }
    }
}

/// Composer for field answers: patient-scoped time index plus the
/// outcome-scope composite when strategy and category are set.
#[derive(Clone, Default)]
pub struct FieldAnswerKeys;

impl KeyComposer<FieldAnswer> for FieldAnswerKeys {
    fn index_keys(&self, _owner_id: &str, entry: &FieldAnswer) -> IndexKeys {
        let gsi2 = match (&entry.strategy_id, entry.category) {
            (Some(strategy_id), Some(category)) => Some(ItemKey::new(
                keys::outcome_scope(&entry.project_id, strategy_id, category),
                keys::scoped(FieldAnswer::KIND, entry.id()),
            )),
            _ => None,
        };

        IndexKeys {
            gsi1: Some(ItemKey::new(
                keys::scoped(kind::PATIENT, &entry.patient_id),
                keys::timestamp(entry.answered_at),
            )),
            gsi2,
            gsi3: None,
        }
    }
}

/// Composer for registrations: strategy-scoped time index plus the
/// outcome-scope composite.
#[derive(Clone, Default)]
pub struct RegistrationKeys;

impl KeyComposer<Registration> for RegistrationKeys {
    fn index_keys(&self, owner_id: &str, registration: &Registration) -> IndexKeys {
        IndexKeys {
            gsi1: Some(ItemKey::new(
                keys::scoped(kind::STRATEGY, owner_id),
                keys::timestamp(registration.registered_at),
            )),
            gsi2: Some(ItemKey::new(
                keys::outcome_scope(&registration.project_id, owner_id, registration.category),
                keys::scoped(Registration::KIND, registration.id()),
            )),
            gsi3: None,
        }
    }
}

/// Composer for scheduled jobs: strategy-scoped and patient-scoped listings,
/// both sorted by due time.
#[derive(Clone, Default)]
pub struct ScheduledJobKeys;

impl KeyComposer<ScheduledJob> for ScheduledJobKeys {
    fn index_keys(&self, _owner_id: &str, job: &ScheduledJob) -> IndexKeys {
        let due = keys::timestamp(job.due_at);
        IndexKeys {
            gsi1: Some(ItemKey::new(keys::scoped(kind::STRATEGY, &job.strategy_id), due.clone())),
            gsi2: Some(ItemKey::new(keys::scoped(kind::PATIENT, &job.patient_id), due)),
            gsi3: None,
        }
    }
}
