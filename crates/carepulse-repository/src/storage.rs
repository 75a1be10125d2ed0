//! Unified storage facade.
//!
//! Bundles one repository per entity type, the lease lock, and the batch
//! coordinator behind a single constructor, for services that want the whole
//! persistence surface without wiring each repository themselves.

use carepulse_store::KeyValueStore;
use carepulse_types::ValidatedSurveys;

use crate::accounts::{AccountRepository, ProjectRepository, RoleRepository};
use crate::answers::{AnswerBatchRepository, FieldAnswerRepository};
use crate::batch::BatchCoordinator;
use crate::child::ChildRepository;
use crate::jobs::ScheduledJobRepository;
use crate::lock::LeaseLock;
use crate::patient::PatientRepository;
use crate::registration::RegistrationRepository;
use crate::reports::{ReportRepository, SendoutFrequencyRepository};
use crate::strategy::{EffectRepository, StrategyRepository};
use crate::survey::{FieldChoiceRepository, SurveyFieldRepository, SurveyRepository};
use crate::tags::TagRepository;
use crate::top_level::TopLevelRepository;

/// One repository per entity type, sharing a cloned store backend.
pub struct DomainStorage<S: KeyValueStore> {
    projects: ProjectRepository<S>,
    accounts: AccountRepository<S>,
    roles: RoleRepository<S>,
    patients: PatientRepository<S>,
    surveys: SurveyRepository<S>,
    survey_fields: SurveyFieldRepository<S>,
    field_choices: FieldChoiceRepository<S>,
    strategies: StrategyRepository<S>,
    effects: EffectRepository<S>,
    registrations: RegistrationRepository<S>,
    answer_batches: AnswerBatchRepository<S>,
    field_answers: FieldAnswerRepository<S>,
    jobs: ScheduledJobRepository<S>,
    tags: TagRepository<S>,
    reports: ReportRepository<S>,
    sendout_frequencies: SendoutFrequencyRepository<S>,
    lock: LeaseLock<S>,
    coordinator: BatchCoordinator<S>,
}

#[bon::bon]
impl<S: KeyValueStore + Clone> DomainStorage<S> {
    /// Create the facade over a store backend.
    ///
    /// The backend is cloned per repository so they share the underlying
    /// storage. The validated-questionnaire catalogue feeds the answer-batch
    /// key composer.
    #[builder]
    pub fn new(store: S, #[builder(default)] validated_surveys: ValidatedSurveys) -> Self {
        Self {
            projects: TopLevelRepository::from_store(store.clone()),
            accounts: TopLevelRepository::from_store(store.clone()),
            roles: TopLevelRepository::from_store(store.clone()),
            patients: PatientRepository::new(store.clone()),
            surveys: ChildRepository::from_store(store.clone()),
            survey_fields: ChildRepository::from_store(store.clone()),
            field_choices: ChildRepository::from_store(store.clone()),
            strategies: ChildRepository::from_store(store.clone()),
            effects: ChildRepository::from_store(store.clone()),
            registrations: RegistrationRepository::new(store.clone()),
            answer_batches: AnswerBatchRepository::new(store.clone(), validated_surveys),
            field_answers: FieldAnswerRepository::new(store.clone()),
            jobs: ScheduledJobRepository::new(store.clone()),
            tags: TagRepository::new(store.clone()),
            reports: ChildRepository::from_store(store.clone()),
            sendout_frequencies: SendoutFrequencyRepository::new(store.clone()),
            lock: LeaseLock::new(store.clone()),
            coordinator: BatchCoordinator::new(store),
        }
    }
}

impl<S: KeyValueStore> DomainStorage<S> {
    pub fn projects(&self) -> &ProjectRepository<S> {
        &self.projects
    }

    pub fn accounts(&self) -> &AccountRepository<S> {
        &self.accounts
    }

    pub fn roles(&self) -> &RoleRepository<S> {
        &self.roles
    }

    pub fn patients(&self) -> &PatientRepository<S> {
        &self.patients
    }

    pub fn surveys(&self) -> &SurveyRepository<S> {
        &self.surveys
    }

    pub fn survey_fields(&self) -> &SurveyFieldRepository<S> {
        &self.survey_fields
    }

    pub fn field_choices(&self) -> &FieldChoiceRepository<S> {
        &self.field_choices
    }

    pub fn strategies(&self) -> &StrategyRepository<S> {
        &self.strategies
    }

    pub fn effects(&self) -> &EffectRepository<S> {
        &self.effects
    }

    pub fn registrations(&self) -> &RegistrationRepository<S> {
        &self.registrations
    }

    pub fn answer_batches(&self) -> &AnswerBatchRepository<S> {
        &self.answer_batches
    }

    pub fn field_answers(&self) -> &FieldAnswerRepository<S> {
        &self.field_answers
    }

    pub fn jobs(&self) -> &ScheduledJobRepository<S> {
        &self.jobs
    }

    pub fn tags(&self) -> &TagRepository<S> {
        &self.tags
    }

    pub fn reports(&self) -> &ReportRepository<S> {
        &self.reports
    }

    pub fn sendout_frequencies(&self) -> &SendoutFrequencyRepository<S> {
        &self.sendout_frequencies
    }

    pub fn lock(&self) -> &LeaseLock<S> {
        &self.lock
    }

    pub fn coordinator(&self) -> &BatchCoordinator<S> {
        &self.coordinator
    }
}
