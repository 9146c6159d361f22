//! Test doubles shared by the sync module tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::{Notify, Semaphore};

use super::ConnectivityProbe;
use crate::models::{
    BlotterReport, EntityType, Evidence, Hearing, NewQueueItem, PersonHistory, Resolution,
    Respondent, Suspect, SyncAction, SyncEntity, User, Witness,
};
use crate::remote::{DeliveryError, DeliveryResult, RemoteApi};

/// Lets a test park a delivery mid-flight.
pub struct Gate {
    pub entered: Notify,
    pub release: Semaphore,
}

/// Records every create call and answers from a per-entity failure table.
#[derive(Default)]
pub struct FakeRemote {
    calls: Mutex<Vec<(EntityType, String)>>,
    created: Mutex<Vec<(EntityType, String)>>,
    failures: Mutex<HashMap<EntityType, DeliveryError>>,
    lose_responses: AtomicBool,
    gate: Option<Gate>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Gate {
                entered: Notify::new(),
                release: Semaphore::new(0),
            }),
            ..Self::default()
        }
    }

    pub fn gate(&self) -> &Gate {
        self.gate.as_ref().expect("remote was not built with a gate")
    }

    pub fn fail(&self, kind: EntityType, error: DeliveryError) {
        self.failures.lock().unwrap().insert(kind, error);
    }

    pub fn recover(&self, kind: EntityType) {
        self.failures.lock().unwrap().remove(&kind);
    }

    /// The server stores the record but the client never sees the answer.
    pub fn lose_responses(&self, lose: bool) {
        self.lose_responses.store(lose, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(EntityType, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(EntityType, String)> {
        self.created.lock().unwrap().clone()
    }

    async fn handle(&self, kind: EntityType, id: String) -> DeliveryResult {
        self.calls.lock().unwrap().push((kind, id.clone()));

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.acquire().await.unwrap().forget();
        }

        let failure = self.failures.lock().unwrap().get(&kind).cloned();
        if let Some(error) = failure {
            return Err(error);
        }

        self.created.lock().unwrap().push((kind, id));
        if self.lose_responses.load(Ordering::SeqCst) {
            return Err(DeliveryError::Transport(
                "connection reset before response".to_string(),
            ));
        }
        Ok(())
    }
}

impl RemoteApi for FakeRemote {
    async fn register_user(&self, user: &User) -> DeliveryResult {
        self.handle(EntityType::User, user.entity_id()).await
    }

    async fn create_report(&self, report: &BlotterReport) -> DeliveryResult {
        self.handle(EntityType::Report, report.entity_id()).await
    }

    async fn create_respondent(&self, respondent: &Respondent) -> DeliveryResult {
        self.handle(EntityType::Respondent, respondent.entity_id())
            .await
    }

    async fn create_suspect(&self, suspect: &Suspect) -> DeliveryResult {
        self.handle(EntityType::Suspect, suspect.entity_id()).await
    }

    async fn create_witness(&self, witness: &Witness) -> DeliveryResult {
        self.handle(EntityType::Witness, witness.entity_id()).await
    }

    async fn create_evidence(&self, evidence: &Evidence) -> DeliveryResult {
        self.handle(EntityType::Evidence, evidence.entity_id()).await
    }

    async fn create_hearing(&self, hearing: &Hearing) -> DeliveryResult {
        self.handle(EntityType::Hearing, hearing.entity_id()).await
    }

    async fn create_resolution(&self, resolution: &Resolution) -> DeliveryResult {
        self.handle(EntityType::Resolution, resolution.entity_id())
            .await
    }

    async fn create_person_history(&self, history: &PersonHistory) -> DeliveryResult {
        self.handle(EntityType::PersonHistory, history.entity_id())
            .await
    }
}

/// Answers from a fixed script, then reports offline and signals `exhausted`.
pub struct ScriptedProbe {
    states: Mutex<VecDeque<bool>>,
    pub exhausted: Notify,
}

impl ScriptedProbe {
    pub fn new(states: &[bool]) -> Self {
        Self {
            states: Mutex::new(states.iter().copied().collect()),
            exhausted: Notify::new(),
        }
    }
}

impl ConnectivityProbe for ScriptedProbe {
    async fn is_online(&self) -> bool {
        let next = self.states.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            self.exhausted.notify_one();
            false
        })
    }
}

pub fn sample_user(id: i64) -> User {
    User {
        id,
        username: format!("desk{id}"),
        first_name: "Ana".to_string(),
        last_name: "Reyes".to_string(),
        email: Some("ana.reyes@example.com".to_string()),
        contact_number: None,
        role: "OFFICER".to_string(),
        is_active: true,
        created_at: 1_700_000_000_000,
    }
}

pub fn sample_report(id: i64) -> BlotterReport {
    BlotterReport {
        id,
        case_number: format!("BR-2024-{id:04}"),
        incident_type: "Noise complaint".to_string(),
        incident_date: "2024-05-14".to_string(),
        incident_time: Some("22:30".to_string()),
        incident_location: "Purok 5, Sitio Mabini".to_string(),
        narrative: "Loud karaoke past curfew".to_string(),
        complainant_name: "Jose Rizal Santos".to_string(),
        complainant_contact: None,
        complainant_address: None,
        status: "PENDING".to_string(),
        reported_by_id: Some(1),
        assigned_officer_id: None,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
    }
}

/// One queue item per entity type, ids 1..=9 in `EntityType::ALL` order.
pub fn one_item_per_entity_type() -> Vec<NewQueueItem> {
    let created_at = 1_700_000_000_000;
    let items = [
        NewQueueItem::from_entity(&sample_user(1), SyncAction::Create),
        NewQueueItem::from_entity(&sample_report(2), SyncAction::Create),
        NewQueueItem::from_entity(
            &Respondent {
                id: 3,
                report_id: 2,
                name: "Carlos Mendoza".to_string(),
                address: None,
                contact_number: None,
                age: Some(41),
                gender: Some("M".to_string()),
                accusation: Some("Disturbing the peace".to_string()),
                created_at,
            },
            SyncAction::Create,
        ),
        NewQueueItem::from_entity(
            &Suspect {
                id: 4,
                report_id: 2,
                first_name: "Unknown".to_string(),
                last_name: "Male".to_string(),
                alias: Some("Bunso".to_string()),
                age: None,
                address: None,
                description: Some("Wearing a red cap".to_string()),
                created_at,
            },
            SyncAction::Create,
        ),
        NewQueueItem::from_entity(
            &Witness {
                id: 5,
                report_id: 2,
                name: "Liza Cruz".to_string(),
                address: None,
                contact_number: None,
                statement: None,
                created_at,
            },
            SyncAction::Create,
        ),
        NewQueueItem::from_entity(
            &Evidence {
                id: 6,
                report_id: 2,
                evidence_type: "PHOTO".to_string(),
                description: "Speaker set on the street".to_string(),
                location_found: None,
                media_url: None,
                collected_by: None,
                created_at,
            },
            SyncAction::Create,
        ),
        NewQueueItem::from_entity(
            &Hearing {
                id: 7,
                report_id: 2,
                hearing_date: "2024-05-20".to_string(),
                hearing_time: "09:00".to_string(),
                location: "Barangay Hall".to_string(),
                purpose: Some("Mediation".to_string()),
                presiding_officer: None,
                status: "SCHEDULED".to_string(),
                created_at,
            },
            SyncAction::Create,
        ),
        NewQueueItem::from_entity(
            &Resolution {
                id: 8,
                report_id: 2,
                resolution_type: "AMICABLE_SETTLEMENT".to_string(),
                details: "Parties agreed to a 10pm cutoff".to_string(),
                resolved_date: "2024-05-20".to_string(),
                resolved_by: None,
                created_at,
            },
            SyncAction::Update,
        ),
        NewQueueItem::from_entity(
            &PersonHistory {
                id: 9,
                person_id: 3,
                report_id: Some(2),
                activity_type: "RESPONDENT".to_string(),
                description: "Named in BR-2024-0002".to_string(),
                timestamp: created_at,
            },
            SyncAction::Create,
        ),
    ];
    items.into_iter().map(|item| item.unwrap()).collect()
}
