//! Entity kinds, mutation actions, and the decoded sync payload

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::records::{
    BlotterReport, Evidence, Hearing, PersonHistory, Resolution, Respondent, Suspect, User,
    Witness,
};
use crate::error::Error;

/// Kinds of records that travel through the sync queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    User,
    Report,
    Respondent,
    Suspect,
    Witness,
    Evidence,
    Hearing,
    Resolution,
    PersonHistory,
}

impl EntityType {
    /// Every entity type, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::User,
        Self::Report,
        Self::Respondent,
        Self::Suspect,
        Self::Witness,
        Self::Evidence,
        Self::Hearing,
        Self::Resolution,
        Self::PersonHistory,
    ];

    /// Name stored in the `entity_type` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Report => "REPORT",
            Self::Respondent => "RESPONDENT",
            Self::Suspect => "SUSPECT",
            Self::Witness => "WITNESS",
            Self::Evidence => "EVIDENCE",
            Self::Hearing => "HEARING",
            Self::Resolution => "RESOLUTION",
            Self::PersonHistory => "PERSON_HISTORY",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown entity type: {s}")))
    }
}

/// Local mutation that produced a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncAction {
    #[default]
    Create,
    Update,
    Delete,
}

impl SyncAction {
    /// Name stored in the `action` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::InvalidInput(format!("Unknown sync action: {s}"))),
        }
    }
}

/// A record that can be snapshotted into the sync queue.
pub trait SyncEntity: Serialize + DeserializeOwned {
    /// Queue tag for this record type.
    const ENTITY_TYPE: EntityType;

    /// Identifier stored alongside the snapshot.
    fn entity_id(&self) -> String;
}

macro_rules! sync_entity {
    ($record:ty, $kind:ident) => {
        impl SyncEntity for $record {
            const ENTITY_TYPE: EntityType = EntityType::$kind;

            fn entity_id(&self) -> String {
                self.id.to_string()
            }
        }
    };
}

sync_entity!(User, User);
sync_entity!(BlotterReport, Report);
sync_entity!(Respondent, Respondent);
sync_entity!(Suspect, Suspect);
sync_entity!(Witness, Witness);
sync_entity!(Evidence, Evidence);
sync_entity!(Hearing, Hearing);
sync_entity!(Resolution, Resolution);
sync_entity!(PersonHistory, PersonHistory);

/// A queue snapshot decoded into its concrete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPayload {
    User(User),
    Report(BlotterReport),
    Respondent(Respondent),
    Suspect(Suspect),
    Witness(Witness),
    Evidence(Evidence),
    Hearing(Hearing),
    Resolution(Resolution),
    PersonHistory(PersonHistory),
}

impl SyncPayload {
    /// Decode a stored JSON snapshot for the given entity type.
    pub fn decode(entity_type: EntityType, data: &str) -> serde_json::Result<Self> {
        Ok(match entity_type {
            EntityType::User => Self::User(serde_json::from_str(data)?),
            EntityType::Report => Self::Report(serde_json::from_str(data)?),
            EntityType::Respondent => Self::Respondent(serde_json::from_str(data)?),
            EntityType::Suspect => Self::Suspect(serde_json::from_str(data)?),
            EntityType::Witness => Self::Witness(serde_json::from_str(data)?),
            EntityType::Evidence => Self::Evidence(serde_json::from_str(data)?),
            EntityType::Hearing => Self::Hearing(serde_json::from_str(data)?),
            EntityType::Resolution => Self::Resolution(serde_json::from_str(data)?),
            EntityType::PersonHistory => Self::PersonHistory(serde_json::from_str(data)?),
        })
    }

    /// Identifier of the wrapped record.
    pub fn entity_id(&self) -> String {
        match self {
            Self::User(record) => record.entity_id(),
            Self::Report(record) => record.entity_id(),
            Self::Respondent(record) => record.entity_id(),
            Self::Suspect(record) => record.entity_id(),
            Self::Witness(record) => record.entity_id(),
            Self::Evidence(record) => record.entity_id(),
            Self::Hearing(record) => record.entity_id(),
            Self::Resolution(record) => record.entity_id(),
            Self::PersonHistory(record) => record.entity_id(),
        }
    }

    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::User(_) => EntityType::User,
            Self::Report(_) => EntityType::Report,
            Self::Respondent(_) => EntityType::Respondent,
            Self::Suspect(_) => EntityType::Suspect,
            Self::Witness(_) => EntityType::Witness,
            Self::Evidence(_) => EntityType::Evidence,
            Self::Hearing(_) => EntityType::Hearing,
            Self::Resolution(_) => EntityType::Resolution,
            Self::PersonHistory(_) => EntityType::PersonHistory,
        }
    }
}
