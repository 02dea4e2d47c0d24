use sea_orm::DbErr;
use serde::Serialize;

use super::EntryView;
use crate::domain::{ContainerId, ContainerKind, OwnerId};
use crate::entities::containers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub id: ContainerId,
    pub owner: OwnerId,
    pub name: String,
    pub kind: ContainerKind,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<containers::Model> for Container {
    type Error = DbErr;

    fn try_from(m: containers::Model) -> Result<Self, Self::Error> {
        let kind = m
            .kind
            .parse::<ContainerKind>()
            .map_err(|e| DbErr::Type(e.to_string()))?;

        Ok(Self {
            id: ContainerId::new(m.id),
            owner: OwnerId::new(m.owner_id),
            name: m.name,
            kind,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerSummary {
    #[serde(flatten)]
    pub container: Container,
    pub item_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerDetail {
    #[serde(flatten)]
    pub container: Container,
    pub item_count: u64,
    pub items: Vec<EntryView>,
}
