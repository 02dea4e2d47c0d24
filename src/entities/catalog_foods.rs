use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "catalog_foods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    /// Lower-case `FoodCategory` name
    pub category: String,
    pub description: String,
    pub contributor_id: Option<i32>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::container_entries::Entity")]
    ContainerEntries,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ContributorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Contributor,
}

impl Related<super::container_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContainerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
