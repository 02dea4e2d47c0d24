use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "container_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub container_id: i32,
    pub catalog_food_id: i32,
    pub quantity: i32,
    pub added_at: String,
    pub expiration_date: Option<Date>,
    pub checked_off: bool,
    pub is_frozen: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::containers::Entity",
        from = "Column::ContainerId",
        to = "super::containers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Container,
    #[sea_orm(
        belongs_to = "super::catalog_foods::Entity",
        from = "Column::CatalogFoodId",
        to = "super::catalog_foods::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    CatalogFood,
}

impl Related<super::containers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Container.def()
    }
}

impl Related<super::catalog_foods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogFood.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
