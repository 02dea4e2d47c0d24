use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // One entry per (container, food); merges go through the upsert path.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_container_entries_container_food \
             ON container_entries(container_id, catalog_food_id)",
        )
        .await?;

        // At most one shopping list per owner.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_containers_owner_shopping \
             ON containers(owner_id) WHERE kind = 'shopping'",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_containers_owner ON containers(owner_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_container_entries_expiration \
             ON container_entries(expiration_date)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_container_entries_expiration")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_containers_owner")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_containers_owner_shopping")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_container_entries_container_food")
            .await?;

        Ok(())
    }
}
