use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "microposts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Data for creating a new micropost row.
pub struct NewMicropostEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Find a micropost by ID.
pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Insert a micropost.
pub async fn create(db: &DatabaseConnection, new_post: NewMicropostEntity) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(new_post.id),
        user_id: Set(new_post.user_id),
        content: Set(new_post.content),
        created_at: Set(new_post.created_at),
    };

    active_model.insert(db).await
}

/// Delete a micropost by ID, returns true if one was deleted.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// One author's posts, newest first.
pub async fn find_by_author(
    db: &DatabaseConnection,
    user_id: Uuid,
    limit: u32,
    offset: u32,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(db)
        .await
}

/// Posts by any author in the set, newest first. This is the feed
/// select: one filtered query over the author ids.
pub async fn find_by_authors(
    db: &DatabaseConnection,
    author_ids: &[Uuid],
    limit: u32,
    offset: u32,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.is_in(author_ids.iter().copied()))
        .order_by_desc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(db)
        .await
}
