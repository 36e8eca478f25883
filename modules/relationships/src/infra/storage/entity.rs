use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "relationships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Data for creating a new follow edge.
pub struct NewEdgeEntity {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Check whether the (follower, followed) edge exists.
pub async fn edge_exists(
    db: &DatabaseConnection,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::FollowerId.eq(follower_id))
        .filter(Column::FollowedId.eq(followed_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Insert a follow edge.
pub async fn create(db: &DatabaseConnection, new_edge: NewEdgeEntity) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(new_edge.id),
        follower_id: Set(new_edge.follower_id),
        followed_id: Set(new_edge.followed_id),
        created_at: Set(new_edge.created_at),
    };

    active_model.insert(db).await
}

/// Delete the (follower, followed) edge, returns true if one was removed.
pub async fn delete_edge(
    db: &DatabaseConnection,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::FollowerId.eq(follower_id))
        .filter(Column::FollowedId.eq(followed_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// All ids `follower_id` follows.
pub async fn followed_ids(db: &DatabaseConnection, follower_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
    let edges = Entity::find()
        .filter(Column::FollowerId.eq(follower_id))
        .all(db)
        .await?;
    Ok(edges.into_iter().map(|e| e.followed_id).collect())
}

/// A page of ids `follower_id` follows, oldest follow first.
pub async fn followed_ids_paginated(
    db: &DatabaseConnection,
    follower_id: Uuid,
    limit: u32,
    offset: u32,
) -> Result<Vec<Uuid>, DbErr> {
    let edges = Entity::find()
        .filter(Column::FollowerId.eq(follower_id))
        .order_by_asc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(db)
        .await?;
    Ok(edges.into_iter().map(|e| e.followed_id).collect())
}

/// A page of ids following `followed_id`, oldest follow first.
pub async fn follower_ids_paginated(
    db: &DatabaseConnection,
    followed_id: Uuid,
    limit: u32,
    offset: u32,
) -> Result<Vec<Uuid>, DbErr> {
    let edges = Entity::find()
        .filter(Column::FollowedId.eq(followed_id))
        .order_by_asc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(db)
        .await?;
    Ok(edges.into_iter().map(|e| e.follower_id).collect())
}
