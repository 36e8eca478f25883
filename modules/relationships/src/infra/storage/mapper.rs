use crate::contract::model::Relationship;
use crate::infra::storage::entity::Model as EdgeEntity;

/// Convert a database entity to a contract model.
pub fn entity_to_contract(entity: EdgeEntity) -> Relationship {
    Relationship {
        id: entity.id,
        follower_id: entity.follower_id,
        followed_id: entity.followed_id,
        created_at: entity.created_at,
    }
}
