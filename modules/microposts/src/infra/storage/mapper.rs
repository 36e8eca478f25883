use crate::contract::model::Micropost;
use crate::infra::storage::entity::Model as MicropostEntity;

/// Convert a database entity to a contract model.
pub fn entity_to_contract(entity: MicropostEntity) -> Micropost {
    Micropost {
        id: entity.id,
        user_id: entity.user_id,
        content: entity.content,
        created_at: entity.created_at,
    }
}
