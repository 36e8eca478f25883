use crate::contract::model::User;
use crate::infra::storage::entity::Model as UserEntity;

/// Convert a database entity to a contract model. The password hash and
/// salt never leave the infra layer this way.
pub fn entity_to_contract(entity: UserEntity) -> User {
    User {
        id: entity.id,
        name: entity.name,
        email: entity.email,
        admin: entity.admin,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}
