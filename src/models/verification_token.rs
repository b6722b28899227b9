use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Six-digit email verification code. A user may have several outstanding
/// codes at once (resend does not invalidate earlier ones); a code is
/// deleted the moment it is redeemed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "verification_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub token: String,
    pub expires_at: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
