use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guide")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub name: String,
    pub photo: Option<String>,
    pub experience_years: Option<i32>,
    pub description: Option<String>,
    pub languages: Json,
    pub is_approved: bool,
    pub profile_complete: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::guide_unavailable_date::Entity")]
    UnavailableDates,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::guide_unavailable_date::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnavailableDates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
