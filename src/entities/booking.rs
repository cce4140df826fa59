use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "booking_status")]
pub enum BookingStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "awaiting_substitute")]
    #[serde(rename = "Awaiting Substitute")]
    AwaitingSubstitute,
}

impl BookingStatus {
    /// Parse the wire spelling of a status. Anything outside the four
    /// enumerated values is rejected by the caller as invalid input.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Upcoming" => Some(Self::Upcoming),
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            "Awaiting Substitute" => Some(Self::AwaitingSubstitute),
            _ => None,
        }
    }

    /// A booking in an active state holds its date range in the current
    /// guide's unavailable set.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Upcoming | Self::AwaitingSubstitute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "advance_paid")]
    #[serde(rename = "Advance Paid")]
    AdvancePaid,
    #[sea_orm(string_value = "fully_paid")]
    #[serde(rename = "Fully Paid")]
    FullyPaid,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tour_id: Uuid,
    pub guide_id: Uuid,
    pub original_guide_id: Option<Uuid>,
    pub user_id: Uuid,
    pub start_date: Date,
    pub end_date: Date,
    pub number_of_tourists: i32,
    pub total_price: f64,
    pub advance_amount: f64,
    pub payment_id: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub cancelled_by_id: Option<Uuid>,
    pub cancelled_by_role: Option<super::user::UserRole>,
    pub cancelled_by_name: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tour::Entity",
        from = "Column::TourId",
        to = "super::tour::Column::Id"
    )]
    Tour,
    #[sea_orm(
        belongs_to = "super::guide::Entity",
        from = "Column::GuideId",
        to = "super::guide::Column::Id"
    )]
    Guide,
    #[sea_orm(
        belongs_to = "super::guide::Entity",
        from = "Column::OriginalGuideId",
        to = "super::guide::Column::Id"
    )]
    OriginalGuide,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::tour::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tour.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_four_statuses() {
        assert_eq!(BookingStatus::parse("Upcoming"), Some(BookingStatus::Upcoming));
        assert_eq!(BookingStatus::parse("Completed"), Some(BookingStatus::Completed));
        assert_eq!(BookingStatus::parse("Cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(
            BookingStatus::parse("Awaiting Substitute"),
            Some(BookingStatus::AwaitingSubstitute)
        );
    }

    #[test]
    fn rejects_unknown_status_spellings() {
        assert_eq!(BookingStatus::parse("upcoming"), None);
        assert_eq!(BookingStatus::parse("Refunded"), None);
        assert_eq!(BookingStatus::parse(""), None);
        assert_eq!(BookingStatus::parse("AwaitingSubstitute"), None);
    }

    #[test]
    fn active_states_hold_reservations() {
        assert!(BookingStatus::Upcoming.is_active());
        assert!(BookingStatus::AwaitingSubstitute.is_active());
        assert!(!BookingStatus::Completed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
