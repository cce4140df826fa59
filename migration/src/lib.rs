pub use sea_orm_migration::prelude::*;

mod m20260806_000001_create_users;
mod m20260806_000002_create_guides;
mod m20260806_000003_create_tours;
mod m20260806_000004_create_bookings;
mod m20260806_000005_create_guide_unavailable_dates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260806_000001_create_users::Migration),
            Box::new(m20260806_000002_create_guides::Migration),
            Box::new(m20260806_000003_create_tours::Migration),
            Box::new(m20260806_000004_create_bookings::Migration),
            Box::new(m20260806_000005_create_guide_unavailable_dates::Migration),
        ]
    }
}
