use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create projects table
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(pk_auto(Projects::Id))
                    .col(string(Projects::Name))
                    .col(string(Projects::Company).default("Own"))
                    .to_owned(),
            )
            .await?;

        // Create schedule_stages table
        manager
            .create_table(
                Table::create()
                    .table(ScheduleStages::Table)
                    .if_not_exists()
                    .col(pk_auto(ScheduleStages::Id))
                    .col(integer(ScheduleStages::ProjectId))
                    .col(string_len(ScheduleStages::Category, 30))
                    .col(date(ScheduleStages::StartDate))
                    .col(date(ScheduleStages::EndDate))
                    .col(decimal(ScheduleStages::EstimatedValue).decimal_len(15, 2))
                    .col(integer(ScheduleStages::PercentComplete).default(0))
                    .col(string_len(ScheduleStages::Status, 20).default("Planned"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_stages_project")
                            .from(ScheduleStages::Table, ScheduleStages::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create progress_snapshots table
        manager
            .create_table(
                Table::create()
                    .table(ProgressSnapshots::Table)
                    .if_not_exists()
                    .col(pk_auto(ProgressSnapshots::Id))
                    .col(integer(ProgressSnapshots::StageId))
                    .col(date(ProgressSnapshots::RecordedOn))
                    .col(integer(ProgressSnapshots::Percent))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_snapshots_stage")
                            .from(ProgressSnapshots::Table, ProgressSnapshots::StageId)
                            .to(ScheduleStages::Table, ScheduleStages::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create expenses table
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(pk_auto(Expenses::Id))
                    .col(integer(Expenses::ProjectId))
                    .col(string_len(Expenses::Category, 20))
                    .col(string(Expenses::Description))
                    .col(decimal(Expenses::Value).decimal_len(15, 2))
                    .col(date(Expenses::PaidOn))
                    .col(string_len(Expenses::Status, 10).default("Paid"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_project")
                            .from(Expenses::Table, Expenses::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create barter_entries table
        manager
            .create_table(
                Table::create()
                    .table(BarterEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(BarterEntries::Id))
                    .col(integer(BarterEntries::ProjectId))
                    .col(string(BarterEntries::Description))
                    .col(decimal(BarterEntries::Value).decimal_len(15, 2))
                    .col(date(BarterEntries::TradedOn))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_barter_entries_project")
                            .from(BarterEntries::Table, BarterEntries::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create intake_submissions table
        manager
            .create_table(
                Table::create()
                    .table(IntakeSubmissions::Table)
                    .if_not_exists()
                    .col(pk_auto(IntakeSubmissions::Id))
                    .col(timestamp_with_time_zone(IntakeSubmissions::SubmittedAt))
                    .col(string(IntakeSubmissions::Name))
                    .col(string(IntakeSubmissions::Phone))
                    .col(string_null(IntakeSubmissions::Email))
                    .col(string_null(IntakeSubmissions::City))
                    .col(string_null(IntakeSubmissions::Development))
                    .col(string_null(IntakeSubmissions::AgentName))
                    .col(boolean(IntakeSubmissions::WasAssisted).default(false))
                    .col(boolean(IntakeSubmissions::VisitedSalesOffice).default(false))
                    .col(boolean(IntakeSubmissions::ConsentToContact).default(false))
                    .col(string_null(IntakeSubmissions::InterestLevel))
                    .col(boolean(IntakeSubmissions::PurchasedBefore).default(false))
                    .col(string_null(IntakeSubmissions::MediaSource))
                    .col(integer(IntakeSubmissions::Rating).default(0))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IntakeSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BarterEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProgressSnapshots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduleStages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    Name,
    Company,
}

#[derive(DeriveIden)]
enum ScheduleStages {
    Table,
    Id,
    ProjectId,
    Category,
    StartDate,
    EndDate,
    EstimatedValue,
    PercentComplete,
    Status,
}

#[derive(DeriveIden)]
enum ProgressSnapshots {
    Table,
    Id,
    StageId,
    RecordedOn,
    Percent,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    ProjectId,
    Category,
    Description,
    Value,
    PaidOn,
    Status,
}

#[derive(DeriveIden)]
enum BarterEntries {
    Table,
    Id,
    ProjectId,
    Description,
    Value,
    TradedOn,
}

#[derive(DeriveIden)]
enum IntakeSubmissions {
    Table,
    Id,
    SubmittedAt,
    Name,
    Phone,
    Email,
    City,
    Development,
    AgentName,
    WasAssisted,
    VisitedSalesOffice,
    ConsentToContact,
    InterestLevel,
    PurchasedBefore,
    MediaSource,
    Rating,
}
