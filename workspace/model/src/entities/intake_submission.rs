use sea_orm::entity::prelude::*;

/// A prospect record captured by the sales intake form. Stored in full;
/// only a small subset (name, phone, agent, city) is forwarded to the
/// notification webhook.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "intake_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Submission timestamp (the one field with time-of-day semantics).
    pub submitted_at: DateTimeWithTimeZone,
    pub name: String,
    /// Normalized to "+55" followed by 10 or 11 digits.
    pub phone: String,
    pub email: Option<String>,
    pub city: Option<String>,
    /// The development the prospect asked about.
    pub development: Option<String>,
    /// Sales agent who handled the visit, if any.
    pub agent_name: Option<String>,
    pub was_assisted: bool,
    pub visited_sales_office: bool,
    pub consent_to_contact: bool,
    pub interest_level: Option<String>,
    pub purchased_before: bool,
    /// Where the prospect heard about the development.
    pub media_source: Option<String>,
    /// Satisfaction rating submitted later through the follow-up link.
    pub rating: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
