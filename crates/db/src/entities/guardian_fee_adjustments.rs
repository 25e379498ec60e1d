//! `SeaORM` Entity for guardian_fee_adjustments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AdjustmentType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "guardian_fee_adjustments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub guardian_id: Uuid,
    pub academic_term_id: Uuid,
    pub category_name: String,
    pub adjustment_type: AdjustmentType,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub custom_amount: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::guardians::Entity",
        from = "Column::GuardianId",
        to = "super::guardians::Column::Id"
    )]
    Guardians,
    #[sea_orm(
        belongs_to = "super::academic_terms::Entity",
        from = "Column::AcademicTermId",
        to = "super::academic_terms::Column::Id"
    )]
    AcademicTerms,
}

impl Related<super::guardians::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guardians.def()
    }
}

impl Related<super::academic_terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicTerms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
