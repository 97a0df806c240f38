use crate::models::{ExchangePolicy, ProductStatus, ProductType, ReturnPolicy, StockStatus};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub public_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(unique)]
    pub product_no: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub short_description: Option<String>,
    pub meta_description: Option<String>,
    pub video: Option<String>,
    /// Delivery time in days
    pub delivery_time: Option<i32>,
    pub stock_management: bool,
    /// Average rating between 1 and 5, two decimal places
    #[sea_orm(column_type = "Decimal(Some((3, 2)))")]
    pub rating: Decimal,
    pub total_sold: i64,
    #[sea_orm(column_name = "type")]
    pub product_type: ProductType,
    pub status: ProductStatus,
    pub stock_status: StockStatus,
    pub return_policy: ReturnPolicy,
    pub exchange_policy: ExchangePolicy,
    pub brand_id: Option<i64>,
    pub category_id: i64,
    pub seller_id: i64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::variant::Entity")]
    Variants,
}

impl ActiveModelBehavior for ActiveModel {}
