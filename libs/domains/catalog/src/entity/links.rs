//! Association tables for the catalog's many-to-many relationships.

pub mod product_tags {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "product_tags")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub tag_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::entity::product::Entity",
            from = "Column::ProductId",
            to = "crate::entity::product::Column::Id"
        )]
        Product,
        #[sea_orm(
            belongs_to = "crate::entity::tag::Entity",
            from = "Column::TagId",
            to = "crate::entity::tag::Column::Id"
        )]
        Tag,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod product_images {
    use sea_orm::entity::prelude::*;

    /// `priority` orders a product's gallery, lowest first.
    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "product_images")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub product_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub image_id: i64,
        pub priority: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::entity::product::Entity",
            from = "Column::ProductId",
            to = "crate::entity::product::Column::Id"
        )]
        Product,
        #[sea_orm(
            belongs_to = "crate::entity::media::Entity",
            from = "Column::ImageId",
            to = "crate::entity::media::Column::Id"
        )]
        Image,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod variant_attribute_variants {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "variant_attribute_variants")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub variant_id: i64,
        #[sea_orm(primary_key, auto_increment = false)]
        pub attribute_variant_id: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "crate::entity::variant::Entity",
            from = "Column::VariantId",
            to = "crate::entity::variant::Column::Id"
        )]
        Variant,
        #[sea_orm(
            belongs_to = "crate::entity::attribute_variant::Entity",
            from = "Column::AttributeVariantId",
            to = "crate::entity::attribute_variant::Column::Id"
        )]
        AttributeVariant,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
