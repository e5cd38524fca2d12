//! Category entity for topic-based post grouping.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category entity - a topic-based container for posts.
///
/// An unpublished category hides every post under it from non-owners.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Category title.
    pub title: String,

    /// URL slug (unique).
    #[sea_orm(unique, indexed)]
    pub slug: String,

    /// Category description.
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Whether this category is publicly visible.
    #[sea_orm(default_value = true)]
    pub is_published: bool,

    /// When the category was created.
    pub created_at: DateTimeWithTimeZone,

    /// When the category was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
