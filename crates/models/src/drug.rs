use sea_orm::{entity::prelude::*, ActiveModelTrait, ConnectionTrait, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

/// One inventory row. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drugs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    /// `YYYY-MM-DD` by convention; stored and returned verbatim.
    pub expiry_date: String,
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert payload: every column except the generated id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewDrug {
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub expiry_date: String,
    pub category: String,
}

impl From<NewDrug> for ActiveModel {
    fn from(d: NewDrug) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(d.name),
            quantity: Set(d.quantity),
            price: Set(d.price),
            expiry_date: Set(d.expiry_date),
            category: Set(d.category),
        }
    }
}

/// Insert one row and return it with its generated id.
pub async fn create<C: ConnectionTrait>(db: &C, input: NewDrug) -> Result<Model, errors::ModelError> {
    let am: ActiveModel = input.into();
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
