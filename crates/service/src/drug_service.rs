use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use models::drug::{self, Entity as DrugEntity, NewDrug};
use crate::errors::ServiceError;
use crate::observability::track;

/// Insert a drug; the returned model carries the generated id.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn add_drug(db: &DatabaseConnection, input: NewDrug) -> Result<drug::Model, ServiceError> {
    track("add", async {
        let created = drug::create(db, input).await?;
        Ok(created)
    })
    .await
}

/// Get a drug by primary key.
#[instrument(skip(db))]
pub async fn get_drug(db: &DatabaseConnection, id: i32) -> Result<drug::Model, ServiceError> {
    track("get", async {
        DrugEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::drug_not_found(id))
    })
    .await
}

/// Overwrite the stock level; absolute value, not a delta.
/// Runs as a single `UPDATE ... RETURNING` statement.
#[instrument(skip(db))]
pub async fn update_stock(db: &DatabaseConnection, id: i32, quantity: i32) -> Result<drug::Model, ServiceError> {
    track("update_stock", async {
        let updated = DrugEntity::update_many()
            .col_expr(drug::Column::Quantity, Expr::value(quantity))
            .filter(drug::Column::Id.eq(id))
            .exec_with_returning(db)
            .await?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::drug_not_found(id))
    })
    .await
}

/// Delete by id; `NotFound` when no row matched.
#[instrument(skip(db))]
pub async fn delete_drug(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    track("delete", async {
        let res = DrugEntity::delete_by_id(id).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::drug_not_found(id));
        }
        Ok(())
    })
    .await
}

/// Full table scan ordered by id.
#[instrument(skip(db))]
pub async fn list_drugs(db: &DatabaseConnection) -> Result<Vec<drug::Model>, ServiceError> {
    track("list", async {
        let rows = DrugEntity::find()
            .order_by_asc(drug::Column::Id)
            .all(db)
            .await?;
        Ok(rows)
    })
    .await
}

/// Drugs with `quantity <= threshold`, lowest stock first (id breaks ties).
#[instrument(skip(db))]
pub async fn low_stock(db: &DatabaseConnection, threshold: i32) -> Result<Vec<drug::Model>, ServiceError> {
    track("low_stock", async {
        let rows = DrugEntity::find()
            .filter(drug::Column::Quantity.lte(threshold))
            .order_by_asc(drug::Column::Quantity)
            .order_by_asc(drug::Column::Id)
            .all(db)
            .await?;
        Ok(rows)
    })
    .await
}
