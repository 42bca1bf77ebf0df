use sea_orm::DatabaseConnection;
use tonic::{Request, Response, Status};
use tracing::{error, info, instrument};

use models::drug::{self, NewDrug};
use service::drug_service;
use service::errors::ServiceError;

use crate::proto::pharmacy_service_server::PharmacyService;
use crate::proto::{
    AddDrugRequest, DeleteDrugRequest, DeleteResponse, Drug, DrugResponse, GetDrugRequest,
    ListDrugsRequest, ListDrugsResponse, LowStockRequest, UpdateStockRequest,
};

pub const NOT_FOUND_MESSAGE: &str = "Drug not found";

impl From<drug::Model> for Drug {
    fn from(m: drug::Model) -> Self {
        Drug {
            id: m.id,
            name: m.name,
            quantity: m.quantity,
            price: m.price,
            expiry_date: m.expiry_date,
            category: m.category,
        }
    }
}

fn new_drug(req: AddDrugRequest) -> NewDrug {
    NewDrug {
        name: req.name,
        quantity: req.quantity,
        price: req.price,
        expiry_date: req.expiry_date,
        category: req.category,
    }
}

/// Failures are reported in-band: `success = false` plus the message.
fn drug_reply(res: Result<drug::Model, ServiceError>, ok_message: &str) -> DrugResponse {
    match res {
        Ok(m) => DrugResponse { success: true, message: ok_message.to_string(), drug: Some(m.into()) },
        Err(e) if e.is_not_found() => {
            DrugResponse { success: false, message: NOT_FOUND_MESSAGE.to_string(), drug: None }
        }
        Err(e) => {
            error!(err = %e, "store operation failed");
            DrugResponse { success: false, message: e.to_string(), drug: None }
        }
    }
}

fn list_reply(res: Result<Vec<drug::Model>, ServiceError>) -> ListDrugsResponse {
    match res {
        Ok(rows) => ListDrugsResponse { drugs: rows.into_iter().map(Drug::from).collect() },
        Err(e) => {
            // list calls have no error slot; callers see an empty list
            error!(err = %e, "list query failed");
            ListDrugsResponse { drugs: Vec::new() }
        }
    }
}

#[derive(Clone)]
pub struct PharmacyServiceImpl {
    db: DatabaseConnection,
}

impl PharmacyServiceImpl {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[tonic::async_trait]
impl PharmacyService for PharmacyServiceImpl {
    #[instrument(skip_all, fields(name = %request.get_ref().name))]
    async fn add_drug(&self, request: Request<AddDrugRequest>) -> Result<Response<DrugResponse>, Status> {
        let res = drug_service::add_drug(&self.db, new_drug(request.into_inner())).await;
        if let Ok(m) = &res {
            info!(id = m.id, "drug added");
        }
        Ok(Response::new(drug_reply(res, "Drug added")))
    }

    #[instrument(skip_all, fields(id = request.get_ref().id))]
    async fn get_drug(&self, request: Request<GetDrugRequest>) -> Result<Response<DrugResponse>, Status> {
        let id = request.into_inner().id;
        let res = drug_service::get_drug(&self.db, id).await;
        Ok(Response::new(drug_reply(res, "Found")))
    }

    #[instrument(skip_all, fields(id = request.get_ref().id, quantity = request.get_ref().quantity))]
    async fn update_stock(&self, request: Request<UpdateStockRequest>) -> Result<Response<DrugResponse>, Status> {
        let req = request.into_inner();
        let res = drug_service::update_stock(&self.db, req.id, req.quantity).await;
        Ok(Response::new(drug_reply(res, "Stock updated")))
    }

    #[instrument(skip_all, fields(id = request.get_ref().id))]
    async fn delete_drug(&self, request: Request<DeleteDrugRequest>) -> Result<Response<DeleteResponse>, Status> {
        let id = request.into_inner().id;
        let reply = match drug_service::delete_drug(&self.db, id).await {
            Ok(()) => {
                info!(id, "drug deleted");
                DeleteResponse { success: true, message: format!("Drug {} deleted", id) }
            }
            Err(e) if e.is_not_found() => {
                DeleteResponse { success: false, message: NOT_FOUND_MESSAGE.to_string() }
            }
            Err(e) => {
                error!(err = %e, "delete failed");
                DeleteResponse { success: false, message: e.to_string() }
            }
        };
        Ok(Response::new(reply))
    }

    #[instrument(skip_all)]
    async fn list_drugs(&self, _request: Request<ListDrugsRequest>) -> Result<Response<ListDrugsResponse>, Status> {
        Ok(Response::new(list_reply(drug_service::list_drugs(&self.db).await)))
    }

    #[instrument(skip_all, fields(threshold = request.get_ref().threshold))]
    async fn get_low_stock(&self, request: Request<LowStockRequest>) -> Result<Response<ListDrugsResponse>, Status> {
        let threshold = request.into_inner().threshold;
        Ok(Response::new(list_reply(drug_service::low_stock(&self.db, threshold).await)))
    }
}
