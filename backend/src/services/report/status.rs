use crate::job_controller::ReportController;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::ReportStatusResponse;

pub(crate) async fn process(controller: web::Data<ReportController>) -> impl Responder {
    let state = controller.status();
    HttpResponse::Ok().json(ReportStatusResponse::from(&state))
}
