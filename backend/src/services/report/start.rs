use crate::job_controller::ReportController;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::OutcomeResponse;

pub(crate) async fn process(controller: web::Data<ReportController>) -> impl Responder {
    HttpResponse::Ok().json(OutcomeResponse {
        status: controller.start(),
    })
}
