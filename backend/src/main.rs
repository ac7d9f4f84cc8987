use actix_web::{web, App, HttpServer};
use chatbot_backend::config::AppConfig;
use chatbot_backend::job_controller::ReportController;
use chatbot_backend::services;
use chatbot_backend::services::chat::session::ChatLog;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let url = format!("http://{}:{}", config.host, config.port);

    // Single report slot, shared by every worker. Runs are spawned on this
    // runtime, which outlives the per-worker runtimes.
    let controller = ReportController::new(config.report.clone());
    let chat_log = web::Data::new(ChatLog::default());

    info!(
        "Server running at {}, reports written to {}",
        url,
        config.report.output_path.display()
    );

    let app_controller = web::Data::new(controller.clone());
    HttpServer::new(move || {
        App::new()
            .app_data(app_controller.clone())
            .app_data(chat_log.clone())
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    controller.shutdown().await;
    info!("Server stopped, report slot left {}", controller.status().label());
    Ok(())
}
