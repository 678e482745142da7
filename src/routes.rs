// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers::{pages, portal},
    middleware::session::session_gate,
    models::content::{QuickAction, Service, TravelPackage, Trip},
};

pub fn router(app_state: AppState) -> Router {
    // Site público
    let site = Router::new()
        .route("/api/health", get(pages::health))
        .route("/", get(pages::root))
        .route("/{locale}", get(pages::home))
        .route("/{locale}/destinations", get(pages::destinations))
        .route("/{locale}/programs", get(pages::programs))
        .route("/{locale}/medical-tourism", get(pages::medical_tourism))
        .route("/{locale}/contact", get(pages::contact_page).post(pages::submit_contact))
        .route("/{locale}/not-found", get(pages::not_found));

    // Portal (protegido pelo session gate, exceto o login)
    let portal = Router::new()
        .route("/{locale}/portal-manage", get(portal::dashboard))
        .route(
            "/{locale}/portal-manage/login",
            get(portal::login_page).post(portal::login),
        )
        .route("/{locale}/portal-manage/logout", post(portal::logout))
        .route("/{locale}/portal-manage/messages", get(portal::list_messages))
        .route("/{locale}/portal-manage/messages/{id}", get(portal::show_message))
        .route("/{locale}/portal-manage/messages/{id}/read", post(portal::mark_message_read))
        .route("/{locale}/portal-manage/messages/{id}/delete", post(portal::delete_message))
        // --- services ---
        .route(
            "/{locale}/portal-manage/services",
            get(portal::list_items::<Service>).post(portal::create_item::<Service>),
        )
        .route(
            "/{locale}/portal-manage/services/{id}",
            get(portal::show_item::<Service>).post(portal::update_item::<Service>),
        )
        .route("/{locale}/portal-manage/services/{id}/toggle", post(portal::toggle_item::<Service>))
        .route("/{locale}/portal-manage/services/{id}/delete", post(portal::delete_item::<Service>))
        // --- trips ---
        .route(
            "/{locale}/portal-manage/trips",
            get(portal::list_items::<Trip>).post(portal::create_item::<Trip>),
        )
        .route(
            "/{locale}/portal-manage/trips/{id}",
            get(portal::show_item::<Trip>).post(portal::update_item::<Trip>),
        )
        .route("/{locale}/portal-manage/trips/{id}/toggle", post(portal::toggle_item::<Trip>))
        .route("/{locale}/portal-manage/trips/{id}/delete", post(portal::delete_item::<Trip>))
        // --- packages ---
        .route(
            "/{locale}/portal-manage/packages",
            get(portal::list_items::<TravelPackage>).post(portal::create_item::<TravelPackage>),
        )
        .route(
            "/{locale}/portal-manage/packages/{id}",
            get(portal::show_item::<TravelPackage>).post(portal::update_item::<TravelPackage>),
        )
        .route("/{locale}/portal-manage/packages/{id}/toggle", post(portal::toggle_item::<TravelPackage>))
        .route("/{locale}/portal-manage/packages/{id}/delete", post(portal::delete_item::<TravelPackage>))
        // --- quick-actions ---
        .route(
            "/{locale}/portal-manage/quick-actions",
            get(portal::list_items::<QuickAction>).post(portal::create_item::<QuickAction>),
        )
        .route(
            "/{locale}/portal-manage/quick-actions/{id}",
            get(portal::show_item::<QuickAction>).post(portal::update_item::<QuickAction>),
        )
        .route("/{locale}/portal-manage/quick-actions/{id}/toggle", post(portal::toggle_item::<QuickAction>))
        .route("/{locale}/portal-manage/quick-actions/{id}/delete", post(portal::delete_item::<QuickAction>));

    // O gate envolve tudo, inclusive o fallback: roda antes do roteamento
    Router::new()
        .merge(site)
        .merge(portal)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(pages::not_found)
        .layer(axum_middleware::from_fn_with_state(
            app_state.session.clone(),
            session_gate,
        ))
        .with_state(app_state)
}
