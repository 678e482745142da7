// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;
use crate::common;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Site ---
        handlers::pages::submit_contact,

        // --- Portal ---
        handlers::portal::login,
        handlers::portal::logout,
        handlers::portal::list_messages,
        handlers::portal::show_message,
    ),
    components(
        schemas(
            // --- Locale ---
            common::locale::Locale,
            common::locale::Direction,

            // --- Auth ---
            models::auth::AuthUser,
            models::auth::LoginPayload,

            // --- Conteúdo ---
            models::content::Service,
            models::content::ServicePayload,
            models::content::Trip,
            models::content::TripPayload,
            models::content::TravelPackage,
            models::content::TravelPackagePayload,
            models::content::QuickAction,
            models::content::QuickActionPayload,

            // --- Mensagens ---
            models::message::ContactMessage,
            models::message::NewContactMessage,
        )
    ),
    tags(
        (name = "Site", description = "Páginas públicas localizadas"),
        (name = "Portal", description = "Área administrativa (portal-manage), exige sessão")
    )
)]
pub struct ApiDoc;
