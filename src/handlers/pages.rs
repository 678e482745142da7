// src/handlers/pages.rs

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    Form, Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::i18n::{negotiate, RequestLocale},
    models::{
        content::{QuickAction, Service, TravelPackage, Trip},
        message::{ContactPageQuery, NewContactMessage},
        page::{ContactBody, HomeBody, ListBody, PageView},
    },
};

// GET /api/health
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!(error = %e, "Banco indisponível no health check");
            (StatusCode::OK, "DEGRADED")
        }
    }
}

// GET /  -> /{idioma do navegador}
pub async fn root(headers: HeaderMap) -> Redirect {
    Redirect::temporary(&format!("/{}", negotiate(&headers)))
}

// GET /{locale}
pub async fn home(State(app_state): State<AppState>, RequestLocale(locale): RequestLocale) -> Json<PageView<HomeBody>> {
    let catalog = app_state.messages.catalog(locale);
    let content = &app_state.content_service;

    let (services, quick_actions, packages) = tokio::join!(
        content.list_or_empty::<Service>(Some(true)),
        content.list_or_empty::<QuickAction>(Some(true)),
        content.list_or_empty::<TravelPackage>(Some(true)),
    );

    let body = HomeBody {
        subtitle: catalog.t("home.subtitle", ""),
        services,
        quick_actions,
        packages,
    };
    Json(PageView::new(locale, catalog, catalog.t("home.title", "Discover your next journey"), body))
}

// GET /{locale}/destinations
pub async fn destinations(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Json<PageView<ListBody<Trip>>> {
    let catalog = app_state.messages.catalog(locale);
    let items = app_state.content_service.list_or_empty::<Trip>(Some(true)).await;

    let body = ListBody { subtitle: None, items };
    Json(PageView::new(locale, catalog, catalog.t("destinations.title", "Destinations"), body))
}

// GET /{locale}/programs
pub async fn programs(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Json<PageView<ListBody<TravelPackage>>> {
    let catalog = app_state.messages.catalog(locale);
    let items = app_state.content_service.list_or_empty::<TravelPackage>(Some(true)).await;

    let body = ListBody { subtitle: None, items };
    Json(PageView::new(locale, catalog, catalog.t("programs.title", "Travel Programs"), body))
}

// GET /{locale}/medical-tourism
pub async fn medical_tourism(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
) -> Json<PageView<ListBody<Service>>> {
    let catalog = app_state.messages.catalog(locale);
    let items = app_state.content_service.list_or_empty::<Service>(Some(true)).await;

    let body = ListBody {
        subtitle: Some(catalog.t("medical.subtitle", "")),
        items,
    };
    Json(PageView::new(locale, catalog, catalog.t("medical.title", "Medical Tourism"), body))
}

// GET /{locale}/contact
pub async fn contact_page(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Query(query): Query<ContactPageQuery>,
) -> Json<PageView<ContactBody>> {
    let catalog = app_state.messages.catalog(locale);
    let sent = query.sent.unwrap_or(false);

    let body = ContactBody {
        sent,
        confirmation: sent.then(|| catalog.t("contact.sent", "Thank you! We will reply shortly.")),
    };
    Json(PageView::new(locale, catalog, catalog.t("contact.title", "Get in touch"), body))
}

// POST /{locale}/contact
#[utoipa::path(
    post,
    path = "/{locale}/contact",
    tag = "Site",
    request_body(content = NewContactMessage, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Mensagem registrada, volta para a página de contato"),
        (status = 400, description = "Dados inválidos")
    ),
    params(("locale" = String, Path, description = "Idioma da página"))
)]
pub async fn submit_contact(
    State(app_state): State<AppState>,
    RequestLocale(locale): RequestLocale,
    Form(payload): Form<NewContactMessage>,
) -> Result<Redirect, AppError> {
    payload.validate()?;

    app_state.message_service.submit(&payload, locale).await?;

    Ok(Redirect::to(&format!("/{locale}/contact?sent=true")))
}

// GET /{locale}/not-found e fallback de rotas desconhecidas
pub async fn not_found(State(app_state): State<AppState>, RequestLocale(locale): RequestLocale) -> impl IntoResponse {
    let catalog = app_state.messages.catalog(locale);
    let page = PageView::new(locale, catalog, catalog.t("notFound.title", "Page not found"), ());
    (StatusCode::NOT_FOUND, Json(page))
}
