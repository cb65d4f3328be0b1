// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o app completo: rotas públicas + protegidas (JWT), docs, trace e CORS.
pub fn build_router(app_state: AppState) -> Router {
    // Só exige o token; o papel é checado no handler (RequireAdmin / RequireStaff)
    let protected = |router: Router<AppState>| {
        router.route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
    };

    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .merge(protected(
            Router::new()
                .route("/verify", get(handlers::auth::verify))
                .route("/logout", post(handlers::auth::logout)),
        ));

    let appointment_routes = Router::new()
        .route("/create", post(handlers::appointments::create_appointment))
        .route("/horarios-disponiveis", get(handlers::appointments::available_slots))
        .merge(protected(
            Router::new()
                .route("/all", get(handlers::appointments::list_appointments))
                .route("/update", put(handlers::appointments::update_appointment))
                .route("/delete/{id}", delete(handlers::appointments::delete_appointment))
                .route("/{id}", get(handlers::appointments::get_appointment)),
        ));

    let slot_routes = Router::new()
        .route("/barbeiro/{id}", get(handlers::time_slots::slots_by_professional))
        .merge(protected(
            Router::new()
                .route("/getall", get(handlers::time_slots::list_slots))
                .route("/create", post(handlers::time_slots::create_batch))
                .route("/create-individual", post(handlers::time_slots::create_individual))
                .route("/update/{id}", put(handlers::time_slots::update_slot))
                .route("/delete/{id}", delete(handlers::time_slots::delete_slot)),
        ));

    let professional_routes = Router::new()
        .route("/getall", get(handlers::professionals::list_professionals))
        .route("/{id}", get(handlers::professionals::get_professional))
        .merge(protected(
            Router::new()
                .route("/create", post(handlers::professionals::create_professional))
                .route("/update/{id}", put(handlers::professionals::update_professional))
                .route("/delete/{id}", delete(handlers::professionals::delete_professional)),
        ));

    let procedure_routes = Router::new()
        .route("/getall", get(handlers::procedures::list_procedures))
        .merge(protected(
            Router::new()
                .route("/create", post(handlers::procedures::create_procedure))
                .route("/update/{id}", put(handlers::procedures::update_procedure))
                .route("/delete/{id}", delete(handlers::procedures::delete_procedure)),
        ));

    let product_routes = protected(
        Router::new()
            .route("/getall", get(handlers::products::list_products))
            .route("/create", post(handlers::products::create_product))
            .route("/update/{id}", put(handlers::products::update_product))
            .route("/delete/{id}", delete(handlers::products::delete_product)),
    );

    let finance_routes =
        protected(Router::new().route("/getall", get(handlers::finance::list_entries)));

    let api_routes = Router::new()
        .route("/health", get(handlers::auth::health))
        .nest("/auth", auth_routes)
        .nest("/appointment", appointment_routes)
        .nest("/horario", slot_routes)
        .nest("/profissional", professional_routes)
        .nest("/procedimento", procedure_routes)
        .nest("/produto", product_routes)
        .nest("/financeiro", finance_routes);

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT_LANGUAGE]);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
