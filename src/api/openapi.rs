//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, health, menu, readers, receipts, settings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Portal API",
        version = "1.0.0",
        description = "Session, navigation and catalog API behind the library portal",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        menu::get_menu,
        // Catalog
        books::list_books,
        books::get_book,
        receipts::submit_inward,
        receipts::submit_outward,
        // Circulation
        borrows::list_borrows,
        borrows::my_borrows,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::renew_borrow,
        // Readers
        readers::list_readers,
        readers::get_reader,
        readers::update_card,
        // Settings
        settings::get_settings,
        settings::update_settings,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::MeResponse,
            crate::models::session::SessionUser,
            crate::guard::MenuSection,
            crate::guard::MenuEntry,
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::receipt::ReceiptKind,
            crate::models::receipt::ReceiptLine,
            crate::models::receipt::ReceiptDraft,
            crate::models::receipt::ReceiptConfirmation,
            // Circulation
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::CreateBorrow,
            crate::models::reader::Reader,
            crate::models::reader::CardStatus,
            crate::models::reader::UpdateCard,
            // Settings
            crate::models::settings::SystemSettings,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sessions and navigation"),
        (name = "books", description = "Catalog browsing"),
        (name = "receipts", description = "Stock receipts"),
        (name = "borrows", description = "Borrowing and returns"),
        (name = "readers", description = "Readers and library cards"),
        (name = "settings", description = "System settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
