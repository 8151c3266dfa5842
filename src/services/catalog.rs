//! Catalog browsing and stock receipts

use std::sync::Arc;

use crate::{
    backend::LibraryBackend,
    error::AppResult,
    models::{
        book::{Book, BookQuery, BookShort},
        normalize_paging,
        receipt::{ReceiptConfirmation, ReceiptDraft, ReceiptKind},
        session::Session,
        PaginatedResponse,
    },
    services::sessions::SessionStore,
};

#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn LibraryBackend>,
    sessions: SessionStore,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn LibraryBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    /// Search books with filters
    pub async fn search_books(
        &self,
        session: &Session,
        mut query: BookQuery,
    ) -> AppResult<PaginatedResponse<BookShort>> {
        normalize_paging(&mut query.page, &mut query.per_page);
        let result = self.backend.list_books(&session.backend_token, &query).await;
        self.sessions.close_if_rejected(session, result).await
    }

    pub async fn get_book(&self, session: &Session, id: i64) -> AppResult<Book> {
        let result = self.backend.get_book(&session.backend_token, id).await;
        self.sessions.close_if_rejected(session, result).await
    }

    /// Check, merge and forward a receipt built by the SPA
    pub async fn submit_receipt(
        &self,
        session: &Session,
        kind: ReceiptKind,
        draft: ReceiptDraft,
    ) -> AppResult<ReceiptConfirmation> {
        let receipt = draft.into_receipt(kind)?;
        let result = self.backend.submit_receipt(&session.backend_token, &receipt).await;
        let confirmation = self.sessions.close_if_rejected(session, result).await?;

        tracing::info!(
            login = %session.user.login,
            receipt = confirmation.receipt_id,
            "{} receipt recorded: {} lines, {} copies",
            kind,
            receipt.lines.len(),
            receipt.total_quantity
        );
        Ok(confirmation)
    }
}
