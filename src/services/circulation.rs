//! Borrow desk, returns and reader cards

use std::sync::Arc;

use validator::Validate;

use crate::{
    backend::LibraryBackend,
    error::AppResult,
    models::{
        borrow::{Borrow, BorrowQuery, CreateBorrow},
        normalize_paging,
        reader::{Reader, ReaderQuery, UpdateCard},
        session::Session,
        PaginatedResponse,
    },
    services::sessions::SessionStore,
};

#[derive(Clone)]
pub struct CirculationService {
    backend: Arc<dyn LibraryBackend>,
    sessions: SessionStore,
}

impl CirculationService {
    pub fn new(backend: Arc<dyn LibraryBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    pub async fn list_borrows(
        &self,
        session: &Session,
        mut query: BorrowQuery,
    ) -> AppResult<PaginatedResponse<Borrow>> {
        normalize_paging(&mut query.page, &mut query.per_page);
        let result = self.backend.list_borrows(&session.backend_token, &query).await;
        self.sessions.close_if_rejected(session, result).await
    }

    /// Borrows of the signed-in reader, whatever filter the client sent
    pub async fn my_borrows(
        &self,
        session: &Session,
        mut query: BorrowQuery,
    ) -> AppResult<PaginatedResponse<Borrow>> {
        query.reader_id = Some(session.user.user_id);
        query.book_id = None;
        self.list_borrows(session, query).await
    }

    pub async fn create_borrow(&self, session: &Session, request: CreateBorrow) -> AppResult<Borrow> {
        request.validate()?;
        let result = self.backend.create_borrow(&session.backend_token, &request).await;
        let borrow = self.sessions.close_if_rejected(session, result).await?;
        tracing::info!(
            login = %session.user.login,
            borrow = borrow.id,
            "Book {} lent to card {}",
            borrow.book_id,
            borrow.card_number
        );
        Ok(borrow)
    }

    pub async fn return_borrow(&self, session: &Session, id: i64) -> AppResult<Borrow> {
        let result = self.backend.return_borrow(&session.backend_token, id).await;
        let borrow = self.sessions.close_if_rejected(session, result).await?;
        tracing::info!(login = %session.user.login, borrow = id, "Book {} returned", borrow.book_id);
        Ok(borrow)
    }

    pub async fn renew_borrow(&self, session: &Session, id: i64) -> AppResult<Borrow> {
        let result = self.backend.renew_borrow(&session.backend_token, id).await;
        let borrow = self.sessions.close_if_rejected(session, result).await?;
        tracing::info!(login = %session.user.login, borrow = id, "Borrow renewed until {}", borrow.due_at);
        Ok(borrow)
    }

    pub async fn list_readers(
        &self,
        session: &Session,
        mut query: ReaderQuery,
    ) -> AppResult<PaginatedResponse<Reader>> {
        normalize_paging(&mut query.page, &mut query.per_page);
        let result = self.backend.list_readers(&session.backend_token, &query).await;
        self.sessions.close_if_rejected(session, result).await
    }

    pub async fn get_reader(&self, session: &Session, id: i64) -> AppResult<Reader> {
        let result = self.backend.get_reader(&session.backend_token, id).await;
        self.sessions.close_if_rejected(session, result).await
    }

    pub async fn update_card(&self, session: &Session, id: i64, request: UpdateCard) -> AppResult<Reader> {
        let result = self.backend.update_card(&session.backend_token, id, &request).await;
        let reader = self.sessions.close_if_rejected(session, result).await?;
        tracing::info!(
            login = %session.user.login,
            reader = id,
            "Card {} set to {:?}",
            reader.card_number,
            reader.card_status
        );
        Ok(reader)
    }
}
