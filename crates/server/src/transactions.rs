//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionKind as ApiKind, TransactionListResponse, TransactionNew,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewTransaction, TransactionId, User};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_api_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

pub async fn list(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(user.id)
        .await?
        .into_iter()
        .map(|tx| TransactionView {
            id: tx.id,
            date: tx.date,
            description: tx.description,
            amount_minor: tx.amount.cents(),
            category: tx.category,
            kind: map_kind(tx.kind),
        })
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let amount = payload.amount.as_ref().map(|amount| amount.to_text());
    let id = state
        .engine
        .add_transaction(
            user.id,
            NewTransaction {
                date: payload.date.as_deref(),
                description: payload.description.as_deref(),
                amount: amount.as_deref(),
                category: payload.category.as_deref(),
                kind: payload.kind.map(map_api_kind),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

/// Deletes one of the caller's transactions.
///
/// Always `204`: unknown or foreign ids are ignored.
pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<TransactionId>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
