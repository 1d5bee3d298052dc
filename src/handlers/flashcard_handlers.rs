use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::Query;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{
    CreateFlashcardDto, FlashcardListQuery, MessageResponse, ReviewDto, SessionQuery,
    UpdateFlashcardDto,
};
use crate::errors::ApiError;
use crate::models::{Difficulty, Flashcard};
use crate::progress::{self, FlashcardStats};
use crate::repo;
use crate::xp::{xp_for_event, XpEvent};

/// Cards currently due for review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCardsResponse {
    pub total_due: usize,
    pub cards: Vec<Flashcard>,
}

/// Outcome of recording a single review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub message: String,
    pub is_correct: bool,
    pub next_review: chrono::NaiveDateTime,
    pub xp_awarded: i32,
    pub accuracy: f64,
}

/// A card as dealt into a study session, without review bookkeeping.
#[derive(Debug, Serialize)]
pub struct SessionCard {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

/// A freshly assembled study session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub total_cards: usize,
    pub due_cards: usize,
    pub cards: Vec<SessionCard>,
}

/// Handler for creating a new flashcard
///
/// This function handles POST requests to `/api/flashcards/`. Creating a
/// card awards a small amount of XP.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `payload` - The request payload containing the card content
///
/// ### Returns
///
/// The newly created flashcard as JSON
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, subject = %payload.subject))]
pub async fn create_flashcard_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateFlashcardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    info!("Creating new flashcard");

    let card = repo::create_flashcard(&pool, &user.user_id, payload).map_err(ApiError::Database)?;

    repo::add_xp(&pool, &user.user_id, xp_for_event(XpEvent::FlashcardCreated))
        .map_err(ApiError::Database)?;

    info!("Successfully created flashcard with id: {}", card.id);

    Ok(Json(card))
}

/// Handler for listing the user's flashcards
///
/// This function handles GET requests to `/api/flashcards/`, with
/// optional `subject` and `difficulty` query filters.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn list_flashcards_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<FlashcardListQuery>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    debug!("Listing flashcards");

    let cards =
        repo::list_flashcards(&pool, &user.user_id, &query).map_err(ApiError::Database)?;

    debug!("Found {} flashcards", cards.len());

    Ok(Json(cards))
}

/// Handler for retrieving a specific flashcard
///
/// This function handles GET requests to `/api/flashcards/{card_id}`.
#[instrument(skip(pool), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn get_flashcard_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    // Extract the card ID from the URL path
    Path(card_id): Path<String>,
) -> Result<Json<Flashcard>, ApiError> {
    debug!("Getting flashcard");

    let card = repo::get_flashcard(&pool, &user.user_id, &card_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Flashcard"))?;

    Ok(Json(card))
}

/// Handler for updating a flashcard's content
///
/// This function handles PUT requests to `/api/flashcards/{card_id}`.
/// Review statistics are never touched here.
#[instrument(skip(pool, payload), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn update_flashcard_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(card_id): Path<String>,
    Json(payload): Json<UpdateFlashcardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    info!("Updating flashcard");

    let card = repo::update_flashcard(&pool, &user.user_id, &card_id, payload)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Flashcard"))?;

    Ok(Json(card))
}

/// Handler for deleting a flashcard
///
/// This function handles DELETE requests to `/api/flashcards/{card_id}`.
#[instrument(skip(pool), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn delete_flashcard_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(card_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Deleting flashcard");

    let deleted = repo::delete_flashcard(&pool, &user.user_id, &card_id)
        .map_err(ApiError::Database)?;
    if !deleted {
        return Err(ApiError::NotFound("Flashcard"));
    }

    Ok(Json(MessageResponse::new("Flashcard deleted successfully")))
}

/// Handler for listing cards due for review
///
/// This function handles GET requests to `/api/flashcards/due/review`.
/// Cards are returned most overdue first.
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn due_flashcards_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<DueCardsResponse>, ApiError> {
    debug!("Listing due flashcards");

    let cards = repo::list_due_flashcards(&pool, &user.user_id).map_err(ApiError::Database)?;

    Ok(Json(DueCardsResponse {
        total_due: cards.len(),
        cards,
    }))
}

/// Handler for recording a review result
///
/// This function handles PUT requests to
/// `/api/flashcards/{card_id}/review`. The card's next review date is
/// rescheduled and the user earns XP for the attempt, more for a correct
/// answer.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated user
/// * `card_id` - The ID of the card that was reviewed
/// * `payload` - Whether the answer was correct
///
/// ### Returns
///
/// The review outcome with the new schedule and running accuracy as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id, card_id = %card_id, is_correct = %payload.is_correct))]
pub async fn review_flashcard_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(card_id): Path<String>,
    Json(payload): Json<ReviewDto>,
) -> Result<Json<ReviewOutcome>, ApiError> {
    info!("Recording flashcard review");

    let card = repo::record_review(&pool, &user.user_id, &card_id, payload.is_correct)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Flashcard"))?;

    let xp_awarded = xp_for_event(XpEvent::FlashcardReviewed {
        correct: payload.is_correct,
    });
    repo::add_xp(&pool, &user.user_id, xp_awarded).map_err(ApiError::Database)?;

    info!("Next review scheduled for {}", card.next_review);

    Ok(Json(ReviewOutcome {
        message: "Review recorded successfully".to_string(),
        is_correct: payload.is_correct,
        next_review: card.next_review,
        xp_awarded,
        accuracy: card.accuracy(),
    }))
}

/// Handler for the flashcard statistics summary
///
/// This function handles GET requests to
/// `/api/flashcards/stats/summary`.
///
/// ### Returns
///
/// Card counts, due counts, average accuracy and per-subject and
/// per-difficulty distributions as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id))]
pub async fn flashcard_stats_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<FlashcardStats>, ApiError> {
    debug!("Computing flashcard stats");

    let cards = repo::list_flashcards(&pool, &user.user_id, &FlashcardListQuery::default())
        .map_err(ApiError::Database)?;

    let stats = progress::flashcard_stats(&cards, chrono::Utc::now().naive_utc());

    Ok(Json(stats))
}

/// Handler for assembling a study session
///
/// This function handles POST requests to
/// `/api/flashcards/session/start`. Due cards are picked first and the
/// deck is padded with not-yet-due cards up to the requested size, then
/// shuffled.
///
/// ### Returns
///
/// A session id, the deal size, how many cards were actually due, and
/// the dealt cards as JSON
#[instrument(skip(pool), fields(user_id = %user.user_id, card_count = %query.card_count))]
pub async fn study_session_handler(
    // Extract the database pool from the application state
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionResponse>, ApiError> {
    info!("Starting study session");

    let (cards, due_count) =
        repo::assemble_session(&pool, &user.user_id, &query).map_err(ApiError::Database)?;

    let session_cards: Vec<SessionCard> = cards
        .into_iter()
        .map(|card| SessionCard {
            id: card.id,
            subject: card.subject,
            topic: card.topic,
            question: card.question,
            answer: card.answer,
            difficulty: card.difficulty,
        })
        .collect();

    info!("Dealt {} cards ({} due)", session_cards.len(), due_count);

    Ok(Json(SessionResponse {
        session_id: Uuid::new_v4().to_string(),
        total_cards: session_cards.len(),
        due_cards: due_count,
        cards: session_cards,
    }))
}
