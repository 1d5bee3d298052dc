use crate::db::DbPool;
use crate::dto::{CreateFlashcardDto, FlashcardListQuery, SessionQuery, UpdateFlashcardDto};
use crate::models::Flashcard;
use crate::scheduler;
use crate::schema::flashcards;
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

/// Creates a new flashcard for a user
#[instrument(skip(pool, card), fields(user_id = %user_id, subject = %card.subject))]
pub fn create_flashcard(pool: &DbPool, user_id: &str, card: CreateFlashcardDto) -> Result<Flashcard> {
    debug!("Creating new flashcard");

    let conn = &mut pool.get()?;

    let new_card = Flashcard::new(
        user_id,
        card.subject,
        card.topic,
        card.question,
        card.answer,
        card.difficulty,
    );

    diesel::insert_into(flashcards::table)
        .values(&new_card)
        .execute(conn)?;

    info!("Created flashcard {}", new_card.id);

    Ok(new_card)
}

/// Lists a user's flashcards, newest first, with optional filters
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the cards
/// * `query` - Optional subject and difficulty filters
///
/// ### Returns
///
/// A Result containing a vector of Flashcards matching the filters
#[instrument(skip(pool, query), fields(user_id = %user_id))]
pub fn list_flashcards(
    pool: &DbPool,
    user_id: &str,
    query: &FlashcardListQuery,
) -> Result<Vec<Flashcard>> {
    let conn = &mut pool.get()?;

    let mut cards = flashcards::table
        .filter(flashcards::user_id.eq(user_id))
        .into_boxed();

    if let Some(ref subject) = query.subject {
        cards = cards.filter(flashcards::subject.eq(subject));
    }
    if let Some(difficulty) = query.difficulty {
        cards = cards.filter(flashcards::difficulty.eq(difficulty));
    }

    let result = cards
        .order(flashcards::created_at.desc())
        .load::<Flashcard>(conn)?;

    Ok(result)
}

/// Retrieves one flashcard, scoped to its owner
#[instrument(skip(pool), fields(user_id = %user_id, card_id = %card_id))]
pub fn get_flashcard(pool: &DbPool, user_id: &str, card_id: &str) -> Result<Option<Flashcard>> {
    let conn = &mut pool.get()?;

    let result = flashcards::table
        .find(card_id)
        .filter(flashcards::user_id.eq(user_id))
        .first::<Flashcard>(conn)
        .optional()?;

    Ok(result)
}

/// Applies a partial content update to a flashcard
///
/// Review statistics are untouched; only the fields present in the update
/// are written.
///
/// ### Returns
///
/// The refreshed Flashcard, or None if the user owns no such card
#[instrument(skip(pool, update), fields(user_id = %user_id, card_id = %card_id))]
pub fn update_flashcard(
    pool: &DbPool,
    user_id: &str,
    card_id: &str,
    update: UpdateFlashcardDto,
) -> Result<Option<Flashcard>> {
    debug!("Updating flashcard");

    let conn = &mut pool.get()?;

    let Some(mut card) = flashcards::table
        .find(card_id)
        .filter(flashcards::user_id.eq(user_id))
        .first::<Flashcard>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    if let Some(subject) = update.subject {
        card.subject = subject;
    }
    if let Some(topic) = update.topic {
        card.topic = topic;
    }
    if let Some(question) = update.question {
        card.question = question;
    }
    if let Some(answer) = update.answer {
        card.answer = answer;
    }
    if let Some(difficulty) = update.difficulty {
        card.difficulty = difficulty;
    }

    diesel::update(flashcards::table.find(card_id))
        .set((
            flashcards::subject.eq(&card.subject),
            flashcards::topic.eq(&card.topic),
            flashcards::question.eq(&card.question),
            flashcards::answer.eq(&card.answer),
            flashcards::difficulty.eq(card.difficulty),
        ))
        .execute(conn)?;

    info!("Updated flashcard {}", card_id);

    Ok(Some(card))
}

/// Deletes a flashcard, scoped to its owner
///
/// ### Returns
///
/// true if a card was deleted, false if the user owns no such card
#[instrument(skip(pool), fields(user_id = %user_id, card_id = %card_id))]
pub fn delete_flashcard(pool: &DbPool, user_id: &str, card_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        flashcards::table
            .find(card_id)
            .filter(flashcards::user_id.eq(user_id)),
    )
    .execute(conn)?;

    if deleted > 0 {
        info!("Deleted flashcard {}", card_id);
    }

    Ok(deleted > 0)
}

/// Lists the cards currently due for review, soonest first
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn list_due_flashcards(pool: &DbPool, user_id: &str) -> Result<Vec<Flashcard>> {
    let conn = &mut pool.get()?;

    let now = Utc::now().naive_utc();
    let result = flashcards::table
        .filter(flashcards::user_id.eq(user_id))
        .filter(flashcards::next_review.le(now))
        .order(flashcards::next_review.asc())
        .load::<Flashcard>(conn)?;

    Ok(result)
}

/// Records a review outcome and reschedules the card
///
/// Increments the review count (and the correct count when the answer was
/// right), stamps the review time, and pushes the next review out along
/// the difficulty ladder. An incorrect answer always resets the card to
/// tomorrow.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the card
/// * `card_id` - The card being reviewed
/// * `is_correct` - Whether the answer was right
///
/// ### Returns
///
/// The refreshed Flashcard, or None if the user owns no such card
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database update fails
#[instrument(skip(pool), fields(user_id = %user_id, card_id = %card_id, is_correct = %is_correct))]
pub fn record_review(
    pool: &DbPool,
    user_id: &str,
    card_id: &str,
    is_correct: bool,
) -> Result<Option<Flashcard>> {
    debug!("Recording flashcard review");

    let conn = &mut pool.get()?;

    let Some(mut card) = flashcards::table
        .find(card_id)
        .filter(flashcards::user_id.eq(user_id))
        .first::<Flashcard>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    card.review_count += 1;
    if is_correct {
        card.correct_count += 1;
    }

    let now = Utc::now();
    card.last_reviewed = Some(now.naive_utc());
    card.next_review =
        scheduler::next_review_at(now, card.difficulty, is_correct, card.review_count).naive_utc();

    diesel::update(flashcards::table.find(card_id))
        .set((
            flashcards::last_reviewed.eq(card.last_reviewed),
            flashcards::next_review.eq(card.next_review),
            flashcards::review_count.eq(card.review_count),
            flashcards::correct_count.eq(card.correct_count),
        ))
        .execute(conn)?;

    info!(
        "Review recorded for card {}, next due {}",
        card_id, card.next_review
    );

    Ok(Some(card))
}

/// Assembles a study session: due cards first, padded with not-yet-due
/// cards up to the requested count, then shuffled
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the cards
/// * `query` - Optional subject/difficulty filters and the session size
///
/// ### Returns
///
/// A Result containing the shuffled session cards and how many of them
/// were due for review
#[instrument(skip(pool, query), fields(user_id = %user_id, card_count = %query.card_count))]
pub fn assemble_session(
    pool: &DbPool,
    user_id: &str,
    query: &SessionQuery,
) -> Result<(Vec<Flashcard>, usize)> {
    debug!("Assembling study session");

    let conn = &mut pool.get()?;
    let now = Utc::now().naive_utc();

    let mut due_query = flashcards::table
        .filter(flashcards::user_id.eq(user_id))
        .filter(flashcards::next_review.le(now))
        .into_boxed();
    if let Some(ref subject) = query.subject {
        due_query = due_query.filter(flashcards::subject.eq(subject));
    }
    if let Some(difficulty) = query.difficulty {
        due_query = due_query.filter(flashcards::difficulty.eq(difficulty));
    }

    let due_cards = due_query
        .limit(query.card_count)
        .load::<Flashcard>(conn)?;
    let due_count = due_cards.len();

    let mut session_cards = due_cards;
    let remaining = query.card_count - session_cards.len() as i64;
    if remaining > 0 {
        let mut filler_query = flashcards::table
            .filter(flashcards::user_id.eq(user_id))
            .filter(flashcards::next_review.gt(now))
            .into_boxed();
        if let Some(ref subject) = query.subject {
            filler_query = filler_query.filter(flashcards::subject.eq(subject));
        }
        if let Some(difficulty) = query.difficulty {
            filler_query = filler_query.filter(flashcards::difficulty.eq(difficulty));
        }

        let filler = filler_query.limit(remaining).load::<Flashcard>(conn)?;
        session_cards.extend(filler);
    }

    session_cards.shuffle(&mut rand::rng());

    debug!(
        "Session holds {} cards ({} due)",
        session_cards.len(),
        due_count
    );

    Ok((session_cards, due_count))
}
