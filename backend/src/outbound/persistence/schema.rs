//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Case-sensitive login name, unique.
        username -> Varchar,
        /// PHC-encoded password digest.
        password_digest -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Read-only catalogue of reviewable items.
    items (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
    }
}

diesel::table! {
    /// One row per (author, item); the pair is unique.
    reviews (id) {
        id -> Uuid,
        content -> Text,
        rating -> Int4,
        user_id -> Uuid,
        item_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments on reviews. `review_id` is checked at commit time so a review
    /// can be recreated under a new id inside one transaction.
    comments (id) {
        id -> Uuid,
        content -> Text,
        user_id -> Uuid,
        review_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(reviews -> items (item_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(comments -> reviews (review_id));

diesel::allow_tables_to_appear_in_same_query!(users, items, reviews, comments);
