//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// One row per materialised week.
    weekly_rosters (id) {
        id -> Uuid,
        /// Monday starting the week; unique.
        week_start_date -> Date,
        week_number -> Int4,
        year -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Standing and custom tasks.
    tasks (id) {
        id -> Uuid,
        roster_id -> Uuid,
        name -> Text,
        assigned_to -> Text,
        /// `trash`, `sweeping` or `dusting`; NULL for custom tasks.
        standing_kind -> Nullable<Text>,
        rotation_index -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// At most one completion per task.
    task_completions (id) {
        id -> Uuid,
        task_id -> Uuid,
        completed_at -> Timestamptz,
        proof_photos -> Array<Text>,
    }
}

diesel::table! {
    /// Bathroom duties with their completion state.
    bathroom_assignments (id) {
        id -> Uuid,
        roster_id -> Uuid,
        bathroom_number -> Int2,
        assigned_to -> Text,
        cleaning_mode -> Text,
        rotation_index -> Nullable<Int4>,
        completed_at -> Nullable<Timestamptz>,
        proof_photos -> Array<Text>,
    }
}

diesel::table! {
    /// Login accounts.
    user_accounts (id) {
        id -> Uuid,
        username -> Text,
        resident -> Text,
        role -> Text,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> weekly_rosters (roster_id));
diesel::joinable!(task_completions -> tasks (task_id));
diesel::joinable!(bathroom_assignments -> weekly_rosters (roster_id));

diesel::allow_tables_to_appear_in_same_query!(
    weekly_rosters,
    tasks,
    task_completions,
    bathroom_assignments,
    user_accounts,
);
