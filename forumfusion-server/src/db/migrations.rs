//! Schema migrations
//!
//! Every statement is idempotent, so `run` is safe on each startup.

use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email TEXT NOT NULL UNIQUE,
        user_name TEXT NOT NULL DEFAULT '',
        photo_url TEXT,
        badge TEXT NOT NULL DEFAULT 'bronze' CHECK (badge IN ('bronze', 'gold')),
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS announcements (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        author_name TEXT NOT NULL DEFAULT '',
        author_image TEXT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        post_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        author_name TEXT NOT NULL DEFAULT '',
        author_email TEXT NOT NULL,
        author_image TEXT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        tags TEXT[] NOT NULL DEFAULT '{}',
        up_vote INTEGER NOT NULL DEFAULT 0 CHECK (up_vote >= 0),
        down_vote INTEGER NOT NULL DEFAULT 0 CHECK (down_vote >= 0),
        comments_count INTEGER NOT NULL DEFAULT 0 CHECK (comments_count >= 0),
        post_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_author_email_idx ON posts (author_email)",
    "CREATE INDEX IF NOT EXISTS posts_post_time_idx ON posts (post_time DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        post_title TEXT,
        commenter_email TEXT NOT NULL,
        commenter_name TEXT NOT NULL DEFAULT '',
        commenter_image TEXT,
        comment TEXT NOT NULL,
        feedback TEXT,
        reported BOOLEAN NOT NULL DEFAULT FALSE,
        comment_time TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS comments_post_id_idx ON comments (post_id)",
    r#"
    CREATE TABLE IF NOT EXISTS votes (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        voter_email TEXT NOT NULL,
        state TEXT NOT NULL DEFAULT 'none' CHECK (state IN ('none', 'up', 'down')),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (post_id, voter_email)
    )
    "#,
];

/// Run all migrations.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running forum migrations...");

    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(statements = STATEMENTS.len(), "Migrations complete");
    Ok(())
}
