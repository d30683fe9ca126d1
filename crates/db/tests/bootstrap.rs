use sqlx::PgPool;

#[sqlx::test]
async fn migrations_apply_and_db_is_healthy(pool: PgPool) {
    voicenotes_db::health_check(&pool).await.unwrap();

    // All four tables exist after migrations.
    for table in ["users", "voice_notes", "transcripts", "transcript_segments"] {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)")
                .bind(table)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(exists, "table {table} should exist");
    }
}
