mod common;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;
use warfront::db::{export_world, migrate};

async fn setup() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default().start().await.unwrap();
    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let pool = PgPoolOptions::new()
        .connect(&format!(
            "postgres://postgres:postgres@{}:{}/postgres",
            host, port
        ))
        .await
        .unwrap();
    (pool, container)
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn export_populates_all_tables() {
    let (pool, _container) = setup().await;
    let world = common::build_test_world();

    migrate(&pool).await.unwrap();
    export_world(&pool, &world).await.unwrap();

    assert_eq!(count(&pool, "countries").await, world.countries.len() as i64);
    assert_eq!(count(&pool, "alliances").await, world.alliances.len() as i64);
    let member_rows: usize = world.alliances.values().map(|a| a.members.len()).sum();
    assert_eq!(count(&pool, "alliance_members").await, member_rows as i64);
    assert_eq!(count(&pool, "wars").await, world.wars.len() as i64);
    assert_eq!(count(&pool, "battles").await, world.battles.len() as i64);
    assert_eq!(count(&pool, "battle_rounds").await, world.rounds.len() as i64);
    assert_eq!(
        count(&pool, "battle_participations").await,
        world.participations.len() as i64
    );
    assert_eq!(
        count(&pool, "battle_damage").await,
        world.damage_ledger.len() as i64
    );
    assert_eq!(count(&pool, "laws").await, world.laws.len() as i64);
    assert_eq!(
        count(&pool, "joint_proposals").await,
        world.joint_proposals.len() as i64
    );
    assert_eq!(
        count(&pool, "pending_leaves").await,
        world.pending_leaves.len() as i64
    );
    assert_eq!(
        count(&pool, "dissolutions").await,
        world.dissolutions.len() as i64
    );
    assert_eq!(count(&pool, "embargoes").await, world.embargoes.len() as i64);
    assert_eq!(count(&pool, "bounties").await, world.bounties.len() as i64);
    assert_eq!(count(&pool, "journal").await, world.journal.len() as i64);
}

#[tokio::test]
#[ignore]
async fn exported_data_matches_source_values() {
    let (pool, _container) = setup().await;
    let world = common::build_test_world();

    migrate(&pool).await.unwrap();
    export_world(&pool, &world).await.unwrap();

    // --- Wars ---
    let war = world.wars.values().next().unwrap();
    let row = sqlx::query("SELECT * FROM wars WHERE id = $1")
        .bind(war.id as i64)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<String, _>("status"), "active");
    assert_eq!(row.get::<i64, _>("attacker_id"), war.attacker_id as i64);
    assert_eq!(
        row.get::<i64, _>("scheduled_end_at"),
        war.scheduled_end_at.unix()
    );
    assert_eq!(
        row.get::<Option<i64>, _>("initiative_holder_id"),
        Some(war.attacker_id as i64)
    );
    assert!(!row.get::<bool, _>("initiative_lost"));

    // --- Rounds: one completed with a winner, one still active ---
    let rounds = sqlx::query("SELECT status, winner FROM battle_rounds ORDER BY round_number")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].get::<String, _>("status"), "completed");
    assert_eq!(rounds[0].get::<Option<String>, _>("winner"), Some("attacker".into()));
    assert_eq!(rounds[1].get::<String, _>("status"), "active");
    assert_eq!(rounds[1].get::<Option<String>, _>("winner"), None);

    // --- Ledger sums survive the trip ---
    let attacker_total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM battle_damage WHERE side = 'attacker'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(attacker_total, 300);

    // --- Law kinds round-trip as tagged JSON ---
    let kinds: Vec<String> = sqlx::query_scalar("SELECT kind->>'type' FROM laws ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert!(kinds.contains(&"declare_war".to_string()));
    assert!(kinds.contains(&"propose_peace".to_string()));
    assert!(kinds.contains(&"alliance_dissolve".to_string()));

    let ballots: serde_json::Value =
        sqlx::query_scalar("SELECT ballots FROM laws WHERE kind->>'type' = 'declare_war'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(ballots[0]["voter_id"], 1);
    assert_eq!(ballots[0]["approve"], true);

    // --- Membership history keeps ended rows distinct ---
    let open_memberships: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM alliance_members WHERE left_at IS NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(open_memberships, 2);
}

#[tokio::test]
#[ignore]
async fn journal_queries_reconstruct_history() {
    let (pool, _container) = setup().await;
    let world = common::build_test_world();

    migrate(&pool).await.unwrap();
    export_world(&pool, &world).await.unwrap();

    // The declaration entry is queryable by its tagged kind.
    let row = sqlx::query(
        "SELECT description, manual FROM journal WHERE kind->>'type' = 'war_declared'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(
        row.get::<String, _>("description"),
        "Arcadia declared war on Borduria"
    );
    assert!(!row.get::<bool, _>("manual"));

    // Per-user damage leaderboard for the battle.
    let leader: i64 = sqlx::query_scalar(
        "SELECT user_id FROM battle_damage GROUP BY user_id ORDER BY SUM(amount) DESC LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(leader, 100);
}
