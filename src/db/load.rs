use serde::Serialize;
use sqlx::PgPool;

use crate::model::World;

/// Export an entire `World` into Postgres using COPY FROM STDIN (text
/// format).
///
/// Order respects FK constraints: countries and alliances first, then the
/// war tree, then the law pipeline, then the journal.
pub async fn export_world(pool: &PgPool, world: &World) -> Result<(), sqlx::Error> {
    // Countries (alliance FK is deferred by loading the id as a plain
    // column; alliances reference countries, not the other way round in
    // DDL).
    {
        let mut buf = String::new();
        for c in world.countries.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\n",
                c.id,
                escape(&c.name),
                opt_u64(c.alliance_id),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_countries.sql"), &buf).await?;
    }

    // Alliances and membership history
    {
        let mut buf = String::new();
        for a in world.alliances.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                a.id,
                escape(&a.name),
                a.founder_id,
                enum_str(&a.status),
                a.founded_at.unix(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_alliances.sql"), &buf).await?;
    }
    {
        let mut buf = String::new();
        for a in world.alliances.values() {
            for m in &a.members {
                buf.push_str(&format!(
                    "{}\t{}\t{}\t{}\n",
                    a.id,
                    m.country_id,
                    m.joined_at.unix(),
                    opt_ts(m.left_at),
                ));
            }
        }
        copy_in(pool, include_str!("../../sql/copy_alliance_members.sql"), &buf).await?;
    }

    // Wars
    {
        let mut buf = String::new();
        for w in world.wars.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                w.id,
                w.attacker_id,
                w.defender_id,
                enum_str(&w.status),
                w.started_at.unix(),
                w.scheduled_end_at.unix(),
                opt_u64(w.initiative_holder_id),
                opt_ts(w.initiative_expires_at),
                w.initiative_lost,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_wars.sql"), &buf).await?;
    }

    // Battles, then rounds (FK on battle_id)
    {
        let mut buf = String::new();
        for b in world.battles.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                b.id,
                b.war_id,
                b.region_id,
                enum_str(&b.status),
                b.current_round,
                b.started_at.unix(),
                b.ends_at.unix(),
                b.attacker_rounds_won,
                b.defender_rounds_won,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_battles.sql"), &buf).await?;
    }
    {
        let mut buf = String::new();
        for r in world.rounds.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                r.id,
                r.battle_id,
                r.round_number,
                enum_str(&r.status),
                r.started_at.unix(),
                r.ends_at.unix(),
                opt_enum(r.winner.as_ref()),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_battle_rounds.sql"), &buf).await?;
    }

    // Participation and the damage ledger
    {
        let mut buf = String::new();
        for p in &world.participations {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                p.battle_id,
                p.user_id,
                enum_str(&p.side),
                p.joined_at.unix(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_battle_participations.sql"), &buf).await?;
    }
    {
        let mut buf = String::new();
        for d in &world.damage_ledger {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                d.battle_id,
                d.round_number,
                d.user_id,
                enum_str(&d.side),
                d.amount,
                d.dealt_at.unix(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_battle_damage.sql"), &buf).await?;
    }

    // Laws (kind and ballots as JSON), then joint proposals (FK on laws)
    {
        let mut buf = String::new();
        for l in world.laws.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                l.id,
                l.country_id,
                json_str(&l.kind),
                l.proposed_by,
                enum_str(&l.status),
                l.proposed_at.unix(),
                l.voting_ends_at.unix(),
                json_str(&l.ballots),
                opt_u64(l.linked_law_id),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_laws.sql"), &buf).await?;
    }
    {
        let mut buf = String::new();
        for p in world.joint_proposals.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                p.id,
                json_str(&p.kind),
                p.first_law_id,
                p.second_law_id,
                enum_str(&p.status),
                p.deadline.unix(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_joint_proposals.sql"), &buf).await?;
    }

    // Alliance pipeline leftovers
    {
        let mut buf = String::new();
        for l in world.pending_leaves.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                l.id,
                l.alliance_id,
                l.country_id,
                l.execute_at.unix(),
                l.executed,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_pending_leaves.sql"), &buf).await?;
    }
    {
        let mut buf = String::new();
        for d in world.dissolutions.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                d.id,
                d.alliance_id,
                json_str(&d.member_laws),
                enum_str(&d.status),
                d.deadline.unix(),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_dissolutions.sql"), &buf).await?;
    }
    {
        let mut buf = String::new();
        for e in world.embargoes.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                e.id,
                e.country_id,
                e.target_id,
                e.imposed_at.unix(),
                opt_ts(e.lifted_at),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_embargoes.sql"), &buf).await?;
    }

    // Bounties
    {
        let mut buf = String::new();
        for b in world.bounties.values() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                b.id,
                b.battle_id,
                enum_str(&b.side),
                b.reward,
                b.funder_id,
                enum_str(&b.status),
                b.opened_at.unix(),
                opt_u64(b.awarded_to),
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_bounties.sql"), &buf).await?;
    }

    // Journal
    {
        let mut buf = String::new();
        for e in &world.journal {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                e.id,
                e.at.unix(),
                json_str(&e.kind),
                escape(&e.description),
                e.manual,
            ));
        }
        copy_in(pool, include_str!("../../sql/copy_journal.sql"), &buf).await?;
    }

    Ok(())
}

/// Execute a COPY FROM STDIN with the given text-format payload.
async fn copy_in(pool: &PgPool, statement: &str, data: &str) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let mut copy = conn.copy_in_raw(statement).await?;
    copy.send(data.as_bytes()).await?;
    copy.finish().await?;
    Ok(())
}

/// Escape a string for Postgres COPY text format.
/// Backslash must be escaped first, then the special whitespace characters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an optional id as a COPY text value (`\N` for NULL).
fn opt_u64(v: Option<u64>) -> String {
    match v {
        Some(n) => n.to_string(),
        None => "\\N".to_string(),
    }
}

/// Render an optional timestamp as epoch seconds (`\N` for NULL).
fn opt_ts(v: Option<crate::model::Timestamp>) -> String {
    match v {
        Some(t) => t.unix().to_string(),
        None => "\\N".to_string(),
    }
}

/// Serialize a plain serde enum variant to its snake_case string (strips
/// JSON quotes). Only valid for unit-variant enums.
fn enum_str<T: Serialize>(val: &T) -> String {
    let json = serde_json::to_string(val).expect("enum serialization");
    // serde_json wraps string enums in quotes: "\"value\""
    json[1..json.len() - 1].to_string()
}

fn opt_enum<T: Serialize>(val: Option<&T>) -> String {
    match val {
        Some(v) => enum_str(v),
        None => "\\N".to_string(),
    }
}

/// Serialize a tagged enum or struct to escaped JSON for a jsonb column.
fn json_str<T: Serialize>(val: &T) -> String {
    escape(&serde_json::to_string(val).expect("json serialization"))
}
