//! Lobby session flows: joining, seating, finishing and admin operations.

use belote_lobby::{
    allocation::{PlayerName, TableName, TeamColor},
    lobby::{Lobby, LobbyConfig, LobbyError},
};
use std::net::IpAddr;

fn lobby() -> Lobby {
    Lobby::new(LobbyConfig {
        name: "test".to_string(),
        shuffle_players: false,
        ..LobbyConfig::default()
    })
    .unwrap()
}

fn name(s: &str) -> PlayerName {
    PlayerName::new(s)
}

fn ip(s: &str) -> Option<IpAddr> {
    Some(s.parse().unwrap())
}

fn join_ready(lobby: &mut Lobby, prefix: &str, count: usize) -> Vec<PlayerName> {
    (0..count)
        .map(|i| {
            let player = name(&format!("{prefix}{i}"));
            lobby.join(&player, None).unwrap();
            lobby.set_ready(&player, true, None).unwrap();
            player
        })
        .collect()
}

#[test]
fn test_generate_then_finish_returns_table_to_pool() {
    let mut lobby = lobby();
    let players = join_ready(&mut lobby, "p", 8);

    let summary = lobby.generate_tables().unwrap();
    assert_eq!(
        summary.created,
        vec![TableName::Numbered(1), TableName::Numbered(2)]
    );
    assert_eq!(summary.seated, 8);

    let table = lobby.table_of(&players[0]).unwrap();
    lobby.finish(&players[0], None).unwrap();

    let view = lobby.view();
    assert!(view.table(table).is_none());
    let pool = view.table(TableName::WaitingPool).unwrap();
    assert_eq!(pool.seats.len(), 4);
    assert!(pool.seats.iter().all(|s| !s.ready));

    // the other table plays on
    assert_eq!(view.seat_count(), 8);
    assert_eq!(view.tables.len(), 2);
}

#[test]
fn test_finish_from_waiting_pool_is_noop() {
    let mut lobby = lobby();
    let players = join_ready(&mut lobby, "p", 2);

    lobby.finish(&players[0], None).unwrap();
    assert!(lobby.user(&players[0]).unwrap().ready);
    assert!(lobby.user(&players[1]).unwrap().ready);
}

#[test]
fn test_seated_players_keep_teams_in_view() {
    let mut lobby = lobby();
    join_ready(&mut lobby, "p", 4);
    lobby.generate_tables().unwrap();

    let view = lobby.view();
    let table = view.table(TableName::Numbered(1)).unwrap();
    let teams: Vec<_> = table.seats.iter().map(|s| s.teams.clone()).collect();
    assert_eq!(
        teams,
        vec![
            vec![TeamColor::Red],
            vec![TeamColor::Black],
            vec![TeamColor::Red],
            vec![TeamColor::Black]
        ]
    );
}

#[test]
fn test_quit_removes_user_and_dissolves_table() {
    let mut lobby = lobby();
    let players = join_ready(&mut lobby, "p", 4);
    lobby.generate_tables().unwrap();

    lobby.quit(&players[2], None).unwrap();

    assert!(lobby.user(&players[2]).is_none());
    assert_eq!(lobby.users().len(), 3);
    for player in [&players[0], &players[1], &players[3]] {
        assert_eq!(lobby.table_of(player), Some(TableName::WaitingPool));
    }
}

#[test]
fn test_ip_bound_user_rejects_other_addresses() {
    let mut lobby = lobby();
    let ana = name("ana");
    lobby.join(&ana, ip("10.0.0.1")).unwrap();

    assert_eq!(
        lobby.set_ready(&ana, true, ip("10.0.0.2")),
        Err(LobbyError::UserNotFound(ana.clone()))
    );
    assert_eq!(
        lobby.finish(&ana, ip("10.0.0.2")),
        Err(LobbyError::IpMismatch(ana.clone()))
    );
    assert_eq!(lobby.set_ready(&ana, true, ip("10.0.0.1")), Ok(true));

    // rejoining from a new address rebinds the user
    assert_eq!(lobby.join(&ana, ip("10.0.0.2")), Ok(false));
    assert_eq!(lobby.toggle_tarot(&ana, ip("10.0.0.2")), Ok(true));
}

#[test]
fn test_toggles_flow_into_allocation() {
    let mut lobby = lobby();
    let players = join_ready(&mut lobby, "p", 5);
    for player in &players {
        assert_eq!(lobby.toggle_tarot(player, None), Ok(true));
    }

    let summary = lobby.generate_tables().unwrap();
    assert_eq!(summary.seated, 5);
    assert_eq!(summary.quota.fives, 1);

    let view = lobby.view();
    let table = view.table(TableName::Numbered(1)).unwrap();
    assert!(table.seats.iter().all(|s| s.can_play_tarot && s.teams.is_empty()));
}

#[test]
fn test_seven_seat_table_needs_two_table_player() {
    let mut lobby = lobby();
    let players = join_ready(&mut lobby, "p", 7);

    let summary = lobby.generate_tables().unwrap();
    assert_eq!(summary.seated, 6);
    assert_eq!(summary.deferred, 1);

    lobby.clear_tables().unwrap();
    assert_eq!(lobby.toggle_two_tables(&players[6], None), Ok(true));

    let summary = lobby.shuffle_tables().unwrap();
    assert_eq!(summary.seated, 7);
    assert_eq!(summary.quota.sevens, 1);
}

#[test]
fn test_generate_numbers_around_existing_tables() {
    let mut lobby = lobby();
    join_ready(&mut lobby, "a", 12);
    lobby.generate_tables().unwrap();

    lobby.delete_table(TableName::Numbered(2)).unwrap();
    lobby
        .admin_set_table_ready(TableName::WaitingPool, true)
        .unwrap();

    let summary = lobby.generate_tables().unwrap();
    assert_eq!(summary.created, vec![TableName::Numbered(2)]);

    let numbers: Vec<_> = lobby.view().tables.iter().map(|t| t.name).collect();
    assert_eq!(
        numbers,
        vec![
            TableName::WaitingPool,
            TableName::Numbered(1),
            TableName::Numbered(2),
            TableName::Numbered(3)
        ]
    );
}

#[test]
fn test_clear_tables_resets_teams_keeps_ready() {
    let mut lobby = lobby();
    join_ready(&mut lobby, "p", 10);
    lobby.generate_tables().unwrap();

    lobby.clear_tables().unwrap();

    let view = lobby.view();
    assert_eq!(view.tables.len(), 1);
    let pool = view.table(TableName::WaitingPool).unwrap();
    assert_eq!(pool.seats.len(), 10);
    assert!(pool.seats.iter().all(|s| s.teams.is_empty() && s.ready));
}

#[test]
fn test_admin_table_ready_reports_changes() {
    let mut lobby = lobby();
    join_ready(&mut lobby, "p", 4);
    lobby.generate_tables().unwrap();

    let table = TableName::Numbered(1);
    assert_eq!(lobby.admin_set_table_ready(table, true), Ok(false));
    assert_eq!(lobby.admin_set_table_ready(table, false), Ok(true));
    assert!(lobby.view().table(table).unwrap().seats.iter().all(|s| !s.ready));
    assert_eq!(
        lobby.admin_set_table_ready(TableName::Numbered(9), true),
        Err(LobbyError::TableNotFound(TableName::Numbered(9)))
    );
}

#[test]
fn test_inactive_user_is_not_seated() {
    let mut lobby = lobby();
    let players = join_ready(&mut lobby, "p", 5);
    assert_eq!(lobby.admin_set_inactive(&players[4]), Ok(true));

    let summary = lobby.generate_tables().unwrap();
    assert_eq!(summary.seated, 4);
    assert_eq!(summary.deferred, 0);
    assert_eq!(lobby.table_of(&players[4]), Some(TableName::WaitingPool));
}

#[test]
fn test_reset_empties_lobby() {
    let mut lobby = lobby();
    join_ready(&mut lobby, "p", 6);
    lobby.generate_tables().unwrap();

    lobby.reset();

    assert!(lobby.is_empty());
    assert!(lobby.users().is_empty());
    assert_eq!(lobby.generate_tables(), Err(LobbyError::EmptyLobby));
}

#[test]
fn test_view_serializes_table_names() {
    let mut lobby = lobby();
    join_ready(&mut lobby, "p", 5);
    lobby.generate_tables().unwrap();

    let json = serde_json::to_value(lobby.view()).unwrap();
    assert_eq!(json["Table 1"].as_array().unwrap().len(), 4);
    // unshuffled pools defer the first plain player
    assert_eq!(json["panama"][0]["name"], "p0");
    assert_eq!(json["Table 1"][0]["name"], "p1");
    assert_eq!(json["Table 1"][0]["teams"][0], "red");
}

#[test]
fn test_whitespace_and_underscore_names_are_distinct_players() {
    let mut lobby = lobby();
    let spaced = name("Jean Luc");
    let underscored = name("Jean_Luc");
    for player in [&spaced, &underscored] {
        assert_eq!(lobby.join(player, None), Ok(true));
        lobby.set_ready(player, true, None).unwrap();
    }
    join_ready(&mut lobby, "p", 2);

    let summary = lobby.generate_tables().unwrap();
    assert_eq!(summary.seated, 4);
    assert_eq!(lobby.table_of(&spaced), Some(TableName::Numbered(1)));
    assert_eq!(lobby.table_of(&underscored), Some(TableName::Numbered(1)));

    let json = serde_json::to_value(lobby.view()).unwrap();
    let names: Vec<_> = json["Table 1"]
        .as_array()
        .unwrap()
        .iter()
        .map(|seat| seat["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"Jean Luc".to_string()));
    assert!(names.contains(&"Jean_Luc".to_string()));
}

#[test]
fn test_overlong_name_is_refused_not_truncated() {
    let mut lobby = lobby();
    let long = name(&"x".repeat(33));
    assert!(matches!(
        lobby.join(&long, None),
        Err(LobbyError::InvalidName { .. })
    ));
    assert!(lobby.users().is_empty());
}

#[test]
fn test_zero_capacity_config_is_rejected() {
    let config = LobbyConfig {
        subscriber_capacity: 0,
        ..LobbyConfig::default()
    };
    assert!(matches!(
        Lobby::new(config),
        Err(LobbyError::InvalidConfig(_))
    ));
}
