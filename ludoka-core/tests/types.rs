use ludoka_core::*;

#[test]
fn user_id_defaults_to_unassigned() {
    let user: User = serde_json::from_str(r#"{"name":"alice"}"#).unwrap();
    assert_eq!(user.id, None);
    assert_eq!(user.name, "alice");
}

#[test]
fn game_without_steamid_deserializes() {
    let game: Game = serde_json::from_str(r#"{"name":"Celeste"}"#).unwrap();
    assert_eq!(game, Game::new("Celeste", None));
    assert_eq!(game.with_id(7).id, Some(7));
}

#[test]
fn library_entry_defaults() {
    let entry: LibraryEntry = serde_json::from_str(r#"{"interest":false}"#).unwrap();
    assert_eq!(entry, LibraryEntry::DEFAULTS);
    assert!(entry.has_default_values());

    let pair = LibraryEntry::defaults_for(3, 4);
    assert_eq!((pair.user_id, pair.game_id), (3, 4));
    assert!(pair.has_default_values());
}

#[test]
fn group_entries_use_compact_rows() {
    let entries = [
        LibraryEntry {
            user_id: 1,
            game_id: 2,
            interest: true,
        },
        LibraryEntry {
            user_id: 1,
            game_id: 5,
            interest: true,
        },
    ];
    let json = serde_json::to_string(&GroupEntries::new(&entries)).unwrap();
    assert_eq!(
        json,
        r#"{"defaults":[-1,-1,false],"columns":["user_id","game_id","interest"],"entries":[[1,2,true],[1,5,true]]}"#
    );

    let back: GroupEntries = serde_json::from_str(&json).unwrap();
    let decoded: Vec<LibraryEntry> = back.entries.into_iter().map(Into::into).collect();
    assert_eq!(decoded, entries);
}

#[test]
fn name_validation() {
    assert!(UserData::new("bob").validate().is_ok());
    assert_eq!(
        UserData::new("   ").validate(),
        Err(ValidationError::EmptyName { kind: "user" })
    );

    let long = "x".repeat(MAX_USER_NAME_LEN + 1);
    assert!(matches!(
        UserData::new(long).validate(),
        Err(ValidationError::NameTooLong { max: MAX_USER_NAME_LEN, .. })
    ));

    let game_name = "g".repeat(MAX_GAME_NAME_LEN);
    assert!(Game::new(game_name, Some(1)).validate().is_ok());
}
