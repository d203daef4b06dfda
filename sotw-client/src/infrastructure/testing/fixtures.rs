//! Sample API payloads shaped like the server's responses.

use serde_json::{Value, json};

pub fn user_json(id: i64, member_of: &[i64]) -> Value {
    let groups: Vec<Value> = member_of
        .iter()
        .map(|sotw_id| json!({"id": sotw_id, "name": format!("Group {sotw_id}")}))
        .collect();
    json!({
        "id": id,
        "email": format!("user{id}@example.com"),
        "name": format!("User {id}"),
        "is_superuser": false,
        "spotify_linked": false,
        "playlists": null,
        "sotw_list": groups
    })
}

pub fn sotw_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "owner_id": 1,
        "created_at": "2024-01-05T18:00:00",
        "playlist_link": "",
        "master_playlist_link": "",
        "soty_playlist_link": "",
        "share_id": format!("share-{id}"),
        "user_list": [{"id": 1, "name": "User 1"}]
    })
}

pub fn week_json(sotw_id: i64, week_num: u32) -> Value {
    json!({
        "id": format!("{sotw_id}+{week_num}"),
        "week_num": week_num,
        "playlist_link": "",
        "sotw_id": sotw_id,
        "next_results_release": 1_700_000_000_000.0_f64,
        "survey": "",
        "responses": []
    })
}

pub fn closed_period_json(message: &str) -> Value {
    json!({"status": "closed", "message": message, "week": null})
}

pub fn results_json(sotw_id: i64, week_num: u32) -> Value {
    json!({
        "id": "1",
        "sotw_id": sotw_id,
        "week_id": format!("{sotw_id}+{week_num}"),
        "first_place": "[\"Song A\"]",
        "second_place": "[\"Song B\"]",
        "all_songs": "{}",
        "guessing_data": "[]",
        "theme": null,
        "theme_description": null
    })
}
